//! McKay's variable-length integer format, shared with the graph6 family of
//! formats: https://users.cecs.anu.edu.au/~bdm/data/formats.txt

use crate::codec::{Error, Result, CHAR_OFFSET, CHAR_SENTINEL};

/// Largest encodable value, 2^36 - 1.
pub const MAX_INT: u64 = (1 << 36) - 1;

const SHORT_MAX: u64 = 62;
const MEDIUM_MAX: u64 = (1 << 18) - 1;

/// Encodes `n` into 1, 4 or 8 printable bytes. The tier is implied by the
/// number of leading sentinel bytes: none for values up to 62, one for 18-bit
/// values, two for 36-bit values.
pub fn encode_int(n: u64) -> Result<String> {
    if n > MAX_INT {
        return Err(Error::IntOutOfRange(n));
    }
    let mut out = String::new();
    if n <= SHORT_MAX {
        out.push(char::from(n as u8 + CHAR_OFFSET));
    } else if n <= MEDIUM_MAX {
        out.push(char::from(CHAR_SENTINEL));
        push_groups(&mut out, n, 3);
    } else {
        out.push(char::from(CHAR_SENTINEL));
        out.push(char::from(CHAR_SENTINEL));
        push_groups(&mut out, n, 6);
    }
    Ok(out)
}

/// Appends `n` as `groups` 6-bit groups, most significant first.
fn push_groups(out: &mut String, n: u64, groups: u32) {
    for i in (0..groups).rev() {
        out.push(char::from((n >> (6 * i) & 0x3f) as u8 + CHAR_OFFSET));
    }
}

/// Decodes a McKay integer from the start of `bytes`, returning the value and
/// the number of bytes consumed so callers can keep a cursor.
pub fn decode_int(bytes: &[u8]) -> Result<(u64, usize)> {
    let sentinels = bytes.iter().take(2).take_while(|&&b| b == CHAR_SENTINEL).count();
    let len = match sentinels {
        0 => 1,
        1 => 4,
        _ => 8,
    };
    if bytes.len() < len {
        return Err(Error::TruncatedInt { expected: len });
    }
    let mut value = 0;
    for &b in &bytes[sentinels..len] {
        if !(CHAR_OFFSET..=CHAR_SENTINEL).contains(&b) {
            return Err(Error::InvalidByte(b));
        }
        value = value << 6 | u64::from(b - CHAR_OFFSET);
    }
    Ok((value, len))
}
