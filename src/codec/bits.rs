//! Fixed-width bit fields packed into the printable character range, 6 bits
//! per character.

use crate::codec::{Error, Result, CHAR_BITS, CHAR_OFFSET, CHAR_SENTINEL};

/// Minimal number of bits `b` such that `n < 2^b`, so that every value in
/// `0..=n` fits a `b`-bit field. `n` must be positive.
pub fn bit_width(n: usize) -> u32 {
    debug_assert!(n > 0);
    usize::BITS - n.leading_zeros()
}

/// Append-only bit buffer rendered as printable characters.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct BitWriter {
    bits: Vec<bool>,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn push_bit(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Appends `value` as a big-endian `width`-bit field. The value must fit;
    /// [`BitWriter::pack_fields`] is the checked entry for external values.
    pub fn push_field(&mut self, value: u64, width: u32) {
        debug_assert!(width == u64::BITS || value >> width == 0);
        for i in (0..width).rev() {
            self.bits.push(value >> i & 1 == 1);
        }
    }

    /// Appends every value as a `width`-bit field, failing on values that do
    /// not fit.
    pub fn pack_fields(&mut self, width: u32, values: impl IntoIterator<Item = u64>) -> Result<()> {
        for value in values {
            if width < u64::BITS && value >> width != 0 {
                return Err(Error::FieldOverflow { value, width });
            }
            self.push_field(value, width);
        }
        Ok(())
    }

    /// Zero-pads to the next character boundary.
    pub fn pad_to_char(&mut self) {
        while self.bits.len() % CHAR_BITS as usize != 0 {
            self.bits.push(false);
        }
    }

    /// Renders each 6-bit group as one character. The buffer length must be a
    /// multiple of 6; call [`BitWriter::pad_to_char`] first.
    pub fn into_string(self) -> String {
        assert_eq!(self.bits.len() % CHAR_BITS as usize, 0);
        self.bits
            .chunks(CHAR_BITS as usize)
            .map(|group| {
                let value = group.iter().fold(0, |acc, &bit| acc << 1 | bit as u8);
                char::from(value + CHAR_OFFSET)
            })
            .collect()
    }
}

/// Bit cursor over encoded bytes, starting at a given byte offset.
#[derive(Clone, Debug)]
pub struct BitReader<'a> {
    bytes: &'a [u8],
    byte: usize,
    bit: u32,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8], byte: usize) -> Self {
        Self { bytes, byte, bit: 0 }
    }

    /// Consumes one bit; `None` on a clean end of the stream.
    pub fn try_read_bit(&mut self) -> Result<Option<bool>> {
        let Some(&b) = self.bytes.get(self.byte) else {
            return Ok(None);
        };
        if !(CHAR_OFFSET..=CHAR_SENTINEL).contains(&b) {
            return Err(Error::InvalidByte(b));
        }
        let bit = (b - CHAR_OFFSET) >> (CHAR_BITS - 1 - self.bit) & 1 == 1;
        self.bit += 1;
        if self.bit == CHAR_BITS {
            self.bit = 0;
            self.byte += 1;
        }
        Ok(Some(bit))
    }

    /// Reads a big-endian `width`-bit field; exhaustion mid-field is an error
    /// naming `what`.
    pub fn read_field(&mut self, width: u32, what: &'static str) -> Result<u64> {
        let mut value = 0;
        for _ in 0..width {
            match self.try_read_bit()? {
                Some(bit) => value = value << 1 | bit as u64,
                None => return Err(Error::TruncatedStream(what)),
            }
        }
        Ok(value)
    }

    /// Reads a `width`-bit field, tolerating the zero padding that fills the
    /// last character of a block: `None` when the stream ends having yielded
    /// only zero bits, an error when it ends after a one bit, which can only
    /// be truncated data.
    pub fn read_field_or_padding(&mut self, width: u32, what: &'static str) -> Result<Option<u64>> {
        let mut value = 0;
        for _ in 0..width {
            match self.try_read_bit()? {
                Some(bit) => value = value << 1 | bit as u64,
                None if value == 0 => return Ok(None),
                None => return Err(Error::TruncatedStream(what)),
            }
        }
        Ok(Some(value))
    }

    /// Advances to the next character boundary. Blocks are padded to whole
    /// characters independently, so a new block never starts mid-character.
    pub fn align_to_char(&mut self) {
        if self.bit > 0 {
            self.bit = 0;
            self.byte += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    #[test]
    fn bit_widths() {
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(2), 2);
        assert_eq!(bit_width(3), 2);
        assert_eq!(bit_width(4), 3);
        assert_eq!(bit_width(62), 6);
        assert_eq!(bit_width(63), 6);
        assert_eq!(bit_width(64), 7);
    }

    #[test]
    fn bits_roundtrip_through_chars() {
        let mut rng = Pcg64Mcg::seed_from_u64(0);
        for len in [6, 12, 60, 600] {
            let bits: Vec<bool> = (0..len).map(|_| rng.gen()).collect();
            let mut writer = BitWriter::new();
            for &bit in &bits {
                writer.push_bit(bit);
            }
            let encoded = writer.into_string();
            assert_eq!(encoded.len(), len / 6);
            assert!(encoded.bytes().all(|b| (63..=126).contains(&b)));

            let mut reader = BitReader::new(encoded.as_bytes(), 0);
            let decoded: Vec<bool> = (0..len).map(|_| reader.try_read_bit().unwrap().unwrap()).collect();
            assert_eq!(decoded, bits);
            assert_eq!(reader.try_read_bit().unwrap(), None);
        }
    }

    #[test]
    fn fields_roundtrip() {
        let values = [0, 1, 5, 12, 31];
        let mut writer = BitWriter::new();
        writer.pack_fields(5, values).unwrap();
        writer.pad_to_char();
        let encoded = writer.into_string();

        let mut reader = BitReader::new(encoded.as_bytes(), 0);
        for value in values {
            assert_eq!(reader.read_field(5, "test").unwrap(), value);
        }
    }

    #[test]
    fn field_overflow() {
        let mut writer = BitWriter::new();
        assert_eq!(writer.pack_fields(3, [7]), Ok(()));
        assert_eq!(writer.pack_fields(3, [8]), Err(Error::FieldOverflow { value: 8, width: 3 }));
    }

    #[test]
    fn truncation_mid_field() {
        let mut writer = BitWriter::new();
        writer.push_field(0b101101, 6);
        let encoded = writer.into_string();
        let mut reader = BitReader::new(encoded.as_bytes(), 0);
        assert_eq!(reader.read_field(4, "head").unwrap(), 0b1011);
        assert_eq!(reader.read_field(4, "tail"), Err(Error::TruncatedStream("tail")));
    }

    #[test]
    fn padding_is_not_truncation() {
        // One 1-bit, then 5 bits of padding: reading a wide field off the
        // padding ends cleanly, while a 1 bit right before the end does not.
        let mut writer = BitWriter::new();
        writer.push_bit(true);
        writer.pad_to_char();
        let encoded = writer.into_string();

        let mut reader = BitReader::new(encoded.as_bytes(), 0);
        assert_eq!(reader.try_read_bit().unwrap(), Some(true));
        assert_eq!(reader.read_field_or_padding(8, "tail").unwrap(), None);

        let mut writer = BitWriter::new();
        writer.push_field(0b000001, 6);
        let encoded = writer.into_string();
        let mut reader = BitReader::new(encoded.as_bytes(), 0);
        assert_eq!(reader.read_field_or_padding(8, "tail"), Err(Error::TruncatedStream("tail")));
    }

    #[test]
    fn align_to_char() {
        let mut writer = BitWriter::new();
        writer.push_field(0b1010, 4);
        writer.pad_to_char();
        writer.push_field(0b110011, 6);
        let encoded = writer.into_string();

        let mut reader = BitReader::new(encoded.as_bytes(), 0);
        assert_eq!(reader.read_field(4, "head").unwrap(), 0b1010);
        reader.align_to_char();
        assert_eq!(reader.read_field(6, "next block").unwrap(), 0b110011);
    }

    #[test]
    fn rejects_bytes_outside_alphabet() {
        let mut reader = BitReader::new(b" ", 0);
        assert_eq!(reader.try_read_bit(), Err(Error::InvalidByte(b' ')));
    }
}
