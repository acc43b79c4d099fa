//! Low-level packing: McKay's variable-length integers and fixed-width bit
//! fields, rendered as printable characters.

pub mod bits;
pub mod mckay;

pub use crate::codec::bits::*;
pub use crate::codec::mckay::*;
use thiserror::Error;

/// Smallest byte of the printable alphabet; a 6-bit group `g` is rendered as
/// `g + CHAR_OFFSET`.
pub const CHAR_OFFSET: u8 = 63;
/// Largest byte of the printable alphabet, reserved as the multi-character
/// integer sentinel.
pub const CHAR_SENTINEL: u8 = 126;
/// Bits carried by one character.
pub const CHAR_BITS: u32 = 6;

/// Errors surfaced by the codec entry points.
///
/// Three families: values outside an encoding tier's domain (`IntOutOfRange`
/// through `FieldOverflow`), malformed encoded input (`BadPrefix` through
/// `ValueBeforeTarget`), and violated caller contracts (`DomainMismatch`,
/// `DenseUnsupported`).
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    #[error("integer {0} exceeds the 36-bit limit of the McKay encoding")]
    IntOutOfRange(u64),
    #[error("permutation image {image} outside 1..={n}")]
    ImageOutOfRange { image: usize, n: usize },
    #[error("neighbor {neighbor} of vertex {vertex} outside 1..={n}")]
    NeighborOutOfRange { vertex: usize, neighbor: usize, n: usize },
    #[error("value {value} does not fit in a {width}-bit field")]
    FieldOverflow { value: u64, width: u32 },
    #[error("compact encoding must start with \"::\"")]
    BadPrefix,
    #[error("byte {0:#04x} outside the printable range 63..=126")]
    InvalidByte(u8),
    #[error("integer encoding ends before its {expected} bytes")]
    TruncatedInt { expected: usize },
    #[error("bit stream ended while reading {0}")]
    TruncatedStream(&'static str),
    #[error("orbit size run missing its size field")]
    RunLengthPairMissingSize,
    #[error("vertex count {declared} does not match the orbit sizes, which sum to {actual}")]
    VertexCountMismatch { declared: usize, actual: usize },
    #[error("orbit index {index} outside 1..={k}")]
    OrbitIndexOutOfRange { index: usize, k: usize },
    #[error("adjacency value token before any target orbit")]
    ValueBeforeTarget,
    #[error("malformed plain encoding at byte {at}: {reason}")]
    Plain { at: usize, reason: &'static str },
    #[error("permutation acts on {permutation} vertices, graph has {graph}")]
    DomainMismatch { permutation: usize, graph: usize },
    #[error("dense adjacency encoding is not supported")]
    DenseUnsupported,
}

pub type Result<T> = std::result::Result<T, Error>;
