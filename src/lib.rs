//! Compact graph encoding through a known automorphism: a graph is stored as
//! the orbit structure of the automorphism's cyclic decomposition plus the
//! edges of one representative vertex per orbit, bit-packed into a printable
//! string. The symmetry regenerates every remaining edge on decode.

pub mod codec;
pub mod orbit;
pub mod permutable;

pub use codec::{Error, Result};
pub use orbit::{Adjacency, OrbitCodec};
pub use permutable::graph::Graph;
pub use permutable::Permutation;

#[cfg(any(test, feature = "bench"))]
pub mod bench;
#[cfg(feature = "nauty")]
pub mod nauty;
