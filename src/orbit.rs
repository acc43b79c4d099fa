//! The automorphism-compact graph codec.
//!
//! A graph with a known automorphism is stored as the orbit sizes of the
//! automorphism's cyclic decomposition plus, per orbit pair, the residue
//! classes of the representative vertex's neighbors. The symmetry regenerates
//! every remaining edge on decode. The result is printable: a `"::"` prefix,
//! the vertex count as a McKay integer, the run-length encoded orbit sizes,
//! and the adjacency token stream, each bit-packed into characters.

use crate::codec::{bit_width, decode_int, encode_int, BitReader, BitWriter, Error, Result};
use crate::permutable::graph::Graph;
use crate::permutable::{canonical_size_order, FHashMap, FHashSet, Permutation};
use gcd::Gcd;
use itertools::Itertools;
use std::collections::BTreeSet;
use std::iter::repeat_n;

/// Adjacency stream variants of the compact format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Adjacency {
    /// Presence-token stream listing only populated orbit pairs.
    #[default]
    Sparse,
    /// Fixed layout over all orbit pairs. Declared by the format but not
    /// supported by this implementation.
    Dense,
}

/// Codec turning (graph, automorphism) into a compact printable string and
/// back.
///
/// The decoder numbers vertices canonically (orbits concatenated in
/// decomposition order), not with the encoder's original numbering; relabel
/// the decoded graph with the concatenated-cycle permutation to compare, as
/// [`decode`](OrbitCodec::decode) documents.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OrbitCodec {
    pub adjacency: Adjacency,
}

impl OrbitCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encodes `graph` against `automorphism`, which must act on the same
    /// vertex set and map the edge set onto itself. The automorphism property
    /// itself is trusted, not checked: encoding keeps only one representative
    /// per orbit, so a non-automorphism decodes into a different graph.
    pub fn encode(&self, graph: &Graph, automorphism: &Permutation) -> Result<String> {
        if automorphism.n() != graph.n() {
            return Err(Error::DomainMismatch { permutation: automorphism.n(), graph: graph.n() });
        }
        let mut out = String::from("::");
        out.push_str(&encode_int(graph.n() as u64)?);
        if graph.n() == 0 {
            return Ok(out);
        }
        let cycles = automorphism.cyclic_decomposition();
        out.push_str(&encode_cycle_sizes(graph.n(), &cycles)?);
        match self.adjacency {
            Adjacency::Sparse => out.push_str(&encode_sparse_adjacency(graph, &cycles)),
            Adjacency::Dense => return Err(Error::DenseUnsupported),
        }
        Ok(out)
    }

    /// Decodes a compact encoding. The resulting graph is numbered in
    /// canonical orbit order: the vertices of the first orbit come first, in
    /// cycle order, then the second orbit's, and so on.
    pub fn decode(&self, encoded: &str) -> Result<Graph> {
        let bytes = encoded.as_bytes();
        let rest = bytes.strip_prefix(b"::").ok_or(Error::BadPrefix)?;
        let (n, consumed) = decode_int(rest)?;
        let n = n as usize;
        if n == 0 {
            return Ok(Graph::empty(0));
        }
        let mut reader = BitReader::new(bytes, 2 + consumed);
        let sizes = decode_cycle_sizes(n, &mut reader)?;
        reader.align_to_char();
        let deltas = decode_adjacency(&sizes, &mut reader)?;
        Ok(expand(&sizes, &deltas))
    }
}

/// Run-length encodes the canonical size sequence: (count, size) pairs for
/// runs longer than one, a zero sentinel, the remaining singleton sizes, a
/// terminal zero sentinel. Every field is `bit_width(n)` bits.
fn encode_cycle_sizes(n: usize, cycles: &[Vec<usize>]) -> Result<String> {
    let groups = cycles.iter().map(Vec::len).dedup_with_count().collect_vec();
    let mut fields = Vec::with_capacity(2 * groups.len() + 2);
    for &(count, size) in &groups {
        if count > 1 {
            fields.push(count as u64);
            fields.push(size as u64);
        }
    }
    fields.push(0);
    fields.extend(groups.iter().filter(|&&(count, _)| count == 1).map(|&(_, size)| size as u64));
    fields.push(0);

    let mut writer = BitWriter::new();
    writer.pack_fields(bit_width(n), fields)?;
    writer.pad_to_char();
    Ok(writer.into_string())
}

/// Reads the run-length structure back into the canonical size sequence.
/// The running total is bounded by n before anything is materialized, so a
/// malformed stream cannot demand more memory than a valid one.
fn decode_cycle_sizes(n: usize, reader: &mut BitReader) -> Result<Vec<usize>> {
    let width = bit_width(n);
    let mut sizes = Vec::new();
    let mut total = 0usize;
    loop {
        let count = reader.read_field(width, "orbit size run")? as usize;
        if count == 0 {
            break;
        }
        let size = reader.read_field(width, "orbit size run")? as usize;
        if size == 0 {
            return Err(Error::RunLengthPairMissingSize);
        }
        total = total.saturating_add(count.saturating_mul(size));
        if total > n {
            return Err(Error::VertexCountMismatch { declared: n, actual: total });
        }
        sizes.extend(repeat_n(size, count));
    }
    loop {
        let size = reader.read_field(width, "orbit size")? as usize;
        if size == 0 {
            break;
        }
        total += size;
        if total > n {
            return Err(Error::VertexCountMismatch { declared: n, actual: total });
        }
        sizes.push(size);
    }
    if total != n {
        return Err(Error::VertexCountMismatch { declared: n, actual: total });
    }
    // Multi pairs and singles were emitted as two runs, which may interleave
    // differently than the canonical walk; re-sorting restores it.
    canonical_size_order(&mut sizes);
    Ok(sizes)
}

/// Emits the token stream over orbit pairs (i,j), j <= i, in ascending nested
/// order: a navigation token whenever the source orbit advances, a target
/// token per populated pair, and one value token per residue. Token fields
/// are `bit_width(k)` bits for orbit indices and `bit_width(gcd)` bits for
/// residues, so the decoder can mirror the widths without extra data.
fn encode_sparse_adjacency(graph: &Graph, cycles: &[Vec<usize>]) -> String {
    let k = cycles.len();
    let width = bit_width(k);
    let mut writer = BitWriter::new();
    let mut position = 1;
    for i in 1..=k {
        let source = cycles[i - 1][0];
        let adjacent: FHashSet<usize> = graph.neighbors(source).iter().copied().collect();
        for j in 1..=i {
            let modulus = cycles[i - 1].len().gcd(cycles[j - 1].len());
            let residues: BTreeSet<usize> = cycles[j - 1]
                .iter()
                .enumerate()
                .filter(|&(_, target)| adjacent.contains(target))
                .map(|(index, _)| index % modulus)
                .collect();
            if residues.is_empty() {
                continue;
            }
            if position != i {
                writer.push_bit(false);
                writer.push_field(i as u64, width);
                position = i;
            }
            writer.push_bit(false);
            writer.push_field(j as u64, width);
            let delta_width = bit_width(modulus);
            for residue in residues {
                writer.push_bit(true);
                writer.push_field(residue as u64, delta_width);
            }
        }
    }
    writer.pad_to_char();
    writer.into_string()
}

/// Parses the token stream into residue lists per (source, target) orbit
/// pair, upper triangle only (source >= target).
///
/// After a flag-0 bit, an index equal to the current position or below is a
/// target, a larger one a navigation: pairs are visited with the source
/// ascending, so the two cases cannot collide. A zero index, the zero padding
/// of the last character, or a clean end at a token boundary terminates the
/// stream.
fn decode_adjacency(
    sizes: &[usize],
    reader: &mut BitReader,
) -> Result<FHashMap<(usize, usize), Vec<usize>>> {
    let k = sizes.len();
    let width = bit_width(k);
    let mut deltas: FHashMap<(usize, usize), Vec<usize>> = FHashMap::default();
    let mut position = 1;
    let mut target: Option<(usize, u32)> = None;
    loop {
        let Some(flag) = reader.try_read_bit()? else {
            break;
        };
        if flag {
            let Some((u, delta_width)) = target else {
                return Err(Error::ValueBeforeTarget);
            };
            let delta = reader.read_field(delta_width, "orbit residue")? as usize;
            deltas.entry((position, u)).or_default().push(delta);
        } else {
            let index = match reader.read_field_or_padding(width, "orbit index")? {
                None | Some(0) => break,
                Some(index) => index as usize,
            };
            if index > k {
                return Err(Error::OrbitIndexOutOfRange { index, k });
            }
            if index > position {
                position = index;
                target = None;
            } else {
                let modulus = sizes[position - 1].gcd(sizes[index - 1]);
                target = Some((index, bit_width(modulus)));
            }
        }
    }
    Ok(deltas)
}

/// Expands residues into the full neighbor table.
///
/// A residue x of pair (source, target) stands for more than one edge per
/// source vertex when the orbit sizes differ: the automorphism power that
/// fixes the source orbit steps through the target orbit by the source orbit
/// size, so x generates the whole coset of that subgroup. Crossing from the
/// upper triangle to the mirrored pair flips the sign of x.
fn expand(sizes: &[usize], deltas: &FHashMap<(usize, usize), Vec<usize>>) -> Graph {
    let k = sizes.len();
    let mut offsets = vec![0; k + 1];
    for (i, &size) in sizes.iter().enumerate() {
        offsets[i + 1] = offsets[i] + size;
    }
    let mut rows = vec![Vec::new(); offsets[k]];
    for source in 1..=k {
        for target in 1..=k {
            let pair = (source.max(target), source.min(target));
            let Some(residues) = deltas.get(&pair) else {
                continue;
            };
            let sign: i64 = if source >= target { 1 } else { -1 };
            let source_size = sizes[source - 1];
            let target_size = sizes[target - 1];
            for &x in residues {
                for i in 0..source_size {
                    let mut step = 0;
                    loop {
                        let t = (i as i64 + sign * x as i64 + step as i64)
                            .rem_euclid(target_size as i64) as usize;
                        rows[offsets[source - 1] + i].push(offsets[target - 1] + t + 1);
                        step = (step + source_size) % target_size;
                        if step == 0 {
                            break;
                        }
                    }
                }
            }
        }
    }
    Graph::from_rows(rows)
}
