//! Batch round-trip driver over automorphism record files.

use crate::bench::records::read_records;
use crate::codec::Result;
use crate::orbit::OrbitCodec;
use crate::permutable::graph::Graph;
use crate::permutable::Permutation;
use clap::Parser;
use std::fs::File;
use std::io;
use std::io::{stdout, BufReader, Write};
use std::path::PathBuf;
use timeit::timeit_loops;

pub mod records;

macro_rules! print_flush {
    ( $($t:tt)* ) => {
        {
            print!($($t)*);
            stdout().flush().unwrap();
        }
    }
}

#[derive(Clone, Debug, Parser, PartialEq)]
pub struct Config {
    /// Stop after this many records.
    #[arg(short, long)]
    pub max_records: Option<usize>,

    /// Report progress every this many records.
    #[arg(long, default_value_t = 100)]
    pub progress_every: usize,
}

/// Full encode/decode round trip: compact-encode against the automorphism,
/// decode, relabel from the canonical numbering back to the original one,
/// compare. Returns the encoded length and whether the graphs match.
pub fn roundtrip(codec: &OrbitCodec, graph: &Graph, automorphism: &Permutation) -> Result<(usize, bool)> {
    let encoded = codec.encode(graph, automorphism)?;
    let mut decoded = codec.decode(&encoded)?;
    let relabel = Permutation::new(automorphism.cyclic_decomposition().concat())?;
    decoded.apply_morphism(&relabel)?;
    Ok((encoded.len(), &decoded == graph))
}

pub struct Benchmark {
    pub path: PathBuf,
    pub config: Config,
}

impl Benchmark {
    pub fn timed_run(&self) -> io::Result<()> {
        let mut out = Ok(());
        let time = timeit_loops!(1, { out = self.run(); });
        println!("Finished in {time:.1}s.");
        out
    }

    /// Checks every record's graph against its first listed automorphism and
    /// reports mismatches plus the compact vs. plain sizes.
    pub fn run(&self) -> io::Result<()> {
        let reader = BufReader::new(File::open(&self.path)?);
        let records = read_records(reader, self.config.max_records)?;
        let codec = OrbitCodec::new();
        let mut mismatches = 0;
        let mut plain_total = 0;
        let mut compact_total = 0;
        for (i, record) in records.iter().enumerate() {
            let Some(automorphism) = record.automorphisms.first() else {
                println!("Record {} lists no automorphisms, skipped.", record.index);
                continue;
            };
            match roundtrip(&codec, &record.graph, automorphism) {
                Ok((compact_len, identical)) => {
                    plain_total += record.graph.simple_encode().len();
                    compact_total += compact_len;
                    if !identical {
                        mismatches += 1;
                        println!("Sparse is NOT identical, record {}.", record.index);
                    }
                }
                Err(error) => {
                    mismatches += 1;
                    println!("Record {} failed: {error}.", record.index);
                }
            }
            if self.config.progress_every > 0 && (i + 1) % self.config.progress_every == 0 {
                print_flush!("{} records checked, {mismatches} mismatches.\n", i + 1);
            }
        }
        println!(
            "{} records, {mismatches} mismatches, {compact_total} compact vs {plain_total} plain bytes ({:.1}%).",
            records.len(),
            if plain_total == 0 { 100. } else { 100. * compact_total as f64 / plain_total as f64 },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permutable::graph::tests::cycle_graph;

    #[test]
    fn roundtrip_reports_length_and_match() {
        let graph = cycle_graph(4);
        let automorphism = Permutation::new(vec![2, 3, 4, 1]).unwrap();
        let (len, identical) = roundtrip(&OrbitCodec::new(), &graph, &automorphism).unwrap();
        assert_eq!(len, 7);
        assert!(identical);
    }

    #[test]
    fn roundtrip_detects_non_automorphisms() {
        // A transposition of adjacent and non-adjacent vertices is not an
        // automorphism of the path, so the decoded graph differs.
        let graph = Graph::from_edges(3, [(1, 2), (2, 3)]).unwrap();
        let swap = Permutation::new(vec![2, 1, 3]).unwrap();
        let (_, identical) = roundtrip(&OrbitCodec::new(), &graph, &swap).unwrap();
        assert!(!identical);
    }
}
