use clap::Parser;
use orbit_coding::bench::{Benchmark, Config};
use std::io;
use std::path::PathBuf;

/// Round-trip check and compression report for graphs with known
/// automorphisms.
#[derive(Clone, Debug, Parser, PartialEq)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Record file: per record, a `n,index,automorphism_count` header line,
    /// one plain-format graph line, and one comma-separated image line per
    /// automorphism.
    file: PathBuf,

    #[clap(flatten)]
    config: Config,
}

impl Args {
    fn benchmark(self) -> Benchmark {
        Benchmark { path: self.file, config: self.config }
    }
}

fn main() -> io::Result<()> {
    Args::parse().benchmark().timed_run()
}
