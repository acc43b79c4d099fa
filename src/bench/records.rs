//! Reader for automorphism record files.
//!
//! A record is a header line `n,index,automorphism_count`, one plain-format
//! graph line, and `automorphism_count` comma-separated image lines. Records
//! follow one another until an empty line or the end of the input.

use crate::permutable::graph::Graph;
use crate::permutable::Permutation;
use std::io::{BufRead, Error, ErrorKind, Lines, Result};

/// One graph together with the automorphisms listed for it.
#[derive(Clone, Debug)]
pub struct Record {
    pub index: usize,
    pub graph: Graph,
    pub automorphisms: Vec<Permutation>,
}

/// Reads up to `max_records` records (all of them if `None`).
pub fn read_records<R: BufRead>(reader: R, max_records: Option<usize>) -> Result<Vec<Record>> {
    let mut lines = reader.lines();
    let mut records = Vec::new();
    while max_records.is_none_or(|max| records.len() < max) {
        let Some(header) = lines.next() else {
            break;
        };
        let header = header?;
        if header.trim().is_empty() {
            break;
        }
        records.push(read_record(&header, &mut lines)?);
    }
    Ok(records)
}

fn read_record<R: BufRead>(header: &str, lines: &mut Lines<R>) -> Result<Record> {
    let fields = parse_csv_line(header, "header")?;
    let [n, index, automorphism_count] = fields[..] else {
        return Err(invalid(format!("header must hold 3 fields: {header:?}")));
    };
    let graph_line = next_line(lines, "graph")?;
    let graph = Graph::simple_decode(graph_line.trim()).map_err(invalid)?;
    if graph.n() != n {
        return Err(invalid(format!("header declares n={n}, graph line has n={}", graph.n())));
    }
    let mut automorphisms = Vec::new();
    for _ in 0..automorphism_count {
        let line = next_line(lines, "automorphism")?;
        let images = parse_csv_line(&line, "automorphism")?;
        if images.len() != n {
            return Err(invalid(format!("automorphism holds {} images, expected {n}", images.len())));
        }
        automorphisms.push(Permutation::new(images).map_err(invalid)?);
    }
    Ok(Record { index, graph, automorphisms })
}

fn next_line<R: BufRead>(lines: &mut Lines<R>, what: &str) -> Result<String> {
    lines
        .next()
        .ok_or_else(|| invalid(format!("record ends before its {what} line")))?
}

fn parse_csv_line(line: &str, what: &str) -> Result<Vec<usize>> {
    line.trim()
        .split(',')
        .map(|field| {
            field
                .trim()
                .parse()
                .map_err(|_| invalid(format!("cannot parse {what} field {field:?}")))
        })
        .collect()
}

fn invalid(error: impl ToString) -> Error {
    Error::new(ErrorKind::InvalidData, error.to_string())
}
