//! The graph adjacency structure and its plain text format.

use crate::codec::{Error, Result};
use crate::permutable::{FHashSet, Permutation};
use rayon::prelude::*;
use std::mem;

/// Undirected graph over vertices 1..=n, stored as ordered neighbor lists.
///
/// Every edge is expected in both endpoints' lists; the structure itself does
/// not enforce this. Equality compares neighbor lists as sets per vertex,
/// which is only sound for graphs without parallel edges.
#[derive(Clone, Debug)]
pub struct Graph {
    rows: Vec<Vec<usize>>,
}

impl Graph {
    /// Builds a graph from the neighbor lists of vertices 1..=n, checking
    /// that every neighbor lies in [1,n].
    pub fn new(rows: Vec<Vec<usize>>) -> Result<Self> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            for &neighbor in row {
                if !(1..=n).contains(&neighbor) {
                    return Err(Error::NeighborOutOfRange { vertex: i + 1, neighbor, n });
                }
            }
        }
        Ok(Self { rows })
    }

    pub fn empty(n: usize) -> Self {
        Self { rows: vec![Vec::new(); n] }
    }

    /// Builds an undirected graph by inserting each edge in both directions.
    pub fn from_edges(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut rows = vec![Vec::new(); n];
        for (i, j) in edges {
            for vertex in [i, j] {
                if !(1..=n).contains(&vertex) {
                    return Err(Error::NeighborOutOfRange { vertex, neighbor: vertex, n });
                }
            }
            rows[i - 1].push(j);
            if i != j {
                rows[j - 1].push(i);
            }
        }
        Ok(Self { rows })
    }

    /// Rows already known to be in range; used by the orbit decoder.
    pub(crate) fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        Self { rows }
    }

    /// Number of vertices.
    pub fn n(&self) -> usize {
        self.rows.len()
    }

    /// Number of edges; every edge is counted once from each endpoint.
    pub fn m(&self) -> usize {
        self.rows.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Neighbors of vertex `v` (1-based), in stored order.
    pub fn neighbors(&self, v: usize) -> &[usize] {
        &self.rows[v - 1]
    }

    pub fn vertices(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.n()
    }

    /// Neighbor-list view; `rows()[i]` holds the neighbors of vertex `i + 1`.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// Renders `"<n>:<nbrs of 1>,;<nbrs of 2>,;...;"`: every neighbor is
    /// followed by a comma, every vertex's list terminated by a semicolon.
    pub fn simple_encode(&self) -> String {
        let mut out = format!("{}:", self.n());
        for row in &self.rows {
            for neighbor in row {
                out.push_str(&neighbor.to_string());
                out.push(',');
            }
            out.push(';');
        }
        out
    }

    /// Parses the plain format. Neighbor runs may carry a trailing comma
    /// (`1,2,;` as written by [`Graph::simple_encode`]) or not (`1,2;`).
    pub fn simple_decode(encoded: &str) -> Result<Self> {
        let bytes = encoded.as_bytes();
        let mut pos = 0;
        let n = parse_int(bytes, &mut pos)?;
        if bytes.get(pos) != Some(&b':') {
            return Err(Error::Plain { at: pos, reason: "expected ':'" });
        }
        pos += 1;
        let mut rows = Vec::new();
        for _ in 0..n {
            let mut row = Vec::new();
            while bytes.get(pos) != Some(&b';') {
                row.push(parse_int(bytes, &mut pos)?);
                match bytes.get(pos) {
                    Some(b',') => pos += 1,
                    Some(b';') => {}
                    _ => return Err(Error::Plain { at: pos, reason: "expected ',' or ';'" }),
                }
            }
            pos += 1;
            rows.push(row);
        }
        Self::new(rows)
    }

    /// Relabels vertex i to p(i): the new vertex p(i) takes over vertex i's
    /// neighbor list, with every entry mapped through p. Built by indexed
    /// copy from the inverse image, so no row is moved twice.
    pub fn apply_morphism(&mut self, p: &Permutation) -> Result<()> {
        if p.n() != self.n() {
            return Err(Error::DomainMismatch { permutation: p.n(), graph: self.n() });
        }
        let n = self.n();
        let inverse = p.inverse();
        let old = mem::take(&mut self.rows);
        self.rows = (0..n)
            .into_par_iter()
            .map(|i| {
                let source = inverse.apply(i + 1);
                old[source - 1].iter().map(|&w| p.apply(w)).collect()
            })
            .collect();
        Ok(())
    }
}

impl PartialEq for Graph {
    /// Per-vertex set comparison; neighbor order and duplicates are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.n() == other.n()
            && self.rows.par_iter().zip(other.rows.par_iter()).all(|(a, b)| {
                let a: FHashSet<usize> = a.iter().copied().collect();
                let b: FHashSet<usize> = b.iter().copied().collect();
                a == b
            })
    }
}

impl Eq for Graph {}

fn parse_int(bytes: &[u8], pos: &mut usize) -> Result<usize> {
    let start = *pos;
    while bytes.get(*pos).is_some_and(u8::is_ascii_digit) {
        *pos += 1;
    }
    if *pos == start {
        return Err(Error::Plain { at: start, reason: "expected a number" });
    }
    std::str::from_utf8(&bytes[start..*pos])
        .ok()
        .and_then(|digits| digits.parse().ok())
        .ok_or(Error::Plain { at: start, reason: "number out of range" })
}

#[cfg(test)]
pub mod tests {
    use super::*;

    /// The cycle 1-2-...-n-1.
    pub fn cycle_graph(n: usize) -> Graph {
        Graph::from_edges(n, (1..=n).map(|i| (i, i % n + 1))).unwrap()
    }

    #[test]
    fn construction_checks_range() {
        assert!(Graph::new(vec![vec![2], vec![1]]).is_ok());
        assert_eq!(
            Graph::new(vec![vec![2], vec![3]]),
            Err(Error::NeighborOutOfRange { vertex: 2, neighbor: 3, n: 2 })
        );
        assert_eq!(
            Graph::new(vec![vec![0]]),
            Err(Error::NeighborOutOfRange { vertex: 1, neighbor: 0, n: 1 })
        );
    }

    #[test]
    fn counts() {
        let graph = cycle_graph(4);
        assert_eq!(graph.n(), 4);
        assert_eq!(graph.m(), 4);
        assert_eq!(graph.neighbors(1), &[2, 4]);
    }

    #[test]
    fn simple_roundtrip() {
        let graph = cycle_graph(4);
        let encoded = graph.simple_encode();
        assert_eq!(encoded, "4:2,4,;1,3,;2,4,;3,1,;");
        assert_eq!(Graph::simple_decode(&encoded).unwrap(), graph);
    }

    #[test]
    fn simple_decode_accepts_bare_runs() {
        let graph = Graph::simple_decode("3:2,3;1;1;").unwrap();
        assert_eq!(graph, Graph::from_edges(3, [(1, 2), (1, 3)]).unwrap());
    }

    #[test]
    fn simple_roundtrip_with_isolated_vertices() {
        let graph = Graph::from_edges(5, [(2, 4)]).unwrap();
        assert_eq!(graph.simple_encode(), "5:;4,;;2,;;");
        assert_eq!(Graph::simple_decode(&graph.simple_encode()).unwrap(), graph);
    }

    #[test]
    fn simple_roundtrip_empty() {
        let graph = Graph::empty(0);
        assert_eq!(graph.simple_encode(), "0:");
        assert_eq!(Graph::simple_decode("0:").unwrap(), graph);
    }

    #[test]
    fn simple_decode_rejects_malformed() {
        assert_eq!(Graph::simple_decode("x"), Err(Error::Plain { at: 0, reason: "expected a number" }));
        assert_eq!(Graph::simple_decode("2"), Err(Error::Plain { at: 1, reason: "expected ':'" }));
        assert_eq!(Graph::simple_decode("2:2,;"), Err(Error::Plain { at: 5, reason: "expected a number" }));
        assert_eq!(Graph::simple_decode("1:2 ;"), Err(Error::Plain { at: 3, reason: "expected ',' or ';'" }));
    }

    #[test]
    fn equality_ignores_order_and_duplicates() {
        let a = Graph::new(vec![vec![2, 3], vec![1], vec![1]]).unwrap();
        let b = Graph::new(vec![vec![3, 2, 2], vec![1], vec![1]]).unwrap();
        let c = Graph::new(vec![vec![2], vec![1], vec![]]).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn morphism_relabels() {
        // Path 1-2-3 relabeled by (1 2 3): the edge set becomes 2-3-1.
        let mut graph = Graph::from_edges(3, [(1, 2), (2, 3)]).unwrap();
        let p = Permutation::new(vec![2, 3, 1]).unwrap();
        graph.apply_morphism(&p).unwrap();
        assert_eq!(graph, Graph::from_edges(3, [(2, 3), (3, 1)]).unwrap());
    }

    #[test]
    fn morphism_roundtrip() {
        use crate::permutable::tests::sample_permutation;
        let original = cycle_graph(7);
        for seed in 0..10 {
            let p = sample_permutation(7, seed);
            let mut graph = original.clone();
            graph.apply_morphism(&p).unwrap();
            graph.apply_morphism(&p.inverse()).unwrap();
            assert_eq!(graph, original);
        }
    }

    #[test]
    fn morphism_rejects_wrong_size() {
        let mut graph = cycle_graph(4);
        assert_eq!(
            graph.apply_morphism(&Permutation::identity(3)),
            Err(Error::DomainMismatch { permutation: 3, graph: 4 })
        );
    }
}
