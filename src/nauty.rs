//! Conversion to nauty's sparse graph exchange form.

use crate::permutable::graph::Graph;
use itertools::Itertools;
use nauty_Traces_sys::SparseGraph;

impl Graph {
    /// The nauty/Traces sparse representation: per-vertex degrees, edge list
    /// offsets, and the concatenated 0-based neighbor lists. Neighbors are
    /// sorted per vertex so downstream tools see deterministic input.
    pub fn to_sparse_graph(&self) -> SparseGraph {
        let d = self.rows().iter().map(|row| row.len() as i32).collect_vec();
        let v = d
            .iter()
            .scan(0, |acc, &degree| {
                let out = *acc;
                *acc += degree as usize;
                Some(out)
            })
            .collect();
        let e = self
            .rows()
            .iter()
            .flat_map(|row| row.iter().map(|&w| (w - 1) as i32).sorted_unstable())
            .collect();
        SparseGraph { v, d, e }
    }
}
