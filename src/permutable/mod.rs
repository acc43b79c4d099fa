//! Bijections on {1..n} and their cyclic decompositions.

use crate::codec::{Error, Result};
use fxhash::FxBuildHasher;
use itertools::Itertools;
use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};
use std::fmt;

pub mod graph;

pub(crate) type FHashMap<K, V> = HashMap<K, V, FxBuildHasher>;
pub(crate) type FHashSet<K> = HashSet<K, FxBuildHasher>;

/// A bijection on {1..n}, stored by its image array.
///
/// Construction checks that every image lies in [1,n]. Bijectivity beyond
/// that is not verified; an array with repeated images silently corrupts
/// downstream results.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    pub fn new(images: Vec<usize>) -> Result<Self> {
        let n = images.len();
        for &image in &images {
            if !(1..=n).contains(&image) {
                return Err(Error::ImageOutOfRange { image, n });
            }
        }
        Ok(Self { images })
    }

    pub fn identity(n: usize) -> Self {
        Self { images: (1..=n).collect() }
    }

    /// The permutation with the given cycles; vertices not mentioned are
    /// fixed.
    pub fn from_cycles(n: usize, cycles: &[Vec<usize>]) -> Result<Self> {
        let mut images: Vec<usize> = (1..=n).collect();
        for cycle in cycles {
            for (&x, &y) in cycle.iter().circular_tuple_windows() {
                if !(1..=n).contains(&x) {
                    return Err(Error::ImageOutOfRange { image: x, n });
                }
                images[x - 1] = y;
            }
        }
        Self::new(images)
    }

    /// Size of the domain.
    pub fn n(&self) -> usize {
        self.images.len()
    }

    /// Image of `x`, which must lie in 1..=n.
    pub fn apply(&self, x: usize) -> usize {
        self.images[x - 1]
    }

    /// Maps every element of `xs` through the permutation.
    pub fn apply_slice_in_place(&self, xs: &mut [usize]) {
        for x in xs {
            *x = self.apply(*x);
        }
    }

    pub fn inverse(&self) -> Self {
        let mut images = vec![0; self.n()];
        for (i, &x) in self.images.iter().enumerate() {
            images[x - 1] = i + 1;
        }
        Self { images }
    }

    /// The cycles of the permutation in canonical order. Every vertex of
    /// {1..n} appears in exactly one cycle, and each cycle starts at its
    /// minimal element because cycles are grown from the smallest unvisited
    /// vertex.
    pub fn cyclic_decomposition(&self) -> Vec<Vec<usize>> {
        let mut visited = vec![false; self.n()];
        let mut cycles = Vec::new();
        for start in 1..=self.n() {
            if visited[start - 1] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut current = start;
            loop {
                visited[current - 1] = true;
                cycle.push(current);
                current = self.apply(current);
                if current == start {
                    break;
                }
            }
            cycles.push(cycle);
        }
        canonical_cycle_order(&mut cycles);
        cycles
    }
}

impl fmt::Display for Permutation {
    /// Renders the cyclic decomposition, e.g. `(1,3,2)(4)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cycle in self.cyclic_decomposition() {
            write!(f, "({})", cycle.iter().join(","))?;
        }
        Ok(())
    }
}

/// Orders cycles canonically: descending length, ties by ascending minimal
/// element. Encoder and decoder must agree on orbit indices without
/// communicating; [`canonical_size_order`] is the decoder's counterpart.
/// Cycles must start at their minimal element, which
/// [`Permutation::cyclic_decomposition`] guarantees.
pub fn canonical_cycle_order(cycles: &mut [Vec<usize>]) {
    cycles.sort_by_key(|cycle| (Reverse(cycle.len()), cycle[0]));
}

/// Canonical order of a bare cycle-size sequence: descending. This matches
/// [`canonical_cycle_order`] from the decoder's side, where only sizes are
/// known: orbit offsets depend on the ordered sizes alone, so equal-size ties
/// need no breaking.
pub fn canonical_size_order(sizes: &mut [usize]) {
    sizes.sort_unstable_by_key(|&size| Reverse(size));
}
