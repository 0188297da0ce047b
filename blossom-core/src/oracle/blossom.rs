//! Shared blossom bookkeeping for the built-in oracles.
//!
//! A blossom is a handle `H` plus an odd set `F` of boundary edges (the
//! teeth). In odd-cut form it reads
//!
//! ```text
//! x(δ(H) \ F) + Σ_{e ∈ F} (1 - x_e) >= 1
//! ```
//!
//! and with node-disjoint teeth it is the comb with 2-node teeth.

use std::collections::BTreeSet;

use crate::cuts::CutStoreBuilder;
use crate::error::SepResult;
use crate::model::{FractionalSolution, Graph};

/// Union-find over node indices.
pub(crate) struct DisjointSets {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSets {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, mut v: usize) -> usize {
        while self.parent[v] != v {
            self.parent[v] = self.parent[self.parent[v]];
            v = self.parent[v];
        }
        v
    }

    pub(crate) fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
    }
}

/// Components with at least two nodes of the subgraph of edges passing `keep`.
///
/// Each component is sorted; components are ordered by smallest node.
pub(crate) fn components<F>(graph: &Graph, keep: F) -> Vec<Vec<usize>>
where
    F: Fn(usize) -> bool,
{
    let n = graph.node_count();
    let mut sets = DisjointSets::new(n);
    for (e, &(u, v)) in graph.edges().iter().enumerate() {
        if keep(e) {
            sets.union(u, v);
        }
    }

    let mut by_root: Vec<Vec<usize>> = vec![Vec::new(); n];
    for v in 0..n {
        let r = sets.find(v);
        by_root[r].push(v);
    }

    let mut comps: Vec<Vec<usize>> = by_root.into_iter().filter(|c| c.len() >= 2).collect();
    comps.sort_by_key(|c| c[0]);
    comps
}

/// Membership mask for a vertex set.
pub(crate) fn membership(n: usize, handle: &[usize]) -> Vec<bool> {
    let mut mask = vec![false; n];
    for &v in handle {
        mask[v] = true;
    }
    mask
}

/// Edges with exactly one endpoint in the handle.
pub(crate) fn boundary_edges(graph: &Graph, in_handle: &[bool]) -> Vec<usize> {
    graph
        .edges()
        .iter()
        .enumerate()
        .filter(|&(_, &(u, v))| in_handle[u] != in_handle[v])
        .map(|(e, _)| e)
        .collect()
}

/// Left-hand side of the odd-cut form for boundary `boundary` and teeth `teeth`.
pub(crate) fn blossom_slack(x: &FractionalSolution, boundary: &[usize], teeth: &[usize]) -> f64 {
    boundary
        .iter()
        .map(|&e| {
            if teeth.contains(&e) {
                1.0 - x.get(e)
            } else {
                x.get(e)
            }
        })
        .sum()
}

/// Check that no two teeth share an endpoint.
pub(crate) fn teeth_disjoint(graph: &Graph, teeth: &[usize]) -> bool {
    let mut seen = BTreeSet::new();
    teeth.iter().all(|&e| {
        let (u, v) = graph.edge(e);
        seen.insert(u) && seen.insert(v)
    })
}

/// Blossoms already emitted in one oracle call, keyed by handle and teeth.
#[derive(Default)]
pub(crate) struct EmittedBlossoms {
    seen: BTreeSet<(Vec<usize>, Vec<usize>)>,
}

impl EmittedBlossoms {
    /// Append the blossom to `builder` unless an identical one was emitted.
    ///
    /// `handle` and `teeth` must be sorted. Returns true if it was appended.
    pub(crate) fn push(
        &mut self,
        builder: &mut CutStoreBuilder,
        graph: &Graph,
        handle: &[usize],
        teeth: &[usize],
        slack: f64,
    ) -> SepResult<bool> {
        if !self.seen.insert((handle.to_vec(), teeth.to_vec())) {
            return Ok(false);
        }

        builder.begin_cut().push_clique_vertices(handle)?;
        for &e in teeth {
            let (u, v) = graph.edge(e);
            builder.push_clique_vertices(&[u, v])?;
        }
        builder.finish_cut(Some(slack));
        Ok(true)
    }
}
