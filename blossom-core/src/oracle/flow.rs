//! Max-flow and Gomory-Hu cut trees on small undirected networks.

use std::collections::VecDeque;

use crate::error::{SepError, SepResult};

/// Residual capacities below this are treated as saturated.
const FLOW_EPS: f64 = 1e-12;

#[derive(Debug, Clone)]
struct FlowEdge {
    to: usize,
    rev: usize,
    cap: f64,
    init: f64,
}

/// Undirected capacitated network with a Dinic max-flow solver.
///
/// Capacities are restored before every flow computation, so the same
/// network can be queried for many source/sink pairs.
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    adj: Vec<Vec<FlowEdge>>,
    level: Vec<i32>,
    iter: Vec<usize>,
}

impl FlowNetwork {
    /// Network with `n` nodes and no edges.
    pub fn new(n: usize) -> Self {
        Self {
            adj: vec![Vec::new(); n],
            level: vec![0; n],
            iter: vec![0; n],
        }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.adj.len()
    }

    /// Add an undirected edge with capacity `cap` in both directions.
    pub fn add_edge(&mut self, u: usize, v: usize, cap: f64) -> SepResult<()> {
        if !(cap.is_finite() && cap >= 0.0) {
            return Err(SepError::Internal(format!(
                "capacity {} on ({}, {}) must be finite and non-negative",
                cap, u, v
            )));
        }
        let (ru, rv) = (self.adj[v].len(), self.adj[u].len());
        self.adj[u].push(FlowEdge {
            to: v,
            rev: ru,
            cap,
            init: cap,
        });
        self.adj[v].push(FlowEdge {
            to: u,
            rev: rv,
            cap,
            init: cap,
        });
        Ok(())
    }

    fn reset(&mut self) {
        for edges in &mut self.adj {
            for e in edges {
                e.cap = e.init;
            }
        }
    }

    fn bfs(&mut self, s: usize) {
        self.level.fill(-1);
        self.level[s] = 0;
        let mut q = VecDeque::new();
        q.push_back(s);
        while let Some(v) = q.pop_front() {
            for e in &self.adj[v] {
                if e.cap > FLOW_EPS && self.level[e.to] < 0 {
                    self.level[e.to] = self.level[v] + 1;
                    q.push_back(e.to);
                }
            }
        }
    }

    /// Push flow along one `s`-`t` path of the level graph.
    ///
    /// The path is kept on an explicit stack of `(node, arc)` pairs, so depth
    /// is bounded by memory rather than the call stack.
    fn augment(&mut self, s: usize, t: usize) -> f64 {
        let mut path: Vec<(usize, usize)> = Vec::new();
        let mut v = s;

        loop {
            if v == t {
                let f = path
                    .iter()
                    .map(|&(u, i)| self.adj[u][i].cap)
                    .fold(f64::INFINITY, f64::min);
                for &(u, i) in &path {
                    self.adj[u][i].cap -= f;
                    let (to, rev) = (self.adj[u][i].to, self.adj[u][i].rev);
                    self.adj[to][rev].cap += f;
                }
                return f;
            }

            let mut next = None;
            while self.iter[v] < self.adj[v].len() {
                let i = self.iter[v];
                let (to, cap) = (self.adj[v][i].to, self.adj[v][i].cap);
                if cap > FLOW_EPS && self.level[v] < self.level[to] {
                    next = Some((i, to));
                    break;
                }
                self.iter[v] += 1;
            }

            match next {
                Some((i, to)) => {
                    path.push((v, i));
                    v = to;
                }
                // Dead end: retreat and skip the arc that led here
                None => match path.pop() {
                    Some((u, _)) => {
                        self.iter[u] += 1;
                        v = u;
                    }
                    None => return 0.0,
                },
            }
        }
    }

    /// Maximum s-t flow value.
    pub fn max_flow(&mut self, s: usize, t: usize) -> f64 {
        self.reset();
        if s == t {
            return 0.0;
        }
        let mut flow = 0.0;
        loop {
            self.bfs(s);
            if self.level[t] < 0 {
                return flow;
            }
            self.iter.fill(0);
            loop {
                let f = self.augment(s, t);
                if f <= FLOW_EPS {
                    break;
                }
                flow += f;
            }
        }
    }

    /// Nodes reachable from `s` in the residual network of the last flow.
    pub fn source_side(&self, s: usize) -> Vec<bool> {
        let mut side = vec![false; self.node_count()];
        side[s] = true;
        let mut q = VecDeque::from([s]);
        while let Some(v) = q.pop_front() {
            for e in &self.adj[v] {
                if e.cap > FLOW_EPS && !side[e.to] {
                    side[e.to] = true;
                    q.push_back(e.to);
                }
            }
        }
        side
    }
}

/// Gomory-Hu cut tree built with Gusfield's method.
///
/// Removing the tree edge between `v` and `parent(v)` splits the nodes into
/// a minimum `v`/`parent(v)` cut of value `weight(v)`.
#[derive(Debug, Clone)]
pub struct GomoryHuTree {
    root: usize,
    parent: Vec<usize>,
    weight: Vec<f64>,
}

impl GomoryHuTree {
    /// Build the tree, processing nodes in `order` (a permutation).
    pub fn build(net: &mut FlowNetwork, order: &[usize]) -> SepResult<Self> {
        let n = net.node_count();
        if n == 0 || order.len() != n {
            return Err(SepError::Internal(format!(
                "processing order has {} entries for {} nodes",
                order.len(),
                n
            )));
        }

        let root = order[0];
        let mut parent = vec![root; n];
        let mut weight = vec![0.0; n];

        for &s in order.iter().skip(1) {
            let t = parent[s];
            let f = net.max_flow(s, t);
            let side = net.source_side(s);

            weight[s] = f;
            for &v in order {
                if v != s && side[v] && parent[v] == t {
                    parent[v] = s;
                }
            }
            if side[parent[t]] {
                parent[s] = parent[t];
                parent[t] = s;
                weight[s] = weight[t];
                weight[t] = f;
            }
        }

        Ok(Self {
            root,
            parent,
            weight,
        })
    }

    /// Root of the tree.
    pub fn root(&self) -> usize {
        self.root
    }

    /// Parent of `v` (the root is its own parent).
    pub fn parent(&self, v: usize) -> usize {
        self.parent[v]
    }

    /// Cut value of the tree edge above `v`.
    pub fn weight(&self, v: usize) -> f64 {
        self.weight[v]
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.parent.len()
    }

    fn children(&self) -> Vec<Vec<usize>> {
        let mut children = vec![Vec::new(); self.node_count()];
        for v in 0..self.node_count() {
            if v != self.root {
                children[self.parent[v]].push(v);
            }
        }
        children
    }

    /// Nodes in top-down order (every parent before its children).
    fn preorder(&self, children: &[Vec<usize>]) -> Vec<usize> {
        let mut order = Vec::with_capacity(self.node_count());
        let mut stack = vec![self.root];
        while let Some(v) = stack.pop() {
            order.push(v);
            stack.extend(children[v].iter().copied());
        }
        order
    }

    /// Count of `marked` nodes in the subtree below each node.
    pub fn subtree_counts(&self, marked: &[bool]) -> Vec<usize> {
        let children = self.children();
        let mut counts: Vec<usize> = marked.iter().map(|&m| m as usize).collect();
        for &v in self.preorder(&children).iter().rev() {
            if v != self.root {
                counts[self.parent[v]] += counts[v];
            }
        }
        counts
    }

    /// Membership mask of the subtree rooted at `v`: one side of the
    /// fundamental cut of the edge above `v`.
    pub fn subtree_mask(&self, v: usize) -> Vec<bool> {
        let children = self.children();
        let mut mask = vec![false; self.node_count()];
        let mut stack = vec![v];
        while let Some(u) = stack.pop() {
            mask[u] = true;
            stack.extend(children[u].iter().copied());
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Value of the cut `side` in the network defined by `edges`.
    fn cut_value(edges: &[(usize, usize, f64)], side: &[bool]) -> f64 {
        edges
            .iter()
            .filter(|&&(u, v, _)| side[u] != side[v])
            .map(|&(_, _, c)| c)
            .sum()
    }

    fn network(n: usize, edges: &[(usize, usize, f64)]) -> FlowNetwork {
        let mut net = FlowNetwork::new(n);
        for &(u, v, c) in edges {
            net.add_edge(u, v, c).unwrap();
        }
        net
    }

    #[test]
    fn test_max_flow_path_and_parallel() {
        // 0 -> {1, 2} -> 3
        let edges = [(0, 1, 1.0), (1, 3, 0.5), (0, 2, 2.0), (2, 3, 1.5)];
        let mut net = network(4, &edges);
        assert!((net.max_flow(0, 3) - 2.0).abs() < 1e-12);

        let side = net.source_side(0);
        assert!((cut_value(&edges, &side) - 2.0).abs() < 1e-12);

        // Capacities are restored between calls
        assert!((net.max_flow(3, 0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_flow_on_long_path() {
        // Deep enough to overflow a recursive augment on a test thread
        let n = 200_000;
        let mut net = FlowNetwork::new(n);
        for v in 0..n - 1 {
            let cap = if v == n / 2 { 0.25 } else { 1.0 };
            net.add_edge(v, v + 1, cap).unwrap();
        }
        assert!((net.max_flow(0, n - 1) - 0.25).abs() < 1e-12);

        let side = net.source_side(0);
        assert!(side[n / 2] && !side[n / 2 + 1]);
    }

    #[test]
    fn test_rejects_negative_capacity() {
        let mut net = FlowNetwork::new(2);
        assert!(net.add_edge(0, 1, -0.5).is_err());
        assert!(net.add_edge(0, 1, f64::NAN).is_err());
    }

    #[test]
    fn test_gomory_hu_matches_pairwise_flows() {
        use rand::seq::SliceRandom;
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let n = 7;

        for _ in 0..10 {
            let mut edges = Vec::new();
            for u in 0..n {
                for v in u + 1..n {
                    if rng.gen_bool(0.5) {
                        edges.push((u, v, rng.gen_range(0.0..2.0)));
                    }
                }
            }

            let mut net = network(n, &edges);
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(&mut rng);
            let tree = GomoryHuTree::build(&mut net, &order).unwrap();

            for v in 0..n {
                if v == tree.root() {
                    continue;
                }
                // Fundamental cut has the tree weight as its value...
                let side = tree.subtree_mask(v);
                assert!(side[v] && !side[tree.parent(v)]);
                assert!((cut_value(&edges, &side) - tree.weight(v)).abs() < 1e-9);

                // ...and that value is the v/parent min cut.
                let f = net.max_flow(v, tree.parent(v));
                assert!((f - tree.weight(v)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_subtree_counts() {
        let edges = [(0, 1, 3.0), (1, 2, 1.0), (2, 3, 3.0)];
        let mut net = network(4, &edges);
        let tree = GomoryHuTree::build(&mut net, &[0, 1, 2, 3]).unwrap();

        let counts = tree.subtree_counts(&[true, true, true, true]);
        assert_eq!(counts[tree.root()], 4);
        for v in 0..4 {
            let size = tree.subtree_mask(v).iter().filter(|&&m| m).count();
            assert_eq!(counts[v], size);
        }
    }
}
