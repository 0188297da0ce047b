//! Graph and fractional edge values.

use crate::error::{SepError, SepResult};

/// Largest supported node count. Interval bounds are `i32`, so every vertex
/// id and its successor must fit.
pub const MAX_NODES: usize = i32::MAX as usize;

/// Undirected graph given as an ordered edge list.
///
/// Immutable once constructed; edge indices refer to positions in `edges`.
/// At most [`MAX_NODES`] nodes.
#[derive(Debug, Clone)]
pub struct Graph {
    node_count: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Create a graph, validating every edge.
    pub fn new(node_count: usize, edges: Vec<(usize, usize)>) -> SepResult<Self> {
        if node_count == 0 {
            return Err(SepError::InvalidInput("graph has no nodes".to_string()));
        }
        if node_count > MAX_NODES {
            return Err(SepError::InvalidInput(format!(
                "{} nodes exceed the limit of {}",
                node_count, MAX_NODES
            )));
        }

        for (e, &(u, v)) in edges.iter().enumerate() {
            if u >= node_count || v >= node_count {
                return Err(SepError::InvalidInput(format!(
                    "edge {} = ({}, {}) has an endpoint outside [0, {})",
                    e, u, v, node_count
                )));
            }
            if u == v {
                return Err(SepError::InvalidInput(format!(
                    "edge {} is a loop on node {}",
                    e, u
                )));
            }
        }

        Ok(Self { node_count, edges })
    }

    /// Create a graph from a flat endpoint list `[u0, v0, u1, v1, ...]`.
    pub fn from_flat(node_count: usize, elist: &[usize]) -> SepResult<Self> {
        if elist.len() % 2 != 0 {
            return Err(SepError::InvalidInput(format!(
                "flat edge list has odd length {}",
                elist.len()
            )));
        }
        let edges = elist.chunks_exact(2).map(|p| (p[0], p[1])).collect();
        Self::new(node_count, edges)
    }

    /// Cycle 0-1-...-(n-1)-0.
    pub fn cycle(n: usize) -> SepResult<Self> {
        if n < 3 {
            return Err(SepError::InvalidInput(format!("cycle needs 3 nodes, got {}", n)));
        }
        Self::new(n, (0..n).map(|i| (i, (i + 1) % n)).collect())
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Edge list in input order.
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Endpoints of edge `e`.
    pub fn edge(&self, e: usize) -> (usize, usize) {
        self.edges[e]
    }

    /// Incident edge indices for every node.
    pub fn incidence(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.node_count];
        for (e, &(u, v)) in self.edges.iter().enumerate() {
            adj[u].push(e);
            adj[v].push(e);
        }
        adj
    }
}

/// One fractional value per graph edge, in edge-list order.
///
/// The degree and range invariants of an LP relaxation are deliberately not
/// enforced here: values come from a solver or generator and are untrusted.
/// Non-finite values are the exception and are rejected as `InvalidInput`.
#[derive(Debug, Clone)]
pub struct FractionalSolution {
    values: Vec<f64>,
}

impl FractionalSolution {
    /// Wrap a value vector.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Wrap a value vector and check it against `graph`.
    pub fn for_graph(graph: &Graph, values: Vec<f64>) -> SepResult<Self> {
        let x = Self::new(values);
        x.validate(graph)?;
        Ok(x)
    }

    /// Check length and finiteness against `graph`.
    pub fn validate(&self, graph: &Graph) -> SepResult<()> {
        if self.values.len() != graph.edge_count() {
            return Err(SepError::InvalidInput(format!(
                "{} fractional values for {} edges",
                self.values.len(),
                graph.edge_count()
            )));
        }
        if let Some(e) = self.values.iter().position(|v| !v.is_finite()) {
            return Err(SepError::InvalidInput(format!(
                "value for edge {} is not finite",
                e
            )));
        }
        Ok(())
    }

    /// All values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of edge `e`.
    pub fn get(&self, e: usize) -> f64 {
        self.values[e]
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of values over the edges incident to each node.
    pub fn incident_sums(&self, graph: &Graph) -> Vec<f64> {
        let mut sums = vec![0.0; graph.node_count()];
        for (&(u, v), &x) in graph.edges().iter().zip(&self.values) {
            sums[u] += x;
            sums[v] += x;
        }
        sums
    }

    /// Largest amount by which any node's incident sum exceeds 2.
    ///
    /// Zero when the degree bound holds everywhere.
    pub fn max_degree_excess(&self, graph: &Graph) -> f64 {
        self.incident_sums(graph)
            .into_iter()
            .map(|s| s - 2.0)
            .fold(0.0_f64, f64::max)
    }
}

/// Check a graph/solution pair before any separation work.
pub fn validate_input(graph: &Graph, x: &FractionalSolution) -> SepResult<()> {
    if graph.edge_count() == 0 {
        return Err(SepError::InvalidInput("graph has no edges".to_string()));
    }
    if x.is_empty() {
        return Err(SepError::InvalidInput("fractional solution is empty".to_string()));
    }
    x.validate(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_edges() {
        assert!(Graph::new(0, vec![]).is_err());
        assert!(Graph::new(3, vec![(0, 3)]).is_err());
        assert!(Graph::new(3, vec![(1, 1)]).is_err());
        assert!(Graph::from_flat(3, &[0, 1, 2]).is_err());
        assert!(matches!(
            Graph::new(MAX_NODES + 1, vec![(0, 1)]),
            Err(SepError::InvalidInput(_))
        ));

        let g = Graph::from_flat(3, &[0, 1, 1, 2]).unwrap();
        assert_eq!(g.edges(), &[(0, 1), (1, 2)]);
    }

    #[test]
    fn test_solution_validation() {
        let g = Graph::cycle(4).unwrap();
        assert!(FractionalSolution::for_graph(&g, vec![1.0; 3]).is_err());
        assert!(FractionalSolution::for_graph(&g, vec![1.0, f64::NAN, 1.0, 1.0]).is_err());
        assert!(FractionalSolution::for_graph(&g, vec![1.0; 4]).is_ok());

        let empty = Graph::new(2, vec![]).unwrap();
        assert!(validate_input(&empty, &FractionalSolution::new(vec![])).is_err());
    }

    #[test]
    fn test_degree_excess() {
        let g = Graph::cycle(5).unwrap();
        let x = FractionalSolution::new(vec![1.0; 5]);
        assert_eq!(x.max_degree_excess(&g), 0.0);

        // Node 1 gets 1.5 + 1.0
        let x = FractionalSolution::new(vec![1.5, 1.0, 1.0, 1.0, 1.0]);
        assert!((x.max_degree_excess(&g) - 0.5).abs() < 1e-12);
    }
}
