//! Typed heterogeneous constraint graph.
//!
//! Node kinds and relations use the names expected by the downstream
//! graph-neural-network code: `var`, `con`, `soc` and `v2c`, `c2v`, `s2c`,
//! `c2s`. Node features live under `x`, edge weights under `A`.

use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

/// Node kind of a heterogeneous constraint graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// Plain decision variable.
    #[serde(rename = "var")]
    Variable,
    /// Linear constraint (row of A).
    #[serde(rename = "con")]
    Constraint,
    /// Auxiliary second-order-cone variable.
    #[serde(rename = "soc")]
    ConeVariable,
}

impl NodeKind {
    /// All node kinds, in storage order.
    pub const ALL: [NodeKind; 3] = [NodeKind::Variable, NodeKind::Constraint, NodeKind::ConeVariable];

    /// Short name used by the graph consumer.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Variable => "var",
            NodeKind::Constraint => "con",
            NodeKind::ConeVariable => "soc",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Directed edge relation between two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Relation {
    /// variable → constraint
    #[serde(rename = "v2c")]
    VarToCon,
    /// constraint → variable
    #[serde(rename = "c2v")]
    ConToVar,
    /// cone variable → constraint
    #[serde(rename = "s2c")]
    ConeToCon,
    /// constraint → cone variable
    #[serde(rename = "c2s")]
    ConToCone,
}

impl Relation {
    /// All relations, in storage order.
    pub const ALL: [Relation; 4] = [
        Relation::VarToCon,
        Relation::ConToVar,
        Relation::ConeToCon,
        Relation::ConToCone,
    ];

    /// Short name used by the graph consumer.
    pub fn name(&self) -> &'static str {
        match self {
            Relation::VarToCon => "v2c",
            Relation::ConToVar => "c2v",
            Relation::ConeToCon => "s2c",
            Relation::ConToCone => "c2s",
        }
    }

    /// Kind of the source endpoint.
    pub fn source(&self) -> NodeKind {
        match self {
            Relation::VarToCon => NodeKind::Variable,
            Relation::ConeToCon => NodeKind::ConeVariable,
            Relation::ConToVar | Relation::ConToCone => NodeKind::Constraint,
        }
    }

    /// Kind of the destination endpoint.
    pub fn target(&self) -> NodeKind {
        self.reverse().source()
    }

    /// The mirror relation, carrying the same incidences reversed.
    pub fn reverse(&self) -> Relation {
        match self {
            Relation::VarToCon => Relation::ConToVar,
            Relation::ConToVar => Relation::VarToCon,
            Relation::ConeToCon => Relation::ConToCone,
            Relation::ConToCone => Relation::ConeToCon,
        }
    }

    /// Whether this relation points from a variable kind to constraints.
    pub fn is_forward(&self) -> bool {
        self.target() == NodeKind::Constraint
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.source(), self.name(), self.target())
    }
}

/// Nodes of one kind with their feature matrix (one row per node).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStore {
    kind: NodeKind,
    x: Array2<f64>,
}

impl NodeStore {
    pub(crate) fn new(kind: NodeKind, x: Array2<f64>) -> Self {
        Self { kind, x }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node features (`x`), shape `(len, feature_dim)`.
    pub fn features(&self) -> &Array2<f64> {
        &self.x
    }
}

/// Edges of one relation with their weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeStore {
    relation: Relation,
    src: Vec<usize>,
    dst: Vec<usize>,
    #[serde(rename = "A")]
    weights: Vec<f64>,
}

impl EdgeStore {
    pub(crate) fn new(relation: Relation, src: Vec<usize>, dst: Vec<usize>, weights: Vec<f64>) -> Self {
        Self {
            relation,
            src,
            dst,
            weights,
        }
    }

    /// The mirror edge set: same incidences and weights, endpoints swapped.
    pub(crate) fn mirrored(&self) -> Self {
        Self {
            relation: self.relation.reverse(),
            src: self.dst.clone(),
            dst: self.src.clone(),
            weights: self.weights.clone(),
        }
    }

    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Source node indices.
    pub fn src(&self) -> &[usize] {
        &self.src
    }

    /// Destination node indices.
    pub fn dst(&self) -> &[usize] {
        &self.dst
    }

    /// Edge weights (`A`).
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Iterate over `(src, dst, weight)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.src
            .iter()
            .zip(&self.dst)
            .zip(&self.weights)
            .map(|((&s, &d), &w)| (s, d, w))
    }
}

/// Heterogeneous multigraph built from a program's coefficient data.
///
/// Only the encoder creates graphs; once built, topology and features are
/// read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeteroGraph {
    nodes: Vec<NodeStore>,
    edges: Vec<EdgeStore>,
}

impl HeteroGraph {
    pub(crate) fn new(nodes: Vec<NodeStore>, edges: Vec<EdgeStore>) -> Self {
        Self { nodes, edges }
    }

    /// Node kinds present in this graph.
    pub fn node_kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.nodes.iter().map(|n| n.kind)
    }

    /// Relations present in this graph.
    pub fn relations(&self) -> impl Iterator<Item = Relation> + '_ {
        self.edges.iter().map(|e| e.relation)
    }

    /// Node store of a kind, if present.
    pub fn nodes(&self, kind: NodeKind) -> Option<&NodeStore> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    /// Edge store of a relation, if present.
    pub fn edges(&self, relation: Relation) -> Option<&EdgeStore> {
        self.edges.iter().find(|e| e.relation == relation)
    }

    /// Number of nodes of a kind (0 if the kind is absent).
    pub fn num_nodes(&self, kind: NodeKind) -> usize {
        self.nodes(kind).map_or(0, NodeStore::len)
    }

    /// Number of edges of a relation (0 if the relation is absent).
    pub fn num_edges(&self, relation: Relation) -> usize {
        self.edges(relation).map_or(0, EdgeStore::len)
    }

    /// Node features (`x`) of a kind.
    pub fn node_features(&self, kind: NodeKind) -> Option<&Array2<f64>> {
        self.nodes(kind).map(NodeStore::features)
    }

    /// Edge weights (`A`) of a relation.
    pub fn edge_weights(&self, relation: Relation) -> Option<&[f64]> {
        self.edges(relation).map(EdgeStore::weights)
    }

    /// Whether cone variables form their own node kind.
    pub fn is_cone_aware(&self) -> bool {
        self.nodes(NodeKind::ConeVariable).is_some()
    }

    /// Node and edge counts.
    pub fn summary(&self) -> GraphSummary {
        GraphSummary {
            nodes: self.nodes.iter().map(|n| (n.kind, n.len())).collect(),
            edges: self.edges.iter().map(|e| (e.relation, e.len())).collect(),
        }
    }

    /// Verify the structural invariants of the graph.
    ///
    /// Graphs from the encoder always pass; this guards graphs read back
    /// from disk.
    pub fn check_consistency(&self) -> GraphResult<()> {
        for (i, n) in self.nodes.iter().enumerate() {
            if self.nodes[..i].iter().any(|m| m.kind == n.kind) {
                return Err(GraphError::Inconsistent(format!("node kind {} appears twice", n.kind)));
            }
        }

        for (i, e) in self.edges.iter().enumerate() {
            let rel = e.relation;
            if self.edges[..i].iter().any(|f| f.relation == rel) {
                return Err(GraphError::Inconsistent(format!("relation {} appears twice", rel.name())));
            }
            if e.src.len() != e.weights.len() || e.dst.len() != e.weights.len() {
                return Err(GraphError::Inconsistent(format!(
                    "relation {} has {} sources, {} destinations and {} weights",
                    rel.name(),
                    e.src.len(),
                    e.dst.len(),
                    e.weights.len()
                )));
            }

            for (kind, idx) in [(rel.source(), &e.src), (rel.target(), &e.dst)] {
                let Some(store) = self.nodes(kind) else {
                    return Err(GraphError::Inconsistent(format!(
                        "relation {} references missing node kind {}",
                        rel.name(),
                        kind
                    )));
                };
                if let Some(&bad) = idx.iter().find(|&&k| k >= store.len()) {
                    return Err(GraphError::Inconsistent(format!(
                        "relation {} references {} node {} but only {} exist",
                        rel.name(),
                        kind,
                        bad,
                        store.len()
                    )));
                }
            }

            let Some(mirror) = self.edges(rel.reverse()) else {
                return Err(GraphError::Inconsistent(format!(
                    "relation {} has no mirror {}",
                    rel.name(),
                    rel.reverse().name()
                )));
            };
            let same_weights = e
                .weights
                .iter()
                .zip(&mirror.weights)
                .all(|(a, b)| a.to_bits() == b.to_bits());
            if e.src != mirror.dst || e.dst != mirror.src || !same_weights {
                return Err(GraphError::Inconsistent(format!(
                    "relations {} and {} are not mirrors",
                    rel.name(),
                    rel.reverse().name()
                )));
            }
        }

        Ok(())
    }
}

/// Node count per kind and edge count per relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSummary {
    pub nodes: Vec<(NodeKind, usize)>,
    pub edges: Vec<(Relation, usize)>,
}

impl fmt::Display for GraphSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes: Vec<String> = self.nodes.iter().map(|(k, n)| format!("{}={}", k, n)).collect();
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|(r, n)| format!("{}={}", r.name(), n))
            .collect();
        write!(f, "nodes[{}] edges[{}]", nodes.join(" "), edges.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn tiny_graph() -> HeteroGraph {
        let forward = EdgeStore::new(Relation::VarToCon, vec![0, 1], vec![0, 0], vec![1.5, -2.0]);
        let reverse = forward.mirrored();
        HeteroGraph::new(
            vec![
                NodeStore::new(NodeKind::Variable, Array2::zeros((2, 1))),
                NodeStore::new(NodeKind::Constraint, Array2::zeros((1, 2))),
            ],
            vec![forward, reverse],
        )
    }

    #[test]
    fn test_relation_endpoints() {
        for rel in Relation::ALL {
            assert_eq!(rel.reverse().reverse(), rel);
            assert_eq!(rel.source(), rel.reverse().target());
            assert_ne!(rel.is_forward(), rel.reverse().is_forward());
        }
        assert_eq!(Relation::ConeToCon.source(), NodeKind::ConeVariable);
        assert_eq!(Relation::ConToCone.target(), NodeKind::ConeVariable);
    }

    #[test]
    fn test_names() {
        assert_eq!(NodeKind::ConeVariable.to_string(), "soc");
        assert_eq!(Relation::ConToVar.to_string(), "(con, c2v, var)");
    }

    #[test]
    fn test_tiny_graph_is_consistent() {
        let g = tiny_graph();
        assert!(g.check_consistency().is_ok());
        assert_eq!(g.num_edges(Relation::ConToVar), 2);
        assert_eq!(g.num_nodes(NodeKind::ConeVariable), 0);
        assert!(!g.is_cone_aware());
        assert_eq!(g.summary().to_string(), "nodes[var=2 con=1] edges[v2c=2 c2v=2]");
    }

    #[test]
    fn test_broken_mirror_is_detected() {
        let mut g = tiny_graph();
        g.edges[1].weights[0] = 9.0;
        assert!(matches!(g.check_consistency(), Err(GraphError::Inconsistent(_))));
    }

    #[test]
    fn test_out_of_range_endpoint_is_detected() {
        let mut g = tiny_graph();
        g.edges[0].src[1] = 7;
        g.edges[1].dst[1] = 7;
        let err = g.check_consistency().unwrap_err();
        assert!(err.to_string().contains("node 7"), "{}", err);
    }
}
