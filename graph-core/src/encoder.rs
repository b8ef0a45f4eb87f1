//! Matrix-to-graph encoder.
//!
//! Every nonzero `A[i, j]` becomes an edge between variable `j` and
//! constraint `i`, stored once per direction with weight `A[i, j]`.
//!
//! Without a cone mask the graph has two node kinds (`var`, `con`) and the
//! relations `v2c`/`c2v`. With a mask, cone variables form a third kind
//! (`soc`) connected through `s2c`/`c2s`; plain and cone variables are
//! renumbered independently into dense zero-based ranges.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::error::{check_len, GraphResult};
use crate::graph::{EdgeStore, HeteroGraph, NodeKind, NodeStore, Relation};
use crate::partition::IndexRemap;
use crate::program::ConstraintSense;
use crate::sparse::{from_dense, nonzero_incidences, Incidence, SparseCsc};

/// Encode coefficient data as a heterogeneous graph.
///
/// # Arguments
///
/// * `a` - Constraint matrix (m × n)
/// * `b` - Right-hand side (length m)
/// * `c` - Objective coefficients (length n)
/// * `senses` - Optional constraint senses (length m); adds a sense-code
///   column to the constraint features
/// * `cone_mask` - Optional mask (length n), `true` for cone variables
///
/// # Errors
///
/// `ShapeMismatch` if any length disagrees with the shape of `a`. A matrix
/// without nonzeros is valid and yields a graph with no edges.
pub fn encode(
    a: &SparseCsc,
    b: &[f64],
    c: &[f64],
    senses: Option<&[ConstraintSense]>,
    cone_mask: Option<&[bool]>,
) -> GraphResult<HeteroGraph> {
    let (m, n) = (a.rows(), a.cols());

    check_len("b", m, b.len())?;
    check_len("c", n, c.len())?;
    if let Some(senses) = senses {
        check_len("constraint senses", m, senses.len())?;
    }
    if let Some(mask) = cone_mask {
        check_len("cone mask", n, mask.len())?;
    }

    let incidences = nonzero_incidences(a);
    let constraints = NodeStore::new(NodeKind::Constraint, constraint_features(b, senses));

    let graph = match cone_mask {
        None => {
            let plain = IndexRemap::identity(n);
            let v2c = relation_edges(Relation::VarToCon, &incidences, &plain);
            let c2v = v2c.mirrored();

            HeteroGraph::new(
                vec![
                    NodeStore::new(NodeKind::Variable, column(c)),
                    constraints,
                ],
                vec![v2c, c2v],
            )
        }
        Some(mask) => {
            let plain = IndexRemap::from_mask(mask, false);
            let cone = IndexRemap::from_mask(mask, true);

            let v2c = relation_edges(Relation::VarToCon, &incidences, &plain);
            let c2v = v2c.mirrored();
            let s2c = relation_edges(Relation::ConeToCon, &incidences, &cone);
            let c2s = s2c.mirrored();

            HeteroGraph::new(
                vec![
                    NodeStore::new(NodeKind::Variable, column(&plain.gather(c))),
                    constraints,
                    NodeStore::new(NodeKind::ConeVariable, column(&cone.gather(c))),
                ],
                vec![v2c, c2v, s2c, c2s],
            )
        }
    };

    Ok(graph)
}

/// Encode a dense constraint matrix. Zero entries are dropped before any
/// edge is created.
pub fn encode_dense(
    a: ArrayView2<'_, f64>,
    b: &[f64],
    c: &[f64],
    senses: Option<&[ConstraintSense]>,
    cone_mask: Option<&[bool]>,
) -> GraphResult<HeteroGraph> {
    encode(&from_dense(a), b, c, senses, cone_mask)
}

/// Forward edges (variable kind → constraint) for the variables in `remap`.
fn relation_edges(relation: Relation, incidences: &[Incidence], remap: &IndexRemap) -> EdgeStore {
    let mut src = Vec::new();
    let mut dst = Vec::new();
    let mut weights = Vec::new();

    for inc in incidences {
        if let Some(local) = remap.local(inc.variable) {
            src.push(local);
            dst.push(inc.constraint);
            weights.push(inc.weight);
        }
    }

    EdgeStore::new(relation, src, dst, weights)
}

/// Constraint features: `[b_i, sense_code_i]`, or `[b_i]` without senses.
fn constraint_features(b: &[f64], senses: Option<&[ConstraintSense]>) -> Array2<f64> {
    match senses {
        Some(senses) => Array2::from_shape_fn((b.len(), 2), |(i, k)| {
            if k == 0 {
                b[i]
            } else {
                senses[i].code()
            }
        }),
        None => column(b),
    }
}

fn column(values: &[f64]) -> Array2<f64> {
    Array1::from(values.to_vec()).insert_axis(Axis(1))
}
