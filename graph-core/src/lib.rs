//! Constraint graphs for linear and second-order-cone programs.
//!
//! This crate turns the coefficient data of an optimization program into a
//! typed heterogeneous graph suitable for graph neural networks:
//!
//! - **Constraint nodes** carry `[b_i, sense_code_i]` (or `[b_i]`)
//! - **Variable nodes** carry their objective coefficient `c_j`
//! - **Cone-variable nodes** (optional) carry `c_j` for second-order-cone
//!   auxiliaries, identified by a naming rule
//! - **Edges** connect constraint `i` and variable `j` whenever
//!   `A[i, j] != 0`, once in each direction, weighted by `A[i, j]`
//!
//! # Example
//!
//! ```
//! use graph_core::{encode, sparse, NodeKind, Relation};
//!
//! // x0 + 2 x1 <= 4
//! let a = sparse::from_triplets(1, 2, vec![(0, 0, 1.0), (0, 1, 2.0)]);
//! let g = encode(&a, &[4.0], &[1.0, 1.0], None, None)?;
//!
//! assert_eq!(g.num_nodes(NodeKind::Variable), 2);
//! assert_eq!(g.num_edges(Relation::VarToCon), 2);
//! # Ok::<(), graph_core::GraphError>(())
//! ```

#![warn(clippy::all)]

pub mod encoder;
pub mod error;
pub mod graph;
pub mod partition;
pub mod program;
pub mod sparse;

pub use encoder::{encode, encode_dense};
pub use error::{GraphError, GraphResult};
pub use graph::{EdgeStore, GraphSummary, HeteroGraph, NodeKind, NodeStore, Relation};
pub use partition::{ConeNaming, IndexRemap};
pub use program::{ConstraintSense, LinearProgram};
pub use sparse::SparseCsc;
