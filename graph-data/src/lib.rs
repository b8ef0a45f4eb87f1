//! Instance datasets for constraint-graph learning.
//!
//! Reads optimization instances (JSON) and their precomputed solver targets
//! (`<instance>_sols.npz`), encodes each instance with `graph-core`, and
//! keeps the (graph, targets) pairs of one split in memory.

#![warn(missing_docs)]

pub mod cache;
pub mod dataset;
pub mod error;
pub mod instance;
pub mod settings;
pub mod solution;
pub mod split;

pub use dataset::{InstanceDataset, Sample};
pub use error::{DataError, DataResult};
pub use instance::{discover_instances, instance_index, solution_path, LinearFormBuilder, ModelBuilder};
pub use settings::DatasetSettings;
pub use solution::{load_solution, SolutionTargets};
pub use split::Split;
