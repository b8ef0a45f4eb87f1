//! Gzip-compressed JSON cache of built datasets.
//!
//! Building a split requires parsing every instance and encoding every
//! program; the cache stores the result so it can be reloaded directly.
//! Programs are not cached.
//!
//! Target arrays may hold NaN or infinite objectives (e.g. samples the
//! solver failed on). JSON has no literal for those, so targets are stored
//! element-wise with `"NaN"`, `"inf"` and `"-inf"` strings. Graphs must be
//! finite; `save_cache` refuses a graph that is not.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use graph_core::HeteroGraph;
use ndarray::{ArrayD, IxDyn};
use serde::{Deserialize, Serialize};

use crate::dataset::InstanceDataset;
use crate::error::{DataError, DataResult};
use crate::solution::SolutionTargets;
use crate::split::Split;

/// Format version written into every cache file.
pub const CACHE_VERSION: u32 = 2;

#[derive(Serialize, Deserialize)]
struct CachedDataset {
    version: u32,
    split: Split,
    entries: Vec<CachedEntry>,
}

#[derive(Serialize, Deserialize)]
struct CachedEntry {
    name: String,
    graph: HeteroGraph,
    targets: CachedTargets,
}

#[derive(Serialize, Deserialize)]
struct CachedTargets {
    solutions: CachedArray,
    objectives: CachedArray,
}

#[derive(Serialize, Deserialize)]
struct CachedArray {
    shape: Vec<usize>,
    data: Vec<CachedValue>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CachedValue {
    Number(f64),
    Special(String),
}

impl CachedValue {
    fn from_f64(v: f64) -> Self {
        if v.is_finite() {
            CachedValue::Number(v)
        } else if v.is_nan() {
            CachedValue::Special("NaN".to_string())
        } else if v > 0.0 {
            CachedValue::Special("inf".to_string())
        } else {
            CachedValue::Special("-inf".to_string())
        }
    }

    fn into_f64(self) -> Result<f64, String> {
        match self {
            CachedValue::Number(v) => Ok(v),
            CachedValue::Special(s) => match s.as_str() {
                "NaN" => Ok(f64::NAN),
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(format!("unknown float literal {:?}", other)),
            },
        }
    }
}

impl CachedArray {
    fn from_array(a: &ArrayD<f64>) -> Self {
        Self {
            shape: a.shape().to_vec(),
            data: a.iter().map(|&v| CachedValue::from_f64(v)).collect(),
        }
    }

    fn into_array(self) -> Result<ArrayD<f64>, String> {
        let data = self
            .data
            .into_iter()
            .map(CachedValue::into_f64)
            .collect::<Result<Vec<_>, _>>()?;
        ArrayD::from_shape_vec(IxDyn(&self.shape), data).map_err(|e| e.to_string())
    }
}

impl CachedTargets {
    fn from_targets(t: &SolutionTargets) -> Self {
        Self {
            solutions: CachedArray::from_array(&t.solutions),
            objectives: CachedArray::from_array(&t.objectives),
        }
    }

    fn into_targets(self) -> Result<SolutionTargets, String> {
        Ok(SolutionTargets {
            solutions: self.solutions.into_array()?,
            objectives: self.objectives.into_array()?,
        })
    }
}

/// Name the first feature matrix or weight vector holding a non-finite value.
fn non_finite_part(graph: &HeteroGraph) -> Option<String> {
    for kind in graph.node_kinds() {
        if graph
            .node_features(kind)
            .map_or(false, |x| x.iter().any(|v| !v.is_finite()))
        {
            return Some(format!("{} features", kind));
        }
    }
    for rel in graph.relations() {
        if graph
            .edge_weights(rel)
            .map_or(false, |w| w.iter().any(|v| !v.is_finite()))
        {
            return Some(format!("{} weights", rel.name()));
        }
    }
    None
}

impl InstanceDataset {
    /// Write the dataset to a gzip-compressed JSON file.
    ///
    /// Fails with `Cache` if any graph has a non-finite feature or weight.
    pub fn save_cache(&self, path: &Path) -> DataResult<()> {
        let mut entries = Vec::with_capacity(self.len());
        for s in self.iter() {
            if let Some(part) = non_finite_part(s.graph) {
                return Err(DataError::Cache(format!(
                    "cannot cache {}: non-finite {}",
                    s.name, part
                )));
            }
            entries.push(CachedEntry {
                name: s.name.to_string(),
                graph: s.graph.clone(),
                targets: CachedTargets::from_targets(s.targets),
            });
        }
        let cached = CachedDataset {
            version: CACHE_VERSION,
            split: self.split(),
            entries,
        };

        let file = File::create(path).map_err(|e| DataError::io(path, e))?;
        let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
        serde_json::to_writer(&mut encoder, &cached)
            .map_err(|e| DataError::Cache(format!("failed to write {}: {}", path.display(), e)))?;
        encoder
            .finish()
            .and_then(|mut w| w.flush())
            .map_err(|e| DataError::io(path, e))?;

        log::info!("cached {} samples of split {} to {}", self.len(), self.split(), path.display());
        Ok(())
    }

    /// Load a dataset written by [`InstanceDataset::save_cache`].
    ///
    /// Every graph is re-checked for structural consistency.
    pub fn load_cache(path: &Path) -> DataResult<Self> {
        let file = File::open(path).map_err(|e| DataError::io(path, e))?;
        let decoder = GzDecoder::new(BufReader::new(file));
        let cached: CachedDataset = serde_json::from_reader(BufReader::new(decoder))
            .map_err(|e| DataError::Cache(format!("failed to parse {}: {}", path.display(), e)))?;

        if cached.version != CACHE_VERSION {
            return Err(DataError::Cache(format!(
                "{} has cache version {}, expected {}",
                path.display(),
                cached.version,
                CACHE_VERSION
            )));
        }

        let mut names = Vec::with_capacity(cached.entries.len());
        let mut graphs = Vec::with_capacity(cached.entries.len());
        let mut targets = Vec::with_capacity(cached.entries.len());
        for entry in cached.entries {
            entry
                .graph
                .check_consistency()
                .map_err(|e| DataError::Cache(format!("{} in {}: {}", entry.name, path.display(), e)))?;
            let sample_targets = entry
                .targets
                .into_targets()
                .map_err(|e| DataError::Cache(format!("{} in {}: {}", entry.name, path.display(), e)))?;
            names.push(entry.name);
            graphs.push(entry.graph);
            targets.push(sample_targets);
        }

        log::debug!("loaded {} cached samples from {}", graphs.len(), path.display());
        Ok(InstanceDataset::from_parts(cached.split, names, graphs, targets))
    }
}
