//! Dataset of instance graphs with their precomputed targets.

use std::path::Path;

use graph_core::{HeteroGraph, LinearProgram};

use crate::error::{DataError, DataResult};
use crate::instance::{instance_index, read_instance, solution_path, ModelBuilder};
use crate::settings::DatasetSettings;
use crate::solution::{load_solution, SolutionTargets};
use crate::split::Split;

/// One dataset entry.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    /// Instance name (file stem).
    pub name: &'a str,
    /// Encoded instance.
    pub graph: &'a HeteroGraph,
    /// Precomputed solutions and objectives.
    pub targets: &'a SolutionTargets,
    /// Program the graph was built from, if programs were kept.
    pub program: Option<&'a LinearProgram>,
}

/// Fixed-length, indexed collection of (graph, targets) pairs for one split.
///
/// All graphs are built eagerly at construction and never change afterwards.
#[derive(Debug, Clone)]
pub struct InstanceDataset {
    split: Split,
    names: Vec<String>,
    graphs: Vec<HeteroGraph>,
    targets: Vec<SolutionTargets>,
    programs: Option<Vec<LinearProgram>>,
}

impl InstanceDataset {
    /// Build the dataset for `split` from instance files.
    ///
    /// Instances whose index falls outside the split are ignored. Instances
    /// without a solution archive are skipped with a warning. Any other
    /// failure aborts construction.
    pub fn build<P, B>(
        instances: &[P],
        sols_dir: &Path,
        split: Split,
        settings: &DatasetSettings,
        builder: &B,
    ) -> DataResult<Self>
    where
        P: AsRef<Path>,
        B: ModelBuilder + ?Sized,
    {
        if !sols_dir.is_dir() {
            return Err(DataError::MissingSolutionDir(sols_dir.to_path_buf()));
        }

        let mut names = Vec::new();
        let mut graphs = Vec::new();
        let mut targets = Vec::new();
        let mut programs = Vec::new();
        let mut skipped = 0usize;

        for path in instances {
            let path = path.as_ref();
            let index = instance_index(path)?;
            if !split.contains(index) {
                continue;
            }

            let instance = read_instance(path)?;

            let sols = match load_solution(&solution_path(path, sols_dir)?) {
                Ok(sols) => sols,
                Err(DataError::MissingSolution(sol_path)) => {
                    log::warn!(
                        "solutions were not computed for {} (expected {}), skipping",
                        path.display(),
                        sol_path.display()
                    );
                    skipped += 1;
                    continue;
                }
                Err(e) => return Err(e),
            };

            let program = builder.build(&instance).map_err(|reason| DataError::MalformedInstance {
                path: path.to_path_buf(),
                reason,
            })?;
            let graph = program.to_graph(settings.naming.as_ref())?;

            log::debug!("{} (index {}): {}", path.display(), index, graph.summary());

            names.push(instance_name(path));
            graphs.push(graph);
            targets.push(sols);
            if settings.keep_programs {
                programs.push(program);
            }
        }

        log::info!(
            "built {} graphs for split {} ({} skipped without solutions)",
            graphs.len(),
            split,
            skipped
        );

        Ok(Self {
            split,
            names,
            graphs,
            targets,
            programs: settings.keep_programs.then_some(programs),
        })
    }

    /// Assemble a dataset from parts that were already validated.
    pub(crate) fn from_parts(
        split: Split,
        names: Vec<String>,
        graphs: Vec<HeteroGraph>,
        targets: Vec<SolutionTargets>,
    ) -> Self {
        Self {
            split,
            names,
            graphs,
            targets,
            programs: None,
        }
    }

    /// Split this dataset was built for.
    pub fn split(&self) -> Split {
        self.split
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Whether programs were kept at construction.
    pub fn has_programs(&self) -> bool {
        self.programs.is_some()
    }

    /// Sample at position `idx`.
    pub fn get(&self, idx: usize) -> Option<Sample<'_>> {
        Some(Sample {
            name: self.names.get(idx)?,
            graph: self.graphs.get(idx)?,
            targets: self.targets.get(idx)?,
            program: self.programs.as_ref().and_then(|p| p.get(idx)),
        })
    }

    /// Iterate over all samples in order.
    pub fn iter(&self) -> impl Iterator<Item = Sample<'_>> + '_ {
        (0..self.len()).filter_map(move |idx| self.get(idx))
    }

    /// Instance names in sample order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Graphs in sample order.
    pub fn graphs(&self) -> &[HeteroGraph] {
        &self.graphs
    }

    /// Targets in sample order.
    pub fn targets(&self) -> &[SolutionTargets] {
        &self.targets
    }
}

fn instance_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
