//! Configuration settings for dataset construction.

use graph_core::ConeNaming;

/// Dataset construction settings.
#[derive(Debug, Clone)]
pub struct DatasetSettings {
    /// Naming rule separating decision variables from cone variables.
    /// `None` encodes every variable as a plain `var` node.
    pub naming: Option<ConeNaming>,

    /// Keep the built program next to each graph.
    pub keep_programs: bool,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            naming: Some(ConeNaming::default()),
            keep_programs: false,
        }
    }
}

impl DatasetSettings {
    /// Keep the programs for retrieval with each sample.
    pub fn with_programs(mut self) -> Self {
        self.keep_programs = true;
        self
    }

    /// Use the given decision-variable markers for the cone partition.
    pub fn with_decision_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.naming = Some(ConeNaming::new(markers));
        self
    }

    /// Encode all variables as a single node kind.
    pub fn without_cone_partition(mut self) -> Self {
        self.naming = None;
        self
    }
}
