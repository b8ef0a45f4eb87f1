//! Variable partitioning into plain decision variables and cone variables.
//!
//! Cone variables are the auxiliary variables introduced by second-order-cone
//! reformulations. They are told apart from decision variables by name.

use serde::{Deserialize, Serialize};

/// Naming rule that separates decision variables from cone variables.
///
/// A variable is a decision variable when its name contains any of the
/// markers; every other variable is a cone variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConeNaming {
    /// Substrings identifying decision variables.
    pub decision_markers: Vec<String>,
}

impl Default for ConeNaming {
    /// `x(` and `phi(` mark decision variables.
    fn default() -> Self {
        Self::new(["x(", "phi("])
    }
}

impl ConeNaming {
    /// Create a rule from explicit markers.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            decision_markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` denotes a cone variable.
    pub fn is_cone(&self, name: &str) -> bool {
        !self
            .decision_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }

    /// Cone mask for a list of variable names (`true` = cone variable).
    pub fn mask<S: AsRef<str>>(&self, names: &[S]) -> Vec<bool> {
        names.iter().map(|n| self.is_cone(n.as_ref())).collect()
    }
}

/// Bijective map between global variable indices and the dense local index
/// space of one node kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRemap {
    /// local index of each global index, if the variable belongs to this kind
    local_of: Vec<Option<usize>>,
    /// global index of each local index, increasing
    global_of: Vec<usize>,
}

impl IndexRemap {
    /// Select the global indices `j` with `mask[j] == select`.
    ///
    /// Local indices follow the original ordering.
    pub fn from_mask(mask: &[bool], select: bool) -> Self {
        let mut local_of = vec![None; mask.len()];
        let mut global_of = Vec::new();
        for (j, &m) in mask.iter().enumerate() {
            if m == select {
                local_of[j] = Some(global_of.len());
                global_of.push(j);
            }
        }
        Self { local_of, global_of }
    }

    /// Identity map over `n` indices.
    pub fn identity(n: usize) -> Self {
        Self {
            local_of: (0..n).map(Some).collect(),
            global_of: (0..n).collect(),
        }
    }

    /// Local index of a global index, or `None` if it belongs to another kind.
    pub fn local(&self, global: usize) -> Option<usize> {
        self.local_of.get(global).copied().flatten()
    }

    /// Global index of a local index.
    pub fn global(&self, local: usize) -> Option<usize> {
        self.global_of.get(local).copied()
    }

    /// Global indices of this kind, in local order.
    pub fn globals(&self) -> &[usize] {
        &self.global_of
    }

    /// Number of nodes of this kind.
    pub fn len(&self) -> usize {
        self.global_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.global_of.is_empty()
    }

    /// Gather `values` at this kind's global indices.
    pub fn gather(&self, values: &[f64]) -> Vec<f64> {
        self.global_of.iter().map(|&j| values[j]).collect()
    }
}
