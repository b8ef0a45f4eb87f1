//! Program data and validation.
//!
//! A program is the coefficient data handed to the encoder:
//!
//! ```text
//! minimize    c^T x
//! subject to  A_i x  (<=, =, >=)  b_i     for every constraint i
//! ```
//!
//! # Dimensions
//!
//! - `n`: number of variables (length of c, columns of A)
//! - `m`: number of constraints (length of b, rows of A)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::encoder::encode;
use crate::error::{check_len, GraphError, GraphResult};
use crate::graph::HeteroGraph;
use crate::partition::ConeNaming;
use crate::sparse::{count_nonzeros, SparseCsc};

/// Constraint sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintSense {
    /// `A_i x <= b_i`
    LessEqual,
    /// `A_i x = b_i`
    Equal,
    /// `A_i x >= b_i`
    GreaterEqual,
}

impl ConstraintSense {
    /// Numeric code used as a constraint node feature.
    pub fn code(&self) -> f64 {
        match self {
            ConstraintSense::GreaterEqual => 1.0,
            ConstraintSense::Equal => 0.0,
            ConstraintSense::LessEqual => -1.0,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            ConstraintSense::LessEqual => "<=",
            ConstraintSense::Equal => "=",
            ConstraintSense::GreaterEqual => ">=",
        }
    }
}

impl FromStr for ConstraintSense {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" | "<=" => Ok(ConstraintSense::LessEqual),
            "=" | "==" => Ok(ConstraintSense::Equal),
            ">" | ">=" => Ok(ConstraintSense::GreaterEqual),
            other => Err(GraphError::UnknownSense(other.to_string())),
        }
    }
}

impl fmt::Display for ConstraintSense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Coefficient data of a linear / second-order-cone program.
#[derive(Debug, Clone)]
#[allow(non_snake_case)] // A is standard mathematical notation
pub struct LinearProgram {
    /// Constraint matrix A (m × n, CSC format)
    pub A: SparseCsc,

    /// Right-hand side b (length m)
    pub b: Vec<f64>,

    /// Objective coefficients c (length n)
    pub c: Vec<f64>,

    /// Optional sense of each constraint (length m)
    pub senses: Option<Vec<ConstraintSense>>,

    /// Optional variable names (length n), used to find cone variables
    pub var_names: Option<Vec<String>>,
}

impl LinearProgram {
    /// Get the number of variables (n)
    pub fn num_vars(&self) -> usize {
        self.A.cols()
    }

    /// Get the number of constraints (m)
    pub fn num_constraints(&self) -> usize {
        self.A.rows()
    }

    /// Number of nonzero coefficients in A.
    pub fn num_nonzeros(&self) -> usize {
        count_nonzeros(&self.A)
    }

    /// Validate that every array agrees with the shape of A.
    pub fn validate(&self) -> GraphResult<()> {
        let m = self.num_constraints();
        let n = self.num_vars();

        check_len("b", m, self.b.len())?;
        check_len("c", n, self.c.len())?;
        if let Some(ref senses) = self.senses {
            check_len("constraint senses", m, senses.len())?;
        }
        if let Some(ref names) = self.var_names {
            check_len("variable names", n, names.len())?;
        }
        Ok(())
    }

    /// Cone mask derived from variable names, if the program has names.
    pub fn cone_mask(&self, naming: &ConeNaming) -> Option<Vec<bool>> {
        self.var_names.as_ref().map(|names| naming.mask(names))
    }

    /// Encode this program as a heterogeneous graph.
    ///
    /// With a naming rule and variable names, cone variables get their own
    /// node kind; otherwise all variables share the `var` kind.
    pub fn to_graph(&self, naming: Option<&ConeNaming>) -> GraphResult<HeteroGraph> {
        self.validate()?;

        let mask = naming.and_then(|rule| self.cone_mask(rule));
        if naming.is_some() && mask.is_none() {
            log::debug!("program has no variable names; cone partition skipped");
        }

        encode(&self.A, &self.b, &self.c, self.senses.as_deref(), mask.as_deref())
    }
}
