//! Precomputed solver targets stored as `.npz` archives.
//!
//! Each archive holds two positional arrays, as written by `numpy.savez`:
//! `arr_0` with the solution samples and `arr_1` with their objective values.
//! Both must be `float64`.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::{NpzReader, ReadNpzError};
use serde::{Deserialize, Serialize};

use crate::error::{DataError, DataResult};

/// Archive entry holding the solution samples.
pub const SOLUTIONS_KEY: &str = "arr_0";

/// Archive entry holding the objective values.
pub const OBJECTIVES_KEY: &str = "arr_1";

/// Target arrays for one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionTargets {
    /// Solution samples (`arr_0`).
    pub solutions: ArrayD<f64>,
    /// Objective values (`arr_1`).
    pub objectives: ArrayD<f64>,
}

impl SolutionTargets {
    /// Number of stored samples (leading dimension of the objectives).
    pub fn num_samples(&self) -> usize {
        self.objectives.shape().first().copied().unwrap_or(1)
    }

    /// Best (lowest) stored objective value.
    pub fn best_objective(&self) -> Option<f64> {
        self.objectives
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::min)
    }
}

/// Load the targets for an instance.
///
/// Returns `MissingSolution` when the archive does not exist, so callers can
/// skip the instance.
pub fn load_solution(path: &Path) -> DataResult<SolutionTargets> {
    if !path.exists() {
        return Err(DataError::MissingSolution(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    let mut npz = NpzReader::new(BufReader::new(file)).map_err(|source| DataError::SolutionRead {
        path: path.to_path_buf(),
        source,
    })?;

    let read_err = |source| DataError::SolutionRead {
        path: path.to_path_buf(),
        source,
    };
    let solutions = read_entry(&mut npz, SOLUTIONS_KEY).map_err(read_err)?;
    let objectives = read_entry(&mut npz, OBJECTIVES_KEY).map_err(read_err)?;

    Ok(SolutionTargets {
        solutions,
        objectives,
    })
}

/// Read an entry stored either as `key` or as `key.npy`.
fn read_entry<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    key: &str,
) -> Result<ArrayD<f64>, ReadNpzError> {
    npz.by_name(key).or_else(|_| npz.by_name(&format!("{}.npy", key)))
}
