//! Instance files and the model builder collaborator.
//!
//! Instances are JSON documents named `<prefix>_<index>.json`. A
//! [`ModelBuilder`] turns the parsed document into a [`LinearProgram`].

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use graph_core::sparse;
use graph_core::{ConstraintSense, LinearProgram};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DataError, DataResult};

/// Builds program coefficient data from a parsed instance document.
pub trait ModelBuilder {
    /// Build the program, or explain why the instance is malformed.
    fn build(&self, instance: &Value) -> Result<LinearProgram, String>;
}

impl<F> ModelBuilder for F
where
    F: Fn(&Value) -> Result<LinearProgram, String>,
{
    fn build(&self, instance: &Value) -> Result<LinearProgram, String> {
        self(instance)
    }
}

/// Builder for instances written out in explicit linear form.
///
/// ```json
/// {
///   "variables":   [{"name": "x(0,0)", "obj": 1.0}],
///   "constraints": [{"name": "c0", "sense": "<=", "rhs": 4.0, "terms": [[0, 1.0]]}]
/// }
/// ```
///
/// `terms` are `[variable_index, coefficient]` pairs; repeated pairs are summed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearFormBuilder;

#[derive(Debug, Deserialize)]
struct LinearForm {
    variables: Vec<VariableSpec>,
    #[serde(default)]
    constraints: Vec<ConstraintSpec>,
}

#[derive(Debug, Deserialize)]
struct VariableSpec {
    name: String,
    #[serde(default)]
    obj: f64,
}

#[derive(Debug, Deserialize)]
struct ConstraintSpec {
    #[serde(default)]
    name: Option<String>,
    sense: String,
    rhs: f64,
    #[serde(default)]
    terms: Vec<(usize, f64)>,
}

impl ModelBuilder for LinearFormBuilder {
    fn build(&self, instance: &Value) -> Result<LinearProgram, String> {
        let form = LinearForm::deserialize(instance).map_err(|e| e.to_string())?;

        let n = form.variables.len();
        let m = form.constraints.len();

        let mut triplets = Vec::new();
        let mut b = Vec::with_capacity(m);
        let mut senses = Vec::with_capacity(m);

        for (i, con) in form.constraints.iter().enumerate() {
            let label = con.name.clone().unwrap_or_else(|| format!("#{}", i));
            let sense: ConstraintSense = con
                .sense
                .parse()
                .map_err(|e| format!("constraint {}: {}", label, e))?;

            for &(j, coef) in &con.terms {
                if j >= n {
                    return Err(format!(
                        "constraint {} references variable {} but only {} exist",
                        label, j, n
                    ));
                }
                triplets.push((i, j, coef));
            }
            b.push(con.rhs);
            senses.push(sense);
        }

        Ok(LinearProgram {
            A: sparse::from_triplets(m, n, triplets),
            b,
            c: form.variables.iter().map(|v| v.obj).collect(),
            senses: Some(senses),
            var_names: Some(form.variables.into_iter().map(|v| v.name).collect()),
        })
    }
}

/// Index encoded in an instance file name (`..._<index>.json`).
///
/// The index is signed; negative indices fall outside every split.
pub fn instance_index(path: &Path) -> DataResult<i64> {
    path.file_name()
        .and_then(|s| s.to_str())
        .and_then(|name| name.strip_suffix(".json"))
        .and_then(|stem| stem.rsplit('_').next())
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| DataError::InstanceName(path.to_path_buf()))
}

/// Path of the precomputed solutions for an instance: the file name with
/// `.json` replaced by `_sols.npz`, inside `sols_dir`.
pub fn solution_path(instance: &Path, sols_dir: &Path) -> DataResult<PathBuf> {
    let name = instance
        .file_name()
        .and_then(|s| s.to_str())
        .ok_or_else(|| DataError::InstanceName(instance.to_path_buf()))?;
    Ok(sols_dir.join(name.replace(".json", "_sols.npz")))
}

/// Read and parse an instance document.
pub fn read_instance(path: &Path) -> DataResult<Value> {
    let file = File::open(path).map_err(|e| DataError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| DataError::MalformedInstance {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// List `*.json` instance files in `dir`, optionally restricted to names
/// starting with `prefix`, sorted by path.
pub fn discover_instances(dir: &Path, prefix: Option<&str>) -> DataResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| DataError::io(dir, e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| DataError::io(dir, e))?.path();
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !name.ends_with(".json") || !path.is_file() {
            continue;
        }
        if prefix.map_or(true, |p| name.starts_with(p)) {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_core::ConeNaming;
    use serde_json::json;

    #[test]
    fn test_instance_index() {
        assert_eq!(instance_index(Path::new("data/raw/97_9.json")).unwrap(), 9);
        assert_eq!(instance_index(Path::new("125_20_149.json")).unwrap(), 149);
        assert_eq!(instance_index(Path::new("7.json")).unwrap(), 7);
        assert!(matches!(
            instance_index(Path::new("125_x.json")),
            Err(DataError::InstanceName(_))
        ));
        assert!(instance_index(Path::new("125_3.npz")).is_err());
        assert_eq!(instance_index(Path::new("raw/125_-3.json")).unwrap(), -3);
    }

    #[test]
    fn test_solution_path() {
        let p = solution_path(Path::new("raw/125_3.json"), Path::new("interim")).unwrap();
        assert_eq!(p, Path::new("interim/125_3_sols.npz"));
    }

    #[test]
    fn test_linear_form_builder() {
        let instance = json!({
            "variables": [
                {"name": "x(0)", "obj": 1.0},
                {"name": "phi(0)", "obj": -2.0},
                {"name": "aux", "obj": 0.0}
            ],
            "constraints": [
                {"name": "cap", "sense": "<=", "rhs": 3.0, "terms": [[0, 1.0], [1, 1.0], [0, 1.0]]},
                {"sense": ">", "rhs": 0.0, "terms": [[2, -1.0]]}
            ]
        });

        let prob = LinearFormBuilder.build(&instance).unwrap();
        assert!(prob.validate().is_ok());
        assert_eq!(prob.num_constraints(), 2);
        assert_eq!(prob.num_vars(), 3);
        assert_eq!(prob.num_nonzeros(), 3);
        assert_eq!(prob.c, vec![1.0, -2.0, 0.0]);
        assert_eq!(
            prob.senses.as_deref(),
            Some(&[ConstraintSense::LessEqual, ConstraintSense::GreaterEqual][..])
        );
        assert_eq!(
            prob.cone_mask(&ConeNaming::new(["x(", "phi("])),
            Some(vec![false, false, true])
        );
    }

    #[test]
    fn test_linear_form_builder_rejects_bad_input() {
        let unknown_var = json!({
            "variables": [{"name": "x(0)"}],
            "constraints": [{"sense": "=", "rhs": 1.0, "terms": [[3, 1.0]]}]
        });
        let err = LinearFormBuilder.build(&unknown_var).unwrap_err();
        assert!(err.contains("variable 3"), "{}", err);

        let bad_sense = json!({
            "variables": [{"name": "x(0)"}],
            "constraints": [{"name": "c", "sense": "~", "rhs": 1.0}]
        });
        assert!(LinearFormBuilder.build(&bad_sense).is_err());

        assert!(LinearFormBuilder.build(&json!({"jobs": 3})).is_err());
    }

    #[test]
    fn test_closure_builder() {
        let builder = |_: &Value| -> Result<LinearProgram, String> { Err("unsupported".into()) };
        assert_eq!(builder.build(&json!({})).unwrap_err(), "unsupported");
    }
}
