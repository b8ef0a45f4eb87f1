//! Sparse matrix types and helpers.
//!
//! Constraint matrices are stored in CSC format. Explicitly stored zeros are
//! allowed in the storage but never count as incidences.

use ndarray::ArrayView2;
use sprs::{CsMat, TriMat};

/// Sparse matrix in CSC format.
pub type SparseCsc = CsMat<f64>;

/// One nonzero coefficient of the constraint matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Incidence {
    /// Row (constraint) index.
    pub constraint: usize,
    /// Column (variable) index.
    pub variable: usize,
    /// Coefficient A[constraint, variable].
    pub weight: f64,
}

/// Build a sparse CSC matrix from triplets (row, col, value).
///
/// Repeated (row, col) pairs are summed.
pub fn from_triplets<I>(nrows: usize, ncols: usize, triplets: I) -> SparseCsc
where
    I: IntoIterator<Item = (usize, usize, f64)>,
{
    let mut tri = TriMat::new((nrows, ncols));
    for (i, j, v) in triplets {
        tri.add_triplet(i, j, v);
    }
    tri.to_csc()
}

/// Build a sparse CSC matrix from a dense array, dropping zero entries.
pub fn from_dense(a: ArrayView2<'_, f64>) -> SparseCsc {
    let (nrows, ncols) = a.dim();
    let triplets = a
        .indexed_iter()
        .filter(|&(_, &v)| v != 0.0)
        .map(|((i, j), &v)| (i, j, v));
    from_triplets(nrows, ncols, triplets)
}

/// Nonzero entries of `a` in row-major order (constraint, then variable).
pub fn nonzero_incidences(a: &SparseCsc) -> Vec<Incidence> {
    let mut incidences: Vec<Incidence> = a
        .iter()
        .filter(|&(&v, _)| v != 0.0)
        .map(|(&weight, (constraint, variable))| Incidence {
            constraint,
            variable,
            weight,
        })
        .collect();
    incidences.sort_unstable_by_key(|e| (e.constraint, e.variable));
    incidences
}

/// Number of entries of `a` that are actually nonzero.
pub fn count_nonzeros(a: &SparseCsc) -> usize {
    a.iter().filter(|&(&v, _)| v != 0.0).count()
}
