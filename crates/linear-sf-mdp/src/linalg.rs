//! Checked dense matrix inversion

use nalgebra::DMatrix;

use linear_sf_core::{RLError, Result};

/// Relative pivot magnitude below which a matrix is treated as singular
///
/// This is a conditioning threshold, not an exact rank test: a matrix whose
/// smallest LU pivot is more than twelve orders of magnitude below its
/// largest entry is rejected even if it is invertible in exact arithmetic.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Invert a square matrix through its LU decomposition
///
/// Fails with [`RLError::SingularMatrix`] instead of producing NaN/Inf
/// entries: when the matrix is all zeros, when an LU pivot is smaller than
/// [`SINGULAR_TOLERANCE`] times the largest absolute entry, or when the
/// resulting inverse is not finite. `context` names the matrix in the error.
///
/// Badly scaled inputs (e.g. features whose columns differ by more than
/// `1 / SINGULAR_TOLERANCE` in magnitude) are reported as singular; rescale
/// them before solving.
pub fn invert(matrix: DMatrix<f64>, context: &str) -> Result<DMatrix<f64>> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(RLError::shape((rows, rows), (rows, cols)));
    }
    if rows == 0 {
        return Err(RLError::Computation(format!("cannot invert empty matrix {context}")));
    }

    let scale = matrix.amax();
    if !scale.is_finite() {
        return Err(RLError::Computation(format!("{context} has non-finite entries")));
    }

    let lu = matrix.lu();
    let min_pivot = lu.u().diagonal().amin();
    if scale == 0.0 || min_pivot <= SINGULAR_TOLERANCE * scale {
        tracing::warn!(context, min_pivot, scale, "matrix is singular");
        return Err(RLError::singular(context));
    }

    let inverse = lu.try_inverse().ok_or_else(|| RLError::singular(context))?;
    if inverse.iter().any(|x| !x.is_finite()) {
        tracing::warn!(context, "inverse has non-finite entries");
        return Err(RLError::singular(context));
    }

    Ok(inverse)
}
