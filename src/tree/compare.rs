//! Scalar comparison with an absolute tolerance

/// Compare two optional values within `tol`
///
/// Absent values count as `0`, so an absent field is not a wildcard here.
/// Field-level "no constraint" is decided by the matcher before it gets
/// this far.
pub fn equal_within_tolerance(expected: Option<f64>, actual: Option<f64>, tol: f64) -> bool {
    (expected.unwrap_or(0.0) - actual.unwrap_or(0.0)).abs() <= tol
}
