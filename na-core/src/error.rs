
use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
  #[error("invalid parameter `{name}`: {reason}")]
  InvalidParameter {
    name: &'static str,
    reason: String,
  },
  #[error("dimension mismatch for {what}: expected {expected:?}, found {found:?}")]
  DimensionMismatch {
    what: &'static str,
    expected: Vec<usize>,
    found: Vec<usize>,
  },
  /// `tap` is the 1-based offset of the filter weight being integrated.
  #[error("quadrature for filter tap {tap} did not converge (error {error:e} > tolerance {tolerance:e})")]
  NonConvergence {
    tap: usize,
    error: f64,
    tolerance: f64,
  },
  #[error("quadrature did not converge after {subdivisions} subdivisions (error {error:e} > tolerance {tolerance:e})")]
  Quadrature {
    error: f64,
    tolerance: f64,
    subdivisions: usize,
  },
  #[error("linear algebra failure: {0}")]
  LinearAlgebra(String),
  #[error("filter weights still moving by {difference:e} at half-width {max_n}")]
  WeightsNotConverged {
    max_n: usize,
    difference: f64,
  },
}

impl Error {
  pub fn invalid<R>(name: &'static str, reason: R) -> Error
    where R: Into<String>,
  {
    Error::InvalidParameter {
      name,
      reason: reason.into(),
    }
  }
}

/// Fails with `DimensionMismatch` unless `found == expected`.
pub fn check_shape(what: &'static str, expected: &[usize],
                   found: &[usize]) -> Result<()> {
  if expected == found {
    return Ok(());
  }

  Err(Error::DimensionMismatch {
    what,
    expected: expected.to_vec(),
    found: found.to_vec(),
  })
}

/// Fails with `InvalidParameter` unless `v` is finite and strictly positive.
pub fn check_positive(name: &'static str, v: f64) -> Result<()> {
  if v.is_finite() && v > 0.0 {
    Ok(())
  } else {
    Err(Error::invalid(name, format!("must be finite and > 0, got {}", v)))
  }
}
