
//! Least squares design of symmetric moving average weights.
//!
//! With `w_0 = 1 - 2 sum_i w_i` the kernel response is
//! `H(k) = 1 + 2 sum_i w_i (cos(i k) - 1)`. Minimizing `int_0^pi (H - F)^2`
//! over the tail weights gives the normal equations `A w = b` with
//! `A_ij = 2 pi (delta_ij + 2)` and
//! `b_i = int_0^pi 2 (F(k) - 1) (cos(i k) - 1) dk`.

use std::f64::consts::PI;

use nac::{Error, Result};
use nd::{Array, ArrayBase, Data, Ix1, Ix2};
use nq::{quad, QuadOptions};
use nla::cholesky_solve;

use crate::response::TargetResponse;

/// The last tap is reported when it is larger than this fraction of the
/// center tap.
const TAIL_WARNING_FRACTION: f64 = 1.0e-3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterDesign {
  /// Coarse over fine grid spacing, `> 1`.
  pub ratio: f64,
  /// Taps on either side of the center, `>= 1`.
  pub half_width: usize,
  pub quadrature: QuadOptions,
}

impl FilterDesign {
  pub fn new(ratio: f64, half_width: usize) -> FilterDesign {
    FilterDesign {
      ratio,
      half_width,
      quadrature: Default::default(),
    }
  }

  pub fn with_quadrature(mut self, quadrature: QuadOptions) -> FilterDesign {
    self.quadrature = quadrature;
    self
  }

  pub fn validate(&self) -> Result<()> {
    if !self.ratio.is_finite() || self.ratio <= 1.0 {
      return Err(Error::invalid("ratio", format!("coarsening ratio must be finite and > 1, got {}",
                                                 self.ratio)));
    }
    if self.half_width < 1 {
      return Err(Error::invalid("half_width", "need at least one tap either side of the center"));
    }

    self.quadrature.validate()
  }

  /// Right hand side `b`; entry `i - 1` belongs to offset `i`.
  pub fn rhs(&self) -> Result<Array<f64, Ix1>> {
    self.validate()?;

    let response = TargetResponse::low_pass(self.ratio)?;
    let mut b: Array<f64, Ix1> = Array::zeros(self.half_width);

    for i in 1..=self.half_width {
      let ik = i as f64;
      let integrand = |k: f64| 2.0 * (response.eval(k) - 1.0) * ((ik * k).cos() - 1.0);

      let q = quad(integrand, response.knots(), &self.quadrature)
        .map_err(|err| match err {
          Error::Quadrature { error, tolerance, .. } => {
            Error::NonConvergence { tap: i, error, tolerance, }
          },
          err => err,
        })?;
      trace!("tap {}: b = {:e}, error = {:e}, subdivisions = {}",
             i, q.integral, q.error, q.subdivisions);

      b[i - 1] = q.integral;
    }

    Ok(b)
  }

  /// Returns the `half_width + 1` weights `w`, `w[0]` being the center tap.
  pub fn design(&self) -> Result<Array<f64, Ix1>> {
    let b = self.rhs()?;
    let n = self.half_width;

    let tail = cholesky_solve(&system_matrix(n), &b)?;

    let mut w: Array<f64, Ix1> = Array::zeros(n + 1);
    w.slice_mut(s![1..]).assign(&tail);
    w[0] = 1.0 - 2.0 * tail.sum();

    debug!("designed {} tap filter for ratio {}: center = {:e}, last = {:e}",
           2 * n + 1, self.ratio, w[0], w[n]);
    if w[n].abs() > TAIL_WARNING_FRACTION * w[0].abs() {
      warn!("last tap {:e} of the ratio {} filter isn't negligible; half-width {} is probably too small",
            w[n], self.ratio, n);
    }

    Ok(w)
  }
}

/// `designFilter(x, n)`: weights `w[0..=n]` approximating the low pass
/// response for coarsening ratio `x`.
pub fn design_filter(x: f64, n: usize) -> Result<Array<f64, Ix1>> {
  FilterDesign::new(x, n).design()
}

/// `A = 2 pi (I + 2 * ones)`, n x n.
pub fn system_matrix(n: usize) -> Array<f64, Ix2> {
  Array::from_shape_fn((n, n), |(i, j)| {
    let delta = if i == j { 1.0 } else { 0.0 };
    2.0 * PI * (delta + 2.0)
  })
}

/// Sherman-Morrison solution of `system_matrix(b.len()) w = b`:
/// `(I + 2 * ones)^-1 = I - 2 * ones / (1 + 2 n)`.
pub fn solve_closed_form<S>(b: &ArrayBase<S, Ix1>) -> Array<f64, Ix1>
  where S: Data<Elem = f64>,
{
  let n = b.len() as f64;
  let shift = 2.0 * b.sum() / (1.0 + 2.0 * n);
  b.mapv(|v| (v - shift) / (2.0 * PI) )
}

/// Doubles the half-width, starting at `initial_n`, until every tap shared by
/// two successive designs moves by less than `tolerance`. Returns the wider
/// of the final pair.
pub fn design_converged(x: f64, initial_n: usize, tolerance: f64,
                        max_n: usize) -> Result<Array<f64, Ix1>> {
  if !tolerance.is_finite() || tolerance <= 0.0 {
    return Err(Error::invalid("tolerance", format!("must be finite and > 0, got {}", tolerance)));
  }
  if max_n < initial_n {
    return Err(Error::invalid("max_n", format!("{} is below the initial half-width {}",
                                               max_n, initial_n)));
  }

  let mut n = initial_n;
  let mut prev = design_filter(x, n)?;
  let mut difference = ::std::f64::INFINITY;

  while n < max_n {
    let next_n = (2 * n).min(max_n);
    let next = design_filter(x, next_n)?;

    difference = prev.iter()
      .zip(next.iter())
      .map(|(a, b)| (a - b).abs() )
      .fold(0.0, f64::max);
    debug!("ratio {}: half-width {} -> {}, max change {:e}", x, n, next_n, difference);

    if difference < tolerance {
      return Ok(next);
    }

    prev = next;
    n = next_n;
  }

  Err(Error::WeightsNotConverged {
    max_n: n,
    difference,
  })
}
