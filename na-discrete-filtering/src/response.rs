//! Target frequency responses for the weight designer.

use std::f64::consts::PI;

use nac::{Error, Result};

/// Shape preserving piecewise cubic Hermite interpolant (Fritsch-Carlson).
/// Monotone data give a monotone curve with no overshoot between knots.
#[derive(Debug, Clone, PartialEq)]
pub struct MonotoneCubic {
  xs: Vec<f64>,
  ys: Vec<f64>,
  slopes: Vec<f64>,
}

impl MonotoneCubic {
  pub fn new(xs: &[f64], ys: &[f64]) -> Result<MonotoneCubic> {
    if xs.len() != ys.len() {
      return Err(Error::DimensionMismatch {
        what: "interpolant values",
        expected: vec![xs.len()],
        found: vec![ys.len()],
      });
    }
    if xs.len() < 2 {
      return Err(Error::invalid("xs", "need at least two knots"));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite() ) {
      return Err(Error::invalid("xs", "knots and values must be finite"));
    }
    if xs.windows(2).any(|w| w[0] >= w[1] ) {
      return Err(Error::invalid("xs", "knots must be strictly increasing"));
    }

    let slopes = pchip_slopes(xs, ys);

    Ok(MonotoneCubic {
      xs: xs.to_vec(),
      ys: ys.to_vec(),
      slopes,
    })
  }

  pub fn knots(&self) -> &[f64] { &self.xs[..] }

  /// Evaluates the interpolant; `x` outside the knot range is clamped.
  pub fn eval(&self, x: f64) -> f64 {
    let last = self.xs.len() - 1;
    let x = x.max(self.xs[0]).min(self.xs[last]);

    let seg = self.xs
      .partition_point(|&k| k <= x )
      .saturating_sub(1)
      .min(last - 1);

    let h = self.xs[seg + 1] - self.xs[seg];
    let t = (x - self.xs[seg]) / h;
    let t2 = t * t;
    let t3 = t2 * t;

    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + t;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;

    h00 * self.ys[seg] + h10 * h * self.slopes[seg]
      + h01 * self.ys[seg + 1] + h11 * h * self.slopes[seg + 1]
  }
}

fn pchip_slopes(xs: &[f64], ys: &[f64]) -> Vec<f64> {
  let n = xs.len();
  let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0] ).collect();
  let delta: Vec<f64> = (0..n - 1)
    .map(|i| (ys[i + 1] - ys[i]) / h[i] )
    .collect();

  if n == 2 {
    return vec![delta[0], delta[0]];
  }

  let mut slopes = vec![0.0; n];
  for i in 1..n - 1 {
    if delta[i - 1] * delta[i] <= 0.0 {
      // local extremum
      continue;
    }
    let w1 = 2.0 * h[i] + h[i - 1];
    let w2 = h[i] + 2.0 * h[i - 1];
    slopes[i] = (w1 + w2) / (w1 / delta[i - 1] + w2 / delta[i]);
  }

  slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
  slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);

  slopes
}

/// One sided three point estimate, limited so the end segment stays monotone.
fn end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
  let s = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
  if s * d0 <= 0.0 {
    0.0
  } else if d0 * d1 <= 0.0 && s.abs() > (3.0 * d0).abs() {
    3.0 * d0
  } else {
    s
  }
}

/// F(k) on [0, pi]: passes everything below `1/ratio`, blocks everything
/// above `pi/ratio`, with a monotone cubic transition in between.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetResponse {
  ratio: f64,
  curve: MonotoneCubic,
}

impl TargetResponse {
  pub fn low_pass(ratio: f64) -> Result<TargetResponse> {
    if !ratio.is_finite() || ratio <= 1.0 {
      return Err(Error::invalid("ratio", format!("coarsening ratio must be finite and > 1, got {}", ratio)));
    }

    let xs = [0.0, ratio.recip(), PI / ratio, PI];
    let ys = [1.0, 1.0, 0.0, 0.0];

    Ok(TargetResponse {
      ratio,
      curve: MonotoneCubic::new(&xs, &ys)?,
    })
  }

  pub fn ratio(&self) -> f64 { self.ratio }
  /// Control points; F is smooth between consecutive knots.
  pub fn knots(&self) -> &[f64] { self.curve.knots() }
  pub fn eval(&self, k: f64) -> f64 { self.curve.eval(k) }
}
