
//! Adaptive Gauss-Kronrod (G7/K15) quadrature.
//! The work list is seeded with one segment per pair of breakpoints and the
//! segment with the largest error estimate is bisected until the summed
//! estimate drops below tolerance.

use nac::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadOptions {
  pub atol: f64,
  pub rtol: f64,
  /// Maximum number of bisections.
  pub limit: usize,
}
impl Default for QuadOptions {
  fn default() -> Self {
    QuadOptions {
      atol: 1.0e-10,
      rtol: 1.0e-10,
      limit: 500,
    }
  }
}
impl QuadOptions {
  pub fn validate(&self) -> Result<()> {
    for &(name, tol) in [("atol", self.atol), ("rtol", self.rtol)].iter() {
      if !tol.is_finite() || tol < 0.0 {
        return Err(Error::invalid(name, format!("must be finite and >= 0, got {}", tol)));
      }
    }
    if self.atol == 0.0 && self.rtol == 0.0 {
      return Err(Error::invalid("atol", "atol and rtol can't both be zero"));
    }
    if self.limit == 0 {
      return Err(Error::invalid("limit", "must be at least 1"));
    }

    Ok(())
  }

  fn tolerance(&self, integral: f64) -> f64 {
    self.atol.max(self.rtol * integral.abs())
  }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
  pub integral: f64,
  pub error: f64,
  pub evaluations: usize,
  pub subdivisions: usize,
}

#[derive(Debug, Clone, Copy)]
struct Segment {
  a: f64,
  b: f64,
  integral: f64,
  error: f64,
}
impl Segment {
  fn new<F>(f: &F, a: f64, b: f64) -> Segment
    where F: Fn(f64) -> f64,
  {
    let (integral, error) = kronrod15(f, a, b);
    Segment { a, b, integral, error, }
  }
}

/// Integrates `f` from `points[0]` to the last breakpoint. Interior
/// breakpoints are where `f` (or a derivative) is known to jump.
pub fn quad<F>(f: F, points: &[f64], options: &QuadOptions) -> Result<Quadrature>
  where F: Fn(f64) -> f64,
{
  options.validate()?;

  if points.len() < 2 {
    return Err(Error::invalid("points", "need at least two breakpoints"));
  }
  if points.iter().any(|p| !p.is_finite() ) {
    return Err(Error::invalid("points", "breakpoints must be finite"));
  }
  if points.windows(2).any(|w| w[0] >= w[1] ) {
    return Err(Error::invalid("points", "breakpoints must be strictly increasing"));
  }

  let mut segments: Vec<Segment> = points
    .windows(2)
    .map(|w| Segment::new(&f, w[0], w[1]) )
    .collect();
  let mut evaluations = KRONROD_POINTS * segments.len();
  let mut subdivisions = 0;

  loop {
    let integral: f64 = segments.iter().map(|s| s.integral ).sum();
    let error: f64 = segments.iter().map(|s| s.error ).sum();
    let tolerance = options.tolerance(integral);

    if error <= tolerance {
      trace!("quad converged: integral = {:e}, error = {:e}, subdivisions = {}",
             integral, error, subdivisions);
      return Ok(Quadrature {
        integral,
        error,
        evaluations,
        subdivisions,
      });
    }

    let worst = segments
      .iter()
      .enumerate()
      .max_by(|l, r| l.1.error.total_cmp(&r.1.error) )
      .map(|(idx, _)| idx )
      .unwrap_or(0);
    let mid = 0.5 * (segments[worst].a + segments[worst].b);
    let splittable = segments[worst].a < mid && mid < segments[worst].b;

    if subdivisions == options.limit || !splittable {
      debug!("quad gave up: error = {:e}, tolerance = {:e}, subdivisions = {}",
             error, tolerance, subdivisions);
      return Err(Error::Quadrature {
        error,
        tolerance,
        subdivisions,
      });
    }

    let s = segments.swap_remove(worst);
    segments.push(Segment::new(&f, s.a, mid));
    segments.push(Segment::new(&f, mid, s.b));
    evaluations += 2 * KRONROD_POINTS;
    subdivisions += 1;
  }
}

const KRONROD_POINTS: usize = 15;

/// Kronrod abscissae on [-1, 1], descending, non-negative half. Odd indices
/// are shared with the 7 point Gauss rule.
const XGK: [f64; 8] = [
  0.991455371120812639206854697526329,
  0.949107912342758524526189684047851,
  0.864864423359769072789712788640926,
  0.741531185599394439863864773280788,
  0.586087235467691130294144845693013,
  0.405845151377397166906606412076961,
  0.207784955007898467600689403773245,
  0.000000000000000000000000000000000,
];
const WGK: [f64; 8] = [
  0.022935322010529224963732008058970,
  0.063092092629978553290700663189204,
  0.104790010322250183839876322541518,
  0.140653259715525918745189590510238,
  0.169004726639267902826583426598550,
  0.190350578064785409913256402421014,
  0.204432940075298892414161999234649,
  0.209482141084727828012999174891714,
];
const WG: [f64; 4] = [
  0.129484966168869693270611432679082,
  0.279705391489276667901467771423780,
  0.381830050505118944950369775488975,
  0.417959183673469387755102040816327,
];

/// Returns (integral, |K15 - G7|).
fn kronrod15<F>(f: &F, a: f64, b: f64) -> (f64, f64)
  where F: Fn(f64) -> f64,
{
  let center = 0.5 * (a + b);
  let half = 0.5 * (b - a);

  let fc = f(center);
  let mut resg = fc * WG[3];
  let mut resk = fc * WGK[7];

  for j in 0..3 {
    let jtw = 2 * j + 1;
    let absc = half * XGK[jtw];
    let fsum = f(center - absc) + f(center + absc);
    resg += WG[j] * fsum;
    resk += WGK[jtw] * fsum;
  }
  for j in 0..4 {
    let jtwm1 = 2 * j;
    let absc = half * XGK[jtwm1];
    let fsum = f(center - absc) + f(center + absc);
    resk += WGK[jtwm1] * fsum;
  }

  (resk * half, ((resk - resg) * half).abs())
}
