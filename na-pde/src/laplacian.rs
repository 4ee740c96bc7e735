
//! Flux form Laplacian on a doubly periodic grid with a land mask.
//!
//! Along each axis, with indices wrapping,
//!
//!   right[idx] = open[idx + 1] * (f[idx + 1] - f[idx])
//!   left[idx]  = open[idx - 1] * (f[idx] - f[idx - 1])
//!
//! and the axis contributes `(right - left) / spacing^2`. Fluxes into land
//! vanish, so the sum of the output over the domain telescopes to zero, land
//! or no land. Output on land cells is exactly zero.

use nac::{Operator, Result, check_positive, check_shape};
use nd::{Array, ArrayBase, ArrayView, ArrayViewMut, Axis, Data, Ix1, Ix2, Zip};

use crate::grid::ZonalSpacing;

const X: Axis = Axis(0);
const Y: Axis = Axis(1);

/// `laplacian(field, landMask, dx, dy)`. `field` is `Nx x Ny`, indexed
/// `[x, y]`; `dx` has one entry per y-row.
pub fn laplacian<S1, S2, S3>(field: &ArrayBase<S1, Ix2>,
                             land_mask: &ArrayBase<S2, Ix2>,
                             dx: &ArrayBase<S3, Ix1>,
                             dy: f64) -> Result<Array<f64, Ix2>>
  where S1: Data<Elem = f64>,
        S2: Data<Elem = bool>,
        S3: Data<Elem = f64>,
{
  check_shape("land mask", field.shape(), land_mask.shape())?;
  check_shape("dx", &[field.len_of(Y)], dx.shape())?;
  for &v in dx.iter() {
    check_positive("dx", v)?;
  }
  check_positive("dy", dy)?;

  let mut out: Array<f64, Ix2> = Array::zeros(field.raw_dim());
  apply(field.view(), land_mask.view(), dx.view(), dy, out.view_mut());
  Ok(out)
}

/// The Laplacian with its land mask and grid spacing bound, usable anywhere
/// an `Operator` is expected.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedLaplacian {
  land_mask: Array<bool, Ix2>,
  spacing: ZonalSpacing,
}

impl MaskedLaplacian {
  pub fn new(land_mask: Array<bool, Ix2>,
             spacing: ZonalSpacing) -> Result<MaskedLaplacian> {
    check_shape("dx", &[land_mask.len_of(Y)], &[spacing.ny()])?;

    Ok(MaskedLaplacian {
      land_mask,
      spacing,
    })
  }

  /// No land anywhere.
  pub fn open(nx: usize, spacing: ZonalSpacing) -> MaskedLaplacian {
    let land_mask = Array::from_elem((nx, spacing.ny()), false);
    MaskedLaplacian {
      land_mask,
      spacing,
    }
  }

  pub fn land_mask(&self) -> ArrayView<'_, bool, Ix2> { self.land_mask.view() }
  pub fn spacing(&self) -> &ZonalSpacing { &self.spacing }
}

impl Operator<f64, Ix2> for MaskedLaplacian {
  fn operator_input_dim(&self) -> Ix2 { self.land_mask.raw_dim() }
  fn operator_output_dim(&self) -> Ix2 { self.land_mask.raw_dim() }

  fn eval_at(&self, x: ArrayView<f64, Ix2>,
             mut out: ArrayViewMut<f64, Ix2>) -> Result<()> {
    check_shape("field", self.land_mask.shape(), x.shape())?;
    check_shape("output", self.land_mask.shape(), out.shape())?;

    out.fill(0.0);
    apply(x, self.land_mask.view(), self.spacing.dx(), self.spacing.dy(), out);
    Ok(())
  }
}

/// Shapes are checked by the callers. `out` must start zeroed.
fn apply(field: ArrayView<f64, Ix2>,
         land_mask: ArrayView<bool, Ix2>,
         dx: ArrayView<f64, Ix1>,
         dy: f64,
         mut out: ArrayViewMut<f64, Ix2>) {
  let inv_dx2 = dx.mapv(|d| (d * d).recip() );
  let inv_dy2 = (dy * dy).recip();

  for &axis in [X, Y].iter() {
    Zip::indexed(&mut out)
      .for_each(|idx, out| {
        if land_mask[idx] {
          return;
        }

        let next = neighbour(idx, axis, true, field.dim());
        let prev = neighbour(idx, axis, false, field.dim());

        // a land neighbour may hold a fill value, so its difference is
        // never formed
        let right = if land_mask[next] { 0.0 } else { field[next] - field[idx] };
        let left = if land_mask[prev] { 0.0 } else { field[idx] - field[prev] };

        let scale = if axis == X { inv_dx2[idx.1] } else { inv_dy2 };
        *out += (right - left) * scale;
      });
  }

  Zip::from(&mut out)
    .and(&land_mask)
    .for_each(|out, &land| {
      if land {
        *out = 0.0;
      }
    });

  trace!("laplacian over {:?} cells, {} land",
         field.dim(), land_mask.iter().filter(|&&l| l ).count());
}

/// Periodic neighbour of `idx` one step along `axis`.
fn neighbour((i, j): (usize, usize), axis: Axis, forward: bool,
             (nx, ny): (usize, usize)) -> (usize, usize) {
  let step = |v: usize, n: usize| {
    if forward { (v + 1) % n } else { (v + n - 1) % n }
  };

  if axis == X {
    (step(i, nx), j)
  } else {
    (i, step(j, ny))
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use nac::Error;
  use nd::{arr1, arr2, Array1, Array2};
  use rand::rngs::StdRng;
  use rand::{Rng, SeedableRng};
  use std::f64::consts::PI;

  fn random_field(rng: &mut StdRng, nx: usize, ny: usize) -> Array2<f64> {
    Array2::from_shape_fn((nx, ny), |_| rng.gen_range(-10.0..10.0) )
  }
  fn random_mask(rng: &mut StdRng, nx: usize, ny: usize, p: f64) -> Array2<bool> {
    Array2::from_shape_fn((nx, ny), |_| rng.gen_bool(p) )
  }
  fn random_dx(rng: &mut StdRng, ny: usize) -> Array1<f64> {
    Array1::from_shape_fn(ny, |_| rng.gen_range(0.5..2.0) )
  }

  #[test]
  fn single_spike() {
    let field = arr2(&[
      [0.0, 0.0, 0.0],
      [0.0, 1.0, 0.0],
      [0.0, 0.0, 0.0],
    ]);
    let mask = Array2::from_elem((3, 3), false);
    let out = laplacian(&field, &mask, &arr1(&[1.0, 1.0, 1.0]), 1.0).unwrap();

    let expected = arr2(&[
      [0.0, 1.0, 0.0],
      [1.0, -4.0, 1.0],
      [0.0, 1.0, 0.0],
    ]);
    assert_eq!(out, expected);
  }

  #[test]
  fn spacing_scales_each_axis() {
    let mut field = Array2::zeros((3, 2));
    field[[1, 0]] = 1.0;
    field[[1, 1]] = 1.0;
    let mask = Array2::from_elem((3, 2), false);

    // uniform along y, so only the x term survives
    let out = laplacian(&field, &mask, &arr1(&[1.0, 2.0]), 0.5).unwrap();
    assert_abs_diff_eq!(out[[1, 0]], -2.0, epsilon = 1.0e-15);
    assert_abs_diff_eq!(out[[1, 1]], -0.5, epsilon = 1.0e-15);
    assert_abs_diff_eq!(out[[0, 1]], 0.25, epsilon = 1.0e-15);

    let field = field.reversed_axes();
    let mask = Array2::from_elem((2, 3), false);
    let out = laplacian(&field, &mask, &arr1(&[1.0, 1.0, 1.0]), 0.5).unwrap();
    assert_abs_diff_eq!(out[[0, 1]], -8.0, epsilon = 1.0e-15);
    assert_abs_diff_eq!(out[[1, 2]], 4.0, epsilon = 1.0e-15);
  }

  #[test]
  fn discrete_eigenfunction() {
    let (nx, ny) = (8, 5);
    let dx = arr1(&[1.0, 0.5, 2.0, 1.5, 0.8]);
    let field = Array2::from_shape_fn((nx, ny), |(i, _)| {
      (2.0 * PI * i as f64 / nx as f64).cos()
    });
    let mask = Array2::from_elem((nx, ny), false);
    let out = laplacian(&field, &mask, &dx, 3.0).unwrap();

    let eigenvalue = 2.0 * (2.0 * PI / nx as f64).cos() - 2.0;
    for ((i, j), &v) in out.indexed_iter() {
      let expected = eigenvalue * field[[i, j]] / (dx[j] * dx[j]);
      assert_abs_diff_eq!(v, expected, epsilon = 1.0e-12);
    }
  }

  #[test]
  fn zero_sum_without_land() {
    let mut rng = StdRng::seed_from_u64(7);
    for &(nx, ny) in [(3, 3), (16, 9), (1, 5), (24, 32)].iter() {
      let field = random_field(&mut rng, nx, ny);
      let mask = Array2::from_elem((nx, ny), false);
      let dx = random_dx(&mut rng, ny);
      let dy = rng.gen_range(0.5..2.0);

      let out = laplacian(&field, &mask, &dx, dy).unwrap();
      assert_abs_diff_eq!(out.sum(), 0.0, epsilon = 1.0e-9);
    }
  }

  #[test]
  fn zero_sum_with_land() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
      let (nx, ny) = (20, 14);
      let field = random_field(&mut rng, nx, ny);
      let mask = random_mask(&mut rng, nx, ny, 0.3);
      let dx = random_dx(&mut rng, ny);

      let out = laplacian(&field, &mask, &dx, 1.25).unwrap();
      assert_abs_diff_eq!(out.sum(), 0.0, epsilon = 1.0e-9);
    }
  }

  #[test]
  fn land_output_is_zero() {
    let mut rng = StdRng::seed_from_u64(3);
    let (nx, ny) = (12, 10);
    let mut field = random_field(&mut rng, nx, ny);
    let mask = random_mask(&mut rng, nx, ny, 0.4);
    let dx = random_dx(&mut rng, ny);

    // fill values on land must not leak into the ocean
    Zip::from(&mut field)
      .and(&mask)
      .for_each(|f, &land| if land { *f = ::std::f64::NAN; });

    let out = laplacian(&field, &mask, &dx, 0.7).unwrap();
    for (&v, &land) in out.iter().zip(mask.iter()) {
      if land {
        assert_eq!(v, 0.0);
        assert!(v.is_sign_positive());
      } else {
        assert!(v.is_finite());
      }
    }
  }

  #[test]
  fn land_blocks_flux() {
    // spike next to a land cell only spreads into the ocean
    let field = arr2(&[
      [0.0, 0.0, 0.0],
      [0.0, 1.0, 5.0],
      [0.0, 0.0, 0.0],
    ]);
    let mut mask = Array2::from_elem((3, 3), false);
    mask[[1, 2]] = true;

    let out = laplacian(&field, &mask, &arr1(&[1.0, 1.0, 1.0]), 1.0).unwrap();
    assert_eq!(out[[1, 1]], -3.0);
    assert_eq!(out[[1, 2]], 0.0);
    // wraps around to column 0
    assert_eq!(out[[1, 0]], 1.0);
    assert_eq!(out[[0, 1]], 1.0);
    assert_eq!(out[[2, 1]], 1.0);
  }

  #[test]
  fn constant_field_has_no_curvature() {
    let mut rng = StdRng::seed_from_u64(5);
    let (nx, ny) = (9, 13);
    let field = Array2::from_elem((nx, ny), 3.7);
    let mask = random_mask(&mut rng, nx, ny, 0.25);
    let dx = random_dx(&mut rng, ny);

    let out = laplacian(&field, &mask, &dx, 2.0).unwrap();
    assert!(out.iter().all(|&v| v == 0.0 ));
  }

  #[test]
  fn shape_mismatches() {
    let field = Array2::<f64>::zeros((4, 3));
    let mask = Array2::from_elem((3, 4), false);
    match laplacian(&field, &mask, &arr1(&[1.0, 1.0, 1.0]), 1.0) {
      Err(Error::DimensionMismatch { what: "land mask", expected, found, }) => {
        assert_eq!(expected, vec![4, 3]);
        assert_eq!(found, vec![3, 4]);
      },
      other => panic!("expected a mask mismatch, got {:?}", other),
    }

    let mask = Array2::from_elem((4, 3), false);
    match laplacian(&field, &mask, &arr1(&[1.0, 1.0, 1.0, 1.0]), 1.0) {
      Err(Error::DimensionMismatch { what: "dx", expected, found, }) => {
        assert_eq!(expected, vec![3]);
        assert_eq!(found, vec![4]);
      },
      other => panic!("expected a dx mismatch, got {:?}", other),
    }
  }

  #[test]
  fn bad_spacing() {
    let field = Array2::<f64>::zeros((2, 2));
    let mask = Array2::from_elem((2, 2), false);
    assert!(laplacian(&field, &mask, &arr1(&[1.0, 0.0]), 1.0).is_err());
    assert!(laplacian(&field, &mask, &arr1(&[1.0, 1.0]), -1.0).is_err());
  }

  #[test]
  fn operator_matches_function() {
    let mut rng = StdRng::seed_from_u64(17);
    let (nx, ny) = (10, 6);
    let field = random_field(&mut rng, nx, ny);
    let mask = random_mask(&mut rng, nx, ny, 0.2);
    let dx = random_dx(&mut rng, ny);

    let op = MaskedLaplacian::new(mask.clone(),
                                  ZonalSpacing::new(dx.clone(), 0.9).unwrap())
      .unwrap();
    assert_eq!(op.operator_input_dim(), field.raw_dim());

    let direct = laplacian(&field, &mask, &dx, 0.9).unwrap();
    assert_eq!(op.eval(field.view()).unwrap(), direct);

    // eval_at overwrites whatever is in the output
    let mut out = Array2::from_elem((nx, ny), 42.0);
    op.eval_at(field.view(), out.view_mut()).unwrap();
    assert_eq!(out, direct);

    let mut wrong = Array2::zeros((nx, ny + 1));
    assert!(op.eval_at(field.view(), wrong.view_mut()).is_err());
    assert!(op.eval(Array2::zeros((nx + 1, ny)).view()).is_err());
  }

  #[test]
  fn operator_mask_must_match_spacing() {
    let mask = Array2::from_elem((4, 3), false);
    let spacing = ZonalSpacing::uniform(4, 1.0, 1.0).unwrap();
    assert!(MaskedLaplacian::new(mask, spacing).is_err());

    let spacing = ZonalSpacing::uniform(3, 1.0, 1.0).unwrap();
    let op = MaskedLaplacian::open(5, spacing);
    assert_eq!(op.land_mask().dim(), (5, 3));
    assert!(op.land_mask().iter().all(|&l| !l ));
  }
}
