extern crate ndarray as nd;
extern crate num_traits;
extern crate thiserror;

use nd::prelude::*;
use nd::linalg::general_mat_vec_mul;
use nd::{Data, LinalgScalar};

use num_traits::{One, Zero};

pub use error::{Result, Error, check_positive, check_shape};

pub mod error;

/// Something that maps an array onto another array of (possibly) different
/// shape. Implementors check shapes and return `DimensionMismatch` instead of
/// panicking.
pub trait Operator<E, Dim>: Send + Sync
  where Dim: nd::Dimension,
{
  fn operator_input_dim(&self) -> Dim;
  fn operator_output_dim(&self) -> Dim;
  fn eval_at(&self, x: ArrayView<E, Dim>,
             out: ArrayViewMut<E, Dim>) -> Result<()>;

  /// Allocating version of `eval_at`.
  fn eval(&self, x: ArrayView<E, Dim>) -> Result<Array<E, Dim>>
    where E: Clone + Zero,
  {
    let mut out = Array::zeros(self.operator_output_dim());
    self.eval_at(x, out.view_mut())?;
    Ok(out)
  }
}

impl<D, E> Operator<E, Ix1> for ArrayBase<D, Ix2>
  where D: Data<Elem = E> + Send + Sync,
        E: LinalgScalar + One + Zero + Sync + Send,
{
  fn operator_input_dim(&self) -> Ix1 { Ix1(self.ncols()) }
  fn operator_output_dim(&self) -> Ix1 { Ix1(self.nrows()) }
  fn eval_at(&self, x: ArrayView<E, Ix1>,
             mut out: ArrayViewMut<E, Ix1>) -> Result<()> {
    check_shape("operator input", &[self.ncols()], x.shape())?;
    check_shape("operator output", &[self.nrows()], out.shape())?;

    general_mat_vec_mul(One::one(),
                        self, &x, Zero::zero(),
                        &mut out);

    Ok(())
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use nd::{arr1, arr2};

  #[test]
  fn matrix_operator() {
    let a = arr2(&[
      [1.0, 2.0],
      [3.0, 4.0],
      [5.0, 6.0],
    ]);
    assert_eq!(a.operator_input_dim(), Ix1(2));
    assert_eq!(a.operator_output_dim(), Ix1(3));

    let y = a.eval(arr1(&[1.0, -1.0]).view()).unwrap();
    assert_eq!(y, arr1(&[-1.0, -1.0, -1.0]));
  }

  #[test]
  fn matrix_operator_shape_mismatch() {
    let a = arr2(&[[1.0, 2.0], [3.0, 4.0]]);
    let err = a.eval(arr1(&[1.0, 2.0, 3.0]).view()).unwrap_err();
    assert_eq!(err, Error::DimensionMismatch {
      what: "operator input",
      expected: vec![2],
      found: vec![3],
    });
  }

  #[test]
  fn positive_check() {
    assert!(check_positive("dy", 1.0).is_ok());
    assert!(check_positive("dy", 0.0).is_err());
    assert!(check_positive("dy", ::std::f64::NAN).is_err());
    assert!(check_positive("dy", ::std::f64::INFINITY).is_err());
  }
}
