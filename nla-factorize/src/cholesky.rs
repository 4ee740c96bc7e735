use nac::{Error, Result, check_shape};
use nd::{Array, ArrayBase, Data, DataMut, Ix1, Ix2, LinalgScalar};

use num_traits::{Float, ToPrimitive, Zero};

pub trait Cholesky {
  type RMatrix: Sized;
  /// Returns the upper triangular factor, R, of A = R^*R. Only the upper
  /// triangle of A is read.
  fn l_lstar(self) -> Result<Self::RMatrix>;
}

impl<S> Cholesky for ArrayBase<S, Ix2>
  where S: DataMut,
        S::Elem: Float + LinalgScalar,
{
  type RMatrix = ArrayBase<S, Ix2>;

  fn l_lstar(self) -> Result<Self::RMatrix> {
    let (m, n) = self.dim();
    if m != n {
      return Err(Error::LinearAlgebra(format!("cholesky of a non-square {}x{} matrix", m, n)));
    }
    let mut r = self;

    for k in 0..m {
      let pivot = r[[k, k]];
      if !(pivot > S::Elem::zero()) || !pivot.is_finite() {
        return Err(Error::LinearAlgebra(format!("matrix is not positive definite (pivot {} at row {})",
                                                pivot.to_f64().unwrap_or(::std::f64::NAN), k)));
      }

      for j in k + 1..m {
        let factor = r[[k, j]] / pivot;
        let (src, mut dest) = r.multi_slice_mut((s![k, j..], s![j, j..]));
        dest.scaled_add(-factor, &src);
      }

      let t = pivot.sqrt().recip();
      r.row_mut(k)
        .slice_mut(s![k..])
        .mapv_inplace(|v| v * t );
    }

    for k in 0..m {
      r.row_mut(k)
        .slice_mut(s![..k])
        .fill(S::Elem::zero());
    }

    Ok(r)
  }
}

/// Solves A x = b for symmetric positive definite A.
pub fn cholesky_solve<S1, S2, E>(a: &ArrayBase<S1, Ix2>,
                                 b: &ArrayBase<S2, Ix1>) -> Result<Array<E, Ix1>>
  where S1: Data<Elem = E>,
        S2: Data<Elem = E>,
        E: Float + LinalgScalar,
{
  let m = a.nrows();
  check_shape("cholesky right hand side", &[m], b.shape())?;

  let r = a.to_owned().l_lstar()?;

  // R^* y = b
  let mut y: Array<E, Ix1> = Array::zeros(m);
  for i in 0..m {
    let mut acc = b[i];
    for p in 0..i {
      acc = acc - r[[p, i]] * y[p];
    }
    y[i] = acc / r[[i, i]];
  }

  // R x = y
  let mut x: Array<E, Ix1> = Array::zeros(m);
  for i in (0..m).rev() {
    let mut acc = y[i];
    for p in i + 1..m {
      acc = acc - r[[i, p]] * x[p];
    }
    x[i] = acc / r[[i, i]];
  }

  Ok(x)
}
