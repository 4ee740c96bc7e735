//! Helpers over half kernels `w`, where `w[0]` is the center tap and `w[d]`
//! the tap at offsets `+d` and `-d`.

use nd::{Array, ArrayBase, Data, Ix1};

/// The full `2n + 1` tap kernel `[w_n, .., w_1, w_0, w_1, .., w_n]`.
pub fn full_kernel<S>(w: &ArrayBase<S, Ix1>) -> Array<f64, Ix1>
  where S: Data<Elem = f64>,
{
  if w.is_empty() {
    return Array::zeros(0);
  }

  let n = w.len() - 1;
  let mut kernel = Array::zeros(2 * n + 1);
  for (d, &v) in w.iter().enumerate() {
    kernel[n + d] = v;
    kernel[n - d] = v;
  }

  kernel
}

/// `H(k) = w_0 + 2 sum_i w_i cos(i k)`, the response of the symmetric kernel
/// at wavenumber `k`.
pub fn frequency_response<S>(w: &ArrayBase<S, Ix1>, k: f64) -> f64
  where S: Data<Elem = f64>,
{
  w.iter()
    .enumerate()
    .map(|(i, &v)| {
      if i == 0 { v } else { 2.0 * v * (i as f64 * k).cos() }
    })
    .sum()
}

/// Largest offset whose tap is at least `threshold` in magnitude; 0 when only
/// the center tap is.
pub fn effective_support<S>(w: &ArrayBase<S, Ix1>, threshold: f64) -> usize
  where S: Data<Elem = f64>,
{
  (1..w.len())
    .rev()
    .find(|&i| w[i].abs() >= threshold )
    .unwrap_or(0)
}
