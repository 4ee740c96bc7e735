#[macro_use]
extern crate ndarray as nd;
extern crate na_core as nac;
extern crate num_traits;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub use cholesky::*;

pub mod cholesky;
