#[macro_use]
extern crate log;
extern crate na_core as nac;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub use kronrod::{quad, QuadOptions, Quadrature};

pub mod kronrod;
