//! Finite difference operators on doubly periodic, land masked grids.

#[macro_use]
extern crate log;
extern crate ndarray as nd;
extern crate na_core as nac;

#[cfg(test)]
#[macro_use]
extern crate approx;
#[cfg(test)]
extern crate rand;

pub use nac::{Error, Operator, Result};

pub use grid::ZonalSpacing;
pub use laplacian::{laplacian, MaskedLaplacian};

pub mod grid;
pub mod laplacian;
