//! Symmetric moving average weights approximating a low pass filter in
//! wavenumber space, for coarsening a field by a given grid ratio.

#[macro_use]
extern crate log;
#[macro_use]
extern crate ndarray as nd;
extern crate na_core as nac;
extern crate na_quadrature as nq;
extern crate nla_factorize as nla;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub use nac::{Error, Result};

pub use design::{FilterDesign, design_filter, design_converged,
                 solve_closed_form, system_matrix};
pub use kernel::{effective_support, frequency_response, full_kernel};
pub use response::{MonotoneCubic, TargetResponse};

pub mod design;
pub mod kernel;
pub mod response;
