//! Shared numeric helpers
//!
//! - **finance**: EMI, APR, NPV and IRR arithmetic
//! - **numeric**: clamping, normalization and the logistic function

pub mod finance;
pub mod numeric;

pub use finance::{apr, emi, irr, npv};
pub use numeric::{min_max_normalize, sigmoid, EPSILON};
