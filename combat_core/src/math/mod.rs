//! Numerical helpers

pub mod lambert;

pub use lambert::{lambert_w0, lambert_wm1, LambertResult};
