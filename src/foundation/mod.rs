//! Shared primitives: error taxonomy, color/pixel types and fixed-point helpers.

pub(crate) mod core;
pub(crate) mod error;
pub(crate) mod math;
