//! Run-wide configuration model and validation.

pub(crate) mod model;
pub(crate) mod validate;
