//! Input asset interpretation.

pub(crate) mod color;
