//! Layers, style resolution, the staged builder and the generator facade.

pub(crate) mod builder;
pub(crate) mod generator;
pub(crate) mod layer;
pub(crate) mod resolve;
