//! Text transforms, shaping/measurement and fragment preparation.

pub(crate) mod engine;
pub(crate) mod renderer;
pub(crate) mod transform;
