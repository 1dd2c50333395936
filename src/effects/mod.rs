//! Pixel-level text decoration and compositing.

pub(crate) mod blur;
pub(crate) mod composite;
pub(crate) mod outline;
pub(crate) mod shadow;
