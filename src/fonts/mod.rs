//! Font discovery and loading with fallback.

pub(crate) mod discovery;
pub(crate) mod loader;
