//! Image encoding and output paths.

pub(crate) mod saver;
