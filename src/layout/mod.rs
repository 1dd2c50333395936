//! Placement of the text blocks on the canvas.

pub(crate) mod position;
