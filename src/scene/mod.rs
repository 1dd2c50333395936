//! Per-image input rows.

pub(crate) mod row;
