//! Small shared helpers.

pub mod slicing;
pub mod stats;
