//! Output generation.
//!
//! - [`json`]: writes the dated [`Snapshot`](crate::models::Snapshot) file

pub mod json;
