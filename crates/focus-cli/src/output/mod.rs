//! Machine-readable output.

pub mod json;

pub use json::{history_json, status_json};
