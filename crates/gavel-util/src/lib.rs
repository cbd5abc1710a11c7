//! Shared utilities for the Gavel dependency analyzer: error types and
//! terminal progress helpers.

pub mod errors;
pub mod progress;
