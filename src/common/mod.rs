//! Common types and utilities shared by the record, shape and picture layers.

// Submodule declarations
pub mod binary;
pub mod error;
pub mod unit;

// Re-exports for convenience
pub use error::{Diagnosed, Diagnostic, Error, Result};
