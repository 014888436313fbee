//! Error and diagnostic types for the drawing layer.
//!
//! Hard failures (buffer-bounds violations, I/O) surface as [`Error`].
//! Recoverable format inconsistencies are reported as [`Diagnostic`] values
//! attached to an otherwise successful result through [`Diagnosed`].

// Submodule declarations
pub mod diagnostic;
pub mod types;

// Re-exports
pub use diagnostic::{Diagnosed, Diagnostic};
pub use types::{Error, Result};
