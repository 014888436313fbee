//! Unified error type for the drawing layer.
use thiserror::Error;

use crate::common::binary::BinaryError;

/// Main error type for drawing-layer operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A record declares more payload than the buffer holds
    #[error(
        "Truncated record at offset {offset}: declared {declared} bytes, {available} available"
    )]
    TruncatedRecord {
        offset: usize,
        declared: usize,
        available: usize,
    },

    /// A child operation was attempted on an atom record
    #[error("Record 0x{record_id:04X} is not a container")]
    NotAContainer { record_id: u16 },

    /// Container nesting exceeds the configured limit
    #[error("Record nesting exceeds the maximum depth of {depth}")]
    NestingTooDeep { depth: usize },

    /// Picture entry with a type tag that maps to no known picture kind (strict mode)
    #[error("Unknown picture type 0x{type_tag:04X} at offset {offset}")]
    UnknownPictureType { offset: u64, type_tag: u16 },

    /// A required record or shape is missing
    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    /// The sheet back-reference of a shape was already set
    #[error("Shape is already attached to a sheet")]
    SheetAlreadyAttached,

    /// Shape records are inconsistent with the requested operation
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// Corrupted or malformed data
    #[error("Corrupted file: {0}")]
    CorruptedFile(String),
}

impl From<BinaryError> for Error {
    fn from(err: BinaryError) -> Self {
        match err {
            BinaryError::InsufficientData {
                expected,
                available,
            } => Error::CorruptedFile(format!(
                "insufficient data: expected {expected}, got {available}"
            )),
        }
    }
}

/// Result type for drawing-layer operations.
pub type Result<T> = std::result::Result<T, Error>;
