//! Escher (Office Drawing) record layer.
//!
//! Escher is the binary drawing format shared by the legacy Office formats.
//! This module reads it into an owned record tree, exposes the atoms the
//! shape layer edits, and writes the tree back out.
//!
//! # Architecture
//!
//! - `types`: Record type tags
//! - `header`: Record header and fixed atom layouts
//! - `record`: The record tree with parsing and serialization
//! - `properties`: Opt property tables
//! - `color_ref`: Colour references stored in colour properties
//! - `writer`: Builders for fresh records

pub mod color_ref;
pub mod header;
pub mod properties;
pub mod record;
pub mod types;
pub mod writer;

pub use color_ref::{ColorRefFlags, ColorRefKind, EscherColorRef};
pub use header::{
    ChildAnchorAtom, ClientAnchorAtom, HEADER_SIZE, RecordHeader, ShapeFlags, SpAtom, SpgrAtom,
};
pub use properties::{EscherProperty, PropertyTable, PropertyValue, prop};
pub use record::{EscherRecord, RecordBody};
pub use types::{EscherRecordType, record_name, shape_type_name};
pub use writer::{AnchorKind, ShapeBuilder, shape_type};
