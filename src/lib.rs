//! Litchi Drawing - the legacy PowerPoint drawing layer
//!
//! This library reads and writes the Escher (OfficeArt) records that carry
//! the shapes of a legacy PowerPoint document, together with the picture
//! stream those shapes display.
//!
//! # Features
//!
//! - **Lossless record tree**: unknown records pass through byte for byte
//! - **Typed shapes**: geometry, rotation, flips, fill and line colours, pictures
//! - **Picture store**: scanning with corruption recovery, appending with
//!   the headers legacy metafiles need
//! - **Diagnostics**: recoverable inconsistencies are reported, not fatal
//!
//! # Example - Reading a drawing
//!
//! ```no_run
//! use bytes::Bytes;
//! use litchi_drawing::{Drawing, ParseOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = Bytes::from(std::fs::read("drawing.bin")?);
//! let drawing = Drawing::parse(&data, &ParseOptions::default())?;
//! for diagnostic in drawing.diagnostics() {
//!     eprintln!("warning: {diagnostic}");
//! }
//!
//! for shape in drawing.value().shapes() {
//!     println!("{:?} {:?}", shape.name(), shape.anchor().into_inner());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Building a drawing
//!
//! ```
//! use litchi_drawing::{Anchor, Document, Drawing, NewShape, PictureType};
//! use litchi_drawing::escher::shape_type;
//!
//! # fn main() -> litchi_drawing::Result<()> {
//! let mut document = Document::new();
//! let logo = document.add_picture(PictureType::Png, b"\x89PNG...")?;
//!
//! let mut drawing = Drawing::new(1);
//! let group = drawing.add_shape(None, NewShape::group())?;
//! let rect = drawing.add_shape(
//!     Some(group),
//!     NewShape::auto_shape(shape_type::RECTANGLE)
//!         .with_anchor(Anchor::new(10.0, 10.0, 100.0, 50.0)),
//! )?;
//! drawing.add_shape(None, NewShape::picture(logo))?;
//!
//! let mut shape = drawing.shape_mut(rect).unwrap();
//! shape.set_rotation(45.0)?;
//! shape.set_flip_horizontal(true)?;
//!
//! let bytes = drawing.to_bytes();
//! assert!(!bytes.is_empty());
//! document.add_drawing(drawing);
//! # Ok(())
//! # }
//! ```

/// Shared binary readers, units and error types
pub mod common;

/// Parser configuration
pub mod config;

/// The document-level owner of drawings and pictures
pub mod document;

/// Escher record tree, property tables and record builders
pub mod escher;

/// Picture kinds and the document picture store
pub mod images;

/// Shape arena and typed shape accessors
pub mod shapes;

/// The sheet collaborator: colour scheme and hyperlinks
pub mod sheet;

// Re-export commonly used types for convenience
pub use common::{Diagnosed, Diagnostic, Error, Result};
pub use config::ParseOptions;
pub use document::Document;
pub use escher::{EscherRecord, EscherRecordType, PropertyTable};
pub use images::{PictureData, PictureStore, PictureType};
pub use shapes::{Anchor, Drawing, Fill, NewShape, ShapeId, ShapeKind, ShapeMut, ShapeRef};
pub use sheet::{ColorScheme, Rgb, Rgba, Sheet};
