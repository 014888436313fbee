// Embedded pictures
//
// Pictures live in one stream shared by the whole document. Picture shapes
// refer to them by zero-based position in that stream.
//
// # Architecture
//
// - `picture`: picture kinds, their type tags and signatures, and the
//   headers synthesized for PICT and WMF data
// - `store`: the ordered picture store with its scanner and writer
//
// # Example
//
// ```
// use litchi_drawing::images::{PictureStore, PictureType};
//
// let mut store = PictureStore::new();
// let index = store.append(PictureType::Png, b"\x89PNG...")?;
// assert_eq!(store.get(index).unwrap().kind(), PictureType::Png);
// # Ok::<(), litchi_drawing::Error>(())
// ```

pub mod picture;
pub mod store;

pub use picture::{PictureType, with_synthesized_header};
pub use store::{PictureData, PictureStore};
