//! The per-document owner of drawings and pictures.

use std::io::Write;

use bytes::Bytes;

use crate::common::error::{Diagnosed, Result};
use crate::config::ParseOptions;
use crate::images::{PictureData, PictureStore, PictureType};
use crate::shapes::{Drawing, ShapeRef};

/// A document's drawing layer: one picture store shared by every drawing.
#[derive(Debug, Default)]
pub struct Document {
    pictures: PictureStore,
    drawings: Vec<Drawing>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// A document over an existing picture stream.
    pub fn with_picture_stream(stream: &Bytes, options: &ParseOptions) -> Result<Diagnosed<Self>> {
        Ok(PictureStore::parse(stream, options)?.map(|pictures| Self {
            pictures,
            drawings: Vec::new(),
        }))
    }

    #[inline]
    pub fn pictures(&self) -> &PictureStore {
        &self.pictures
    }

    /// Store a picture and return the index picture shapes refer to it by.
    pub fn add_picture(&mut self, kind: PictureType, data: &[u8]) -> Result<u32> {
        self.pictures.append(kind, data)
    }

    /// Take ownership of a drawing and return its position.
    pub fn add_drawing(&mut self, drawing: Drawing) -> usize {
        self.drawings.push(drawing);
        self.drawings.len() - 1
    }

    #[inline]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    #[inline]
    pub fn drawing(&self, index: usize) -> Option<&Drawing> {
        self.drawings.get(index)
    }

    #[inline]
    pub fn drawing_mut(&mut self, index: usize) -> Option<&mut Drawing> {
        self.drawings.get_mut(index)
    }

    /// The picture a picture shape displays.
    pub fn picture_for(&self, shape: &ShapeRef<'_>) -> Option<&PictureData> {
        self.pictures.get(shape.picture_index()?)
    }

    /// Write the picture stream.
    pub fn write_pictures<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pictures.write_to(writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Anchor, NewShape};

    #[test]
    fn test_shapes_share_pictures() {
        let mut document = Document::new();
        let logo = document.add_picture(PictureType::Png, b"logo").unwrap();
        let chart = document.add_picture(PictureType::Emf, b"chart").unwrap();

        let mut drawing = Drawing::new(1);
        let anchor = Anchor::new(0.0, 0.0, 36.0, 36.0);
        let first = drawing.add_shape(None, NewShape::picture(logo).with_anchor(anchor)).unwrap();
        let second = drawing.add_shape(None, NewShape::picture(logo).with_anchor(anchor)).unwrap();
        let third = drawing.add_shape(None, NewShape::picture(chart).with_anchor(anchor)).unwrap();
        let box_id = drawing.add_shape(None, NewShape::text_box().with_anchor(anchor)).unwrap();
        let index = document.add_drawing(drawing);

        let drawing = document.drawing(index).unwrap();
        let picture = |id| document.picture_for(&drawing.shape(id).unwrap());
        assert_eq!(picture(first).unwrap().data().as_ref(), b"logo");
        assert_eq!(picture(first), picture(second));
        assert_eq!(picture(third).unwrap().kind(), PictureType::Emf);
        assert_eq!(picture(box_id), None);
    }

    #[test]
    fn test_picture_stream_round_trip() {
        let mut document = Document::new();
        document.add_picture(PictureType::Wmf, &[1, 2, 3, 4]).unwrap();
        let mut stream = Vec::new();
        document.write_pictures(&mut stream).unwrap();

        let reopened = Document::with_picture_stream(&Bytes::from(stream), &ParseOptions::default())
            .unwrap()
            .into_inner();
        let picture = reopened.pictures().get(0).unwrap();
        assert_eq!(picture.kind(), PictureType::Wmf);
        assert_eq!(picture.image_data(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_dangling_picture_index() {
        let document = Document::new();
        let mut drawing = Drawing::new(1);
        let id = drawing.add_shape(None, NewShape::picture(5)).unwrap();
        assert_eq!(document.picture_for(&drawing.shape(id).unwrap()), None);
    }
}
