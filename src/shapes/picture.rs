//! Picture frame accessors.
//!
//! A picture shape refers to the document's picture store through the
//! blip-to-display property. On disk the reference is 1-based with `0`
//! meaning "no picture"; here it is a zero-based store index.

use super::shape::{ShapeMut, ShapeRef};
use crate::common::binary::{encode_utf16le_string, parse_utf16le_string};
use crate::common::error::{Error, Result};
use crate::escher::properties::{IS_BLIP, REMOVE, prop};

/// The 1-based on-disk reference for a zero-based store index.
pub(crate) fn blip_reference(index: u32) -> Result<i32> {
    i32::try_from(index)
        .ok()
        .and_then(|index| index.checked_add(1))
        .ok_or_else(|| Error::InvalidShape(format!("picture index {index} out of range")))
}

impl ShapeRef<'_> {
    /// Zero-based index of the displayed picture in the picture store.
    pub fn picture_index(&self) -> Option<u32> {
        match self.property(prop::BLIP_TO_DISPLAY) {
            n if n > 0 => Some(n as u32 - 1),
            _ => None,
        }
    }

    /// Name of the displayed picture, usually its original file name.
    pub fn picture_name(&self) -> Option<String> {
        let table = self.properties()?;
        table
            .complex(prop::BLIP_NAME)
            .map(|data| parse_utf16le_string(data))
    }
}

impl ShapeMut<'_> {
    /// Point the shape at a picture in the store, or at none.
    pub fn set_picture_index(&mut self, index: Option<u32>) -> Result<()> {
        match index {
            Some(index) => {
                let reference = blip_reference(index)?;
                self.set_property(prop::BLIP_TO_DISPLAY | IS_BLIP, reference)
            },
            None => self.set_property(prop::BLIP_TO_DISPLAY, REMOVE),
        }
    }

    pub fn set_picture_name(&mut self, name: &str) -> Result<()> {
        self.properties_mut()?
            .set_complex(prop::BLIP_NAME, encode_utf16le_string(name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::common::error::Error;
    use crate::shapes::{Anchor, Drawing, NewShape, ShapeKind};

    #[test]
    fn test_picture_reference() {
        let mut drawing = Drawing::new(1);
        let id = drawing
            .add_shape(
                None,
                NewShape::picture(0).with_anchor(Anchor::new(0.0, 0.0, 72.0, 72.0)),
            )
            .unwrap();

        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.kind(), &ShapeKind::Picture);
        assert_eq!(shape.picture_index(), Some(0));
        assert_eq!(shape.picture_name(), None);

        let mut shape = drawing.shape_mut(id).unwrap();
        shape.set_picture_index(Some(3)).unwrap();
        shape.set_picture_name("logo.png").unwrap();
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.picture_index(), Some(3));
        assert_eq!(shape.picture_name().as_deref(), Some("logo.png"));

        drawing.shape_mut(id).unwrap().set_picture_index(None).unwrap();
        assert_eq!(drawing.shape(id).unwrap().picture_index(), None);
    }

    #[test]
    fn test_out_of_range_picture_index() {
        let mut drawing = Drawing::new(1);
        let id = drawing.add_shape(None, NewShape::picture(2)).unwrap();

        for index in [i32::MAX as u32, 0xFFFF_FFFE, u32::MAX] {
            let result = drawing.shape_mut(id).unwrap().set_picture_index(Some(index));
            assert!(matches!(result, Err(Error::InvalidShape(_))), "{index:#x}");
            assert_eq!(drawing.shape(id).unwrap().picture_index(), Some(2));
        }

        // the largest index that still has a 1-based reference
        let last = i32::MAX as u32 - 1;
        drawing.shape_mut(id).unwrap().set_picture_index(Some(last)).unwrap();
        assert_eq!(drawing.shape(id).unwrap().picture_index(), Some(last));
    }

    #[test]
    fn test_new_picture_with_out_of_range_index() {
        let mut drawing = Drawing::new(1);
        let before = drawing.to_bytes();
        let result = drawing.add_shape(None, NewShape::picture(i32::MAX as u32));
        assert!(matches!(result, Err(Error::InvalidShape(_))));
        assert!(drawing.is_empty());
        assert_eq!(drawing.to_bytes(), before);
    }
}
