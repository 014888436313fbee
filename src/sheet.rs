//! The sheet a drawing belongs to.
//!
//! Shapes only need two things from their sheet: the colour scheme that
//! scheme-indexed colours resolve against, and a hook to learn which shapes
//! have been attached to it. Slides, masters and notes all implement
//! [`Sheet`]; a bare [`ColorScheme`] does too, which is enough for
//! free-standing drawings.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::common::binary::read_u32_le;
use crate::shapes::ShapeId;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn with_alpha(self, a: u8) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// An RGB colour with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    #[inline]
    pub const fn rgb(self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Number of entries in a PowerPoint colour scheme.
pub const SCHEME_SIZE: usize = 8;

/// Well-known scheme slots.
pub mod scheme_index {
    pub const BACKGROUND: u8 = 0;
    pub const TEXT_AND_LINES: u8 = 1;
    pub const SHADOWS: u8 = 2;
    pub const TITLE_TEXT: u8 = 3;
    pub const FILL: u8 = 4;
    pub const ACCENT: u8 = 5;
    pub const ACCENT_AND_HYPERLINK: u8 = 6;
    pub const ACCENT_AND_FOLLOWED_HYPERLINK: u8 = 7;
}

/// The ordered palette a sheet resolves scheme-indexed colours against.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColorScheme {
    colors: SmallVec<[Rgb; SCHEME_SIZE]>,
}

impl ColorScheme {
    pub fn new(colors: impl IntoIterator<Item = Rgb>) -> Self {
        Self {
            colors: colors.into_iter().collect(),
        }
    }

    /// Decode a ColorSchemeAtom payload: eight `0x00BBGGRR` words.
    ///
    /// A short payload yields only the complete entries.
    pub fn from_atom(data: &[u8]) -> Self {
        let colors = (0..SCHEME_SIZE)
            .map_while(|i| read_u32_le(data, i * 4).ok())
            .map(|word| {
                let [r, g, b, _] = word.to_le_bytes();
                Rgb::new(r, g, b)
            })
            .collect();
        Self { colors }
    }

    /// Encode as a ColorSchemeAtom payload.
    pub fn to_atom(&self) -> Vec<u8> {
        self.colors
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, 0])
            .collect()
    }

    #[inline]
    pub fn color(&self, index: usize) -> Option<Rgb> {
        self.colors.get(index).copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rgb> {
        self.colors.iter()
    }
}

impl FromIterator<Rgb> for ColorScheme {
    fn from_iter<I: IntoIterator<Item = Rgb>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A hyperlink attached to a shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub address: String,
    pub title: Option<String>,
}

/// The sheet collaborator of a drawing.
pub trait Sheet {
    /// The colour scheme scheme-indexed colours resolve against.
    fn color_scheme(&self) -> &ColorScheme;

    /// Called once for every shape attached to this sheet.
    fn attach(&self, _shape: ShapeId) {}

    /// Hyperlink assigned to the shape with the given Sp id.
    fn hyperlink(&self, _shape_id: u32) -> Option<Hyperlink> {
        None
    }
}

impl Sheet for ColorScheme {
    fn color_scheme(&self) -> &ColorScheme {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_atom() {
        let mut atom = Vec::new();
        for i in 0..8u32 {
            atom.extend_from_slice(&(0x0003_0201 * i).to_le_bytes());
        }
        let scheme = ColorScheme::from_atom(&atom);
        assert_eq!(scheme.len(), 8);
        assert_eq!(scheme.color(3), Some(Rgb::new(3, 6, 9)));
        assert_eq!(scheme.color(8), None);
        assert_eq!(scheme.to_atom(), atom);

        assert_eq!(ColorScheme::from_atom(&atom[..10]).len(), 2);
    }

    #[test]
    fn test_sheet_defaults() {
        let scheme: ColorScheme = [Rgb::new(1, 2, 3)].into_iter().collect();
        let sheet: &dyn Sheet = &scheme;
        assert_eq!(sheet.color_scheme().color(0), Some(Rgb::new(1, 2, 3)));
        assert!(sheet.hyperlink(1025).is_none());
    }
}
