//! Shape fill.

use serde::{Deserialize, Serialize};

use super::picture::blip_reference;
use super::shape::{ShapeMut, ShapeRef};
use crate::common::error::{Diagnosed, Result};
use crate::common::unit::f64_to_fixed_point;
use crate::escher::color_ref::EscherColorRef;
use crate::escher::properties::{IS_BLIP, REMOVE, prop};
use crate::sheet::Rgba;

/// Fill type values ([MS-ODRAW] 2.4.11 MSOFILLTYPE).
pub mod fill_type {
    pub const SOLID: i32 = 0;
    pub const PATTERN: i32 = 1;
    pub const TEXTURE: i32 = 2;
    pub const PICTURE: i32 = 3;
    pub const SHADE: i32 = 4;
    pub const SHADE_CENTER: i32 = 5;
    pub const SHADE_SHAPE: i32 = 6;
    pub const SHADE_SCALE: i32 = 7;
    pub const SHADE_TITLE: i32 = 8;
    pub const BACKGROUND: i32 = 9;
}

/// `fUseFilled`: the `fFilled` bit is meaningful
const USE_FILLED: i32 = 0x0010_0000;
/// `fFilled`
const FILLED: i32 = 0x0000_0010;
/// Fill booleans written when the foreground colour is cleared.
const NO_FILL: i32 = 0x0015_0000;
/// Fill booleans written when a foreground colour is set.
const SOLID_FILL: i32 = 0x0015_0011;

/// The fill of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// One of [`fill_type`]
    pub fill_type: i32,
    pub filled: bool,
    pub foreground: Option<Rgba>,
    pub background: Option<Rgba>,
    /// Zero-based index into the picture store for texture and picture fills
    pub picture_index: Option<u32>,
}

impl ShapeRef<'_> {
    /// Whether the fill booleans mark the shape as filled. Unset means filled.
    pub fn is_filled(&self) -> bool {
        let booleans = self.property(prop::FILL_STYLE_BOOLEAN);
        booleans & USE_FILLED == 0 || booleans & FILLED != 0
    }

    /// Foreground fill colour; `None` when the shape is not filled.
    pub fn fill_color(&self) -> Diagnosed<Option<Rgba>> {
        if !self.is_filled() {
            return Diagnosed::clean(None);
        }
        self.resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, None)
    }

    /// Background fill colour, used by patterns and gradients.
    pub fn fill_back_color(&self) -> Diagnosed<Option<Rgba>> {
        if !self.is_filled() {
            return Diagnosed::clean(None);
        }
        self.resolve_color(prop::FILL_BACK_COLOR, prop::FILL_BACK_OPACITY, None)
    }

    /// The fill descriptor, with both colours resolved.
    pub fn fill(&self) -> Diagnosed<Fill> {
        let (foreground, mut diagnostics) = self.fill_color().into_parts();
        let (background, more) = self.fill_back_color().into_parts();
        diagnostics.extend(more);

        let picture_index = match self.property(prop::FILL_BLIP) {
            n if n > 0 => Some(n as u32 - 1),
            _ => None,
        };
        let fill = Fill {
            fill_type: self.property_or(prop::FILL_TYPE, fill_type::SOLID),
            filled: self.is_filled(),
            foreground,
            background,
            picture_index,
        };
        Diagnosed::from_parts(fill, diagnostics)
    }
}

impl ShapeMut<'_> {
    pub fn set_fill_type(&mut self, fill_type: i32) -> Result<()> {
        self.set_property(prop::FILL_TYPE, fill_type)
    }

    /// Set the foreground fill colour, or make the shape unfilled with `None`.
    pub fn set_fill_color(&mut self, color: Option<Rgba>) -> Result<()> {
        match color {
            None => self.set_property(prop::FILL_STYLE_BOOLEAN, NO_FILL),
            Some(color) => {
                let raw = EscherColorRef::from_rgb(color.r, color.g, color.b).raw();
                self.set_property(prop::FILL_COLOR, raw as i32)?;
                self.set_property(prop::FILL_STYLE_BOOLEAN, SOLID_FILL)?;
                self.set_opacity(prop::FILL_OPACITY, color.a)
            },
        }
    }

    /// Set the background fill colour; `None` removes it.
    pub fn set_fill_back_color(&mut self, color: Option<Rgba>) -> Result<()> {
        match color {
            None => {
                self.set_property(prop::FILL_BACK_COLOR, REMOVE)?;
                self.set_property(prop::FILL_BACK_OPACITY, REMOVE)
            },
            Some(color) => {
                let raw = EscherColorRef::from_rgb(color.r, color.g, color.b).raw();
                self.set_property(prop::FILL_BACK_COLOR, raw as i32)?;
                self.set_opacity(prop::FILL_BACK_OPACITY, color.a)
            },
        }
    }

    /// Fill with the picture at `index` in the picture store.
    pub fn set_fill_picture(&mut self, index: u32) -> Result<()> {
        let reference = blip_reference(index)?;
        self.set_property(prop::FILL_BLIP | IS_BLIP, reference)?;
        self.set_fill_type(fill_type::PICTURE)
    }

    /// Opaque colours drop the opacity property; the reader defaults to opaque.
    fn set_opacity(&mut self, property: u16, alpha: u8) -> Result<()> {
        if alpha == u8::MAX {
            self.set_property(property, REMOVE)
        } else {
            self.set_property(property, f64_to_fixed_point(f64::from(alpha) / 255.0))
        }
    }
}
