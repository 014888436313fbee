//! Colour resolution for shape properties.

use super::shape::ShapeRef;
use crate::common::error::{Diagnosed, Diagnostic};
use crate::common::unit::{FIXED_POINT_ONE, fixed_point_to_f64};
use crate::escher::color_ref::{ColorRefKind, EscherColorRef};
use crate::escher::properties::prop;
use crate::sheet::{Rgb, Rgba};

/// Top byte of a legacy colour holding a plain sRGB value.
const LEGACY_SRGB: u8 = 0xFE;
/// Top byte of a legacy colour that is undefined.
const LEGACY_UNDEFINED: u8 = 0xFF;

impl ShapeRef<'_> {
    /// Resolve a colour property into RGBA.
    ///
    /// `fallback` is the raw colour reference used when the property is
    /// absent; with no fallback an absent property has no colour. Only
    /// scheme-indexed references are indirected. Palette and system
    /// references keep their raw triple and report
    /// [`Diagnostic::UnresolvedColorReference`].
    pub fn resolve_color(
        &self,
        color_property: u16,
        opacity_property: u16,
        fallback: Option<u32>,
    ) -> Diagnosed<Option<Rgba>> {
        let raw = match self.properties().and_then(|table| table.simple(color_property)) {
            Some(value) => value as u32,
            None => match fallback {
                Some(raw) => raw,
                None => return Diagnosed::clean(None),
            },
        };

        let color = EscherColorRef::new(raw);
        let mut diagnostics = Vec::new();
        let rgb = match color.kind() {
            ColorRefKind::Rgb => Rgb::from(color.rgb()),
            ColorRefKind::SchemeIndex(index) => self.scheme_color(index).unwrap_or_else(|reason| {
                diagnostics.push(unresolved(raw, reason));
                Rgb::from(color.rgb())
            }),
            kind => {
                diagnostics.push(unresolved(raw, unresolved_reason(kind)));
                Rgb::from(color.rgb())
            },
        };

        let alpha = alpha_to_byte(self.alpha(opacity_property));
        Diagnosed::from_parts(Some(rgb.with_alpha(alpha)), diagnostics)
    }

    /// Opacity in `[0, 1]` from a 16.16 fixed point property; fully opaque when absent.
    pub fn alpha(&self, opacity_property: u16) -> f64 {
        fixed_point_to_f64(self.property_or(opacity_property, FIXED_POINT_ONE))
    }

    /// Line colour, if the shape has one.
    pub fn line_color(&self) -> Diagnosed<Option<Rgba>> {
        self.resolve_color(prop::LINE_COLOR, prop::LINE_OPACITY, None)
    }

    /// Decode a legacy colour value whose top byte is `0xFE` for sRGB,
    /// `0xFF` for undefined and a scheme index otherwise.
    pub fn to_rgb(&self, value: u32) -> Diagnosed<Rgb> {
        let [r, g, b, a] = value.to_le_bytes();
        let raw = Rgb::new(r, g, b);
        match a {
            LEGACY_SRGB | LEGACY_UNDEFINED => Diagnosed::clean(raw),
            index => match self.scheme_color(index) {
                Ok(rgb) => Diagnosed::clean(rgb),
                Err(reason) => Diagnosed::with(raw, unresolved(value, reason)),
            },
        }
    }

    fn scheme_color(&self, index: u8) -> Result<Rgb, &'static str> {
        let sheet = self.sheet().ok_or("no sheet attached")?;
        sheet
            .color_scheme()
            .color(index as usize)
            .ok_or("scheme index out of range")
    }
}

fn unresolved(raw: u32, reason: &'static str) -> Diagnostic {
    Diagnostic::UnresolvedColorReference { raw, reason }.emit()
}

fn unresolved_reason(kind: ColorRefKind) -> &'static str {
    match kind {
        ColorRefKind::PaletteIndex(_) => "palette index",
        ColorRefKind::PaletteRgb => "palette RGB",
        ColorRefKind::SystemRgb => "system RGB",
        ColorRefKind::SystemIndex(_) => "system colour index",
        ColorRefKind::Rgb | ColorRefKind::SchemeIndex(_) => "unsupported reference",
    }
}

/// Alpha byte from an opacity, truncated toward zero.
fn alpha_to_byte(alpha: f64) -> u8 {
    (alpha * 255.0).clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::writer::{ShapeBuilder, shape_type};
    use crate::shapes::{Drawing, ShapeId};
    use crate::sheet::{ColorScheme, Sheet};
    use std::rc::Rc;

    fn scheme() -> Rc<dyn Sheet> {
        Rc::new(ColorScheme::new((0..8u8).map(|i| Rgb::new(i, i * 2, i * 3))))
    }

    fn shape_with(properties: &[(u16, i32)]) -> (Drawing, ShapeId) {
        let mut builder = ShapeBuilder::new(shape_type::RECTANGLE, 1);
        for &(id, value) in properties {
            builder = builder.with_property(id, value);
        }
        let drawing = Drawing::from_record(builder.build());
        let id = drawing.top_level()[0];
        (drawing, id)
    }

    #[test]
    fn test_scheme_index_resolution() {
        let (mut drawing, id) = shape_with(&[
            (prop::FILL_COLOR, 0x0800_0003),
            (prop::FILL_OPACITY, 0x8000),
        ]);
        let sheet = scheme();
        drawing.attach_sheet(&sheet).unwrap();

        let shape = drawing.shape(id).unwrap();
        let color = shape.resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, None);
        assert!(color.is_clean());
        assert_eq!(
            color.into_inner(),
            Some(Rgba {
                r: 3,
                g: 6,
                b: 9,
                a: 127
            })
        );
    }

    #[test]
    fn test_plain_rgb_and_defaults() {
        let (drawing, id) = shape_with(&[(prop::LINE_COLOR, 0x0033_2211)]);
        let shape = drawing.shape(id).unwrap();

        let line = shape.line_color().into_inner().unwrap();
        assert_eq!((line.r, line.g, line.b, line.a), (0x11, 0x22, 0x33, 255));

        // absent without fallback
        let fill = shape.resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, None);
        assert_eq!(fill.into_inner(), None);

        // absent with fallback
        let fill = shape.resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, Some(0x00FF_FFFF));
        assert_eq!(fill.into_inner(), Some(Rgb::new(255, 255, 255).with_alpha(255)));
    }

    #[test]
    fn test_unresolved_references_keep_raw_triple() {
        let (drawing, id) = shape_with(&[
            (prop::FILL_COLOR, 0x0800_0003),
            (prop::LINE_COLOR, 0x0400_0102),
        ]);
        let shape = drawing.shape(id).unwrap();

        let fill = shape.resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, None);
        assert!(matches!(
            fill.diagnostics(),
            [Diagnostic::UnresolvedColorReference {
                reason: "no sheet attached",
                ..
            }]
        ));
        assert_eq!(fill.into_inner(), Some(Rgb::new(3, 0, 0).with_alpha(255)));

        let line = shape.line_color();
        assert!(matches!(
            line.diagnostics(),
            [Diagnostic::UnresolvedColorReference {
                raw: 0x0400_0102,
                reason: "system RGB"
            }]
        ));
        assert_eq!(line.into_inner(), Some(Rgb::new(2, 1, 0).with_alpha(255)));
    }

    #[test]
    fn test_scheme_index_out_of_range() {
        let (mut drawing, id) = shape_with(&[(prop::FILL_COLOR, 0x0800_0009)]);
        let sheet = scheme();
        drawing.attach_sheet(&sheet).unwrap();
        let fill = drawing
            .shape(id)
            .unwrap()
            .resolve_color(prop::FILL_COLOR, prop::FILL_OPACITY, None);
        assert!(matches!(
            fill.diagnostics(),
            [Diagnostic::UnresolvedColorReference {
                reason: "scheme index out of range",
                ..
            }]
        ));
        assert_eq!(fill.into_inner(), Some(Rgb::new(9, 0, 0).with_alpha(255)));
    }

    #[test]
    fn test_alpha_truncates() {
        assert_eq!(alpha_to_byte(1.0), 255);
        assert_eq!(alpha_to_byte(0.5), 127);
        assert_eq!(alpha_to_byte(0.999), 254);
        assert_eq!(alpha_to_byte(2.0), 255);
        assert_eq!(alpha_to_byte(-0.5), 0);
    }

    #[test]
    fn test_legacy_to_rgb() {
        let (mut drawing, id) = shape_with(&[]);
        let sheet = scheme();
        drawing.attach_sheet(&sheet).unwrap();
        let shape = drawing.shape(id).unwrap();

        assert_eq!(shape.to_rgb(0xFE11_2233).into_inner(), Rgb::new(0x33, 0x22, 0x11));
        assert_eq!(shape.to_rgb(0xFF00_0001).into_inner(), Rgb::new(1, 0, 0));
        assert_eq!(shape.to_rgb(0x0500_0000).into_inner(), Rgb::new(5, 10, 15));
        assert_eq!(shape.to_rgb(0x2000_0000).diagnostics().len(), 1);
    }
}
