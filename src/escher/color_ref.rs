//! Colour references stored in colour properties ([MS-ODRAW] 2.2.2 OfficeArtCOLORREF).
//!
//! The low three bytes hold red, green and blue. The top byte is a set of
//! mutually exclusive flags that say how the triple should be interpreted.

use bitflags::bitflags;

bitflags! {
    /// Interpretation flags in the top byte of a colour reference.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorRefFlags: u8 {
        /// Red holds an index into the current palette
        const PALETTE_INDEX = 0x01;
        /// The triple is matched against the palette
        const PALETTE_RGB = 0x02;
        /// The triple is a system colour value
        const SYSTEM_RGB = 0x04;
        /// Red holds an index into the sheet's colour scheme
        const SCHEME_INDEX = 0x08;
        /// Red and green hold a system colour index
        const SYSTEM_INDEX = 0x10;
    }
}

/// How a colour reference asks to be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorRefKind {
    /// Plain RGB
    Rgb,
    /// Index into the sheet's colour scheme
    SchemeIndex(u8),
    /// Index into the current palette
    PaletteIndex(u16),
    /// RGB matched against the palette
    PaletteRgb,
    /// System RGB value
    SystemRgb,
    /// System colour index
    SystemIndex(u16),
}

/// A decoded 32-bit colour reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscherColorRef {
    raw: u32,
}

impl EscherColorRef {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self { raw }
    }

    /// Build a plain RGB reference.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    /// Build a scheme-index reference.
    #[inline]
    pub const fn from_scheme_index(index: u8) -> Self {
        Self::new(((ColorRefFlags::SCHEME_INDEX.bits() as u32) << 24) | index as u32)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// Flag bits of the top byte. Undefined bits are preserved.
    #[inline]
    pub fn flags(&self) -> ColorRefFlags {
        ColorRefFlags::from_bits_retain((self.raw >> 24) as u8)
    }

    /// The RGB triple stored in the low three bytes.
    #[inline]
    pub const fn rgb(&self) -> [u8; 3] {
        [
            (self.raw & 0xFF) as u8,
            ((self.raw >> 8) & 0xFF) as u8,
            ((self.raw >> 16) & 0xFF) as u8,
        ]
    }

    /// Scheme index carried in the red byte.
    #[inline]
    pub const fn scheme_index(&self) -> u8 {
        (self.raw & 0xFF) as u8
    }

    /// Classify the reference. When several flags are set the first in
    /// scheme, palette-index, palette-RGB, system-RGB, system-index order wins.
    pub fn kind(&self) -> ColorRefKind {
        let flags = self.flags();
        let low_word = (self.raw & 0xFFFF) as u16;
        if flags.contains(ColorRefFlags::SCHEME_INDEX) {
            ColorRefKind::SchemeIndex(self.scheme_index())
        } else if flags.contains(ColorRefFlags::PALETTE_INDEX) {
            ColorRefKind::PaletteIndex(low_word)
        } else if flags.contains(ColorRefFlags::PALETTE_RGB) {
            ColorRefKind::PaletteRgb
        } else if flags.contains(ColorRefFlags::SYSTEM_RGB) {
            ColorRefKind::SystemRgb
        } else if flags.contains(ColorRefFlags::SYSTEM_INDEX) {
            ColorRefKind::SystemIndex(low_word)
        } else {
            ColorRefKind::Rgb
        }
    }
}

impl From<i32> for EscherColorRef {
    fn from(value: i32) -> Self {
        Self::new(value as u32)
    }
}
