//! Fixed layouts of the Escher record header and of the atoms the shape layer
//! reads and writes in place.
//!
//! # Format
//!
//! Every record starts with an 8-byte header:
//! - Bytes 0-1: Version (low 4 bits) and Instance (high 12 bits)
//! - Bytes 2-3: Record Type
//! - Bytes 4-7: Record Length (payload only)

use bitflags::bitflags;
use zerocopy::byteorder::{I16, I32, LE, U16, U32};
use zerocopy::{FromBytes, IntoBytes};
use zerocopy_derive::*;

/// Size of the record header in bytes.
pub const HEADER_SIZE: usize = 8;

/// Version nibble marking a container record.
pub const CONTAINER_VERSION: u8 = 0x0F;

bitflags! {
    /// Shape flags stored in the Sp atom ([MS-ODRAW] 2.2.40)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u32 {
        /// Shape is a group
        const GROUP = 0x0001;
        /// Shape is a child of a group
        const CHILD = 0x0002;
        /// Shape is the topmost group (patriarch)
        const PATRIARCH = 0x0004;
        /// Shape has been deleted
        const DELETED = 0x0008;
        /// Shape is an OLE object
        const OLE_SHAPE = 0x0010;
        /// Shape has a valid master
        const HAVE_MASTER = 0x0020;
        /// Shape is flipped horizontally
        const FLIP_HORIZONTAL = 0x0040;
        /// Shape is flipped vertically
        const FLIP_VERTICAL = 0x0080;
        /// Shape is a connector
        const CONNECTOR = 0x0100;
        /// Shape has an anchor
        const HAVE_ANCHOR = 0x0200;
        /// Shape is a background shape
        const BACKGROUND = 0x0400;
        /// Shape has a shape type property
        const HAVE_SPT = 0x0800;
    }
}

/// Escher record header (8 bytes)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct RecordHeader {
    options: U16<LE>,
    record_id: U16<LE>,
    length: U32<LE>,
}

impl RecordHeader {
    pub fn new(options: u16, record_id: u16, length: u32) -> Self {
        Self {
            options: U16::new(options),
            record_id: U16::new(record_id),
            length: U32::new(length),
        }
    }

    /// Read a header from the start of `data`.
    #[inline]
    pub fn read(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(header, _)| header)
    }

    #[inline]
    pub fn options(&self) -> u16 {
        self.options.get()
    }

    #[inline]
    pub fn record_id(&self) -> u16 {
        self.record_id.get()
    }

    #[inline]
    pub fn length(&self) -> u32 {
        self.length.get()
    }

    #[inline]
    pub fn version(&self) -> u8 {
        (self.options() & 0x000F) as u8
    }

    #[inline]
    pub fn instance(&self) -> u16 {
        self.options() >> 4
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        self.version() == CONTAINER_VERSION
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(self.as_bytes());
        out
    }
}

/// Pack version and instance into the options word.
#[inline]
pub const fn pack_options(version: u8, instance: u16) -> u16 {
    (version as u16 & 0x0F) | ((instance & 0x0FFF) << 4)
}

/// Shape atom payload: shape id and flags.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct SpAtom {
    spid: U32<LE>,
    flags: U32<LE>,
}

impl SpAtom {
    pub fn new(spid: u32, flags: ShapeFlags) -> Self {
        Self {
            spid: U32::new(spid),
            flags: U32::new(flags.bits()),
        }
    }

    #[inline]
    pub fn read(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(atom, _)| atom)
    }

    #[inline]
    pub fn spid(&self) -> u32 {
        self.spid.get()
    }

    #[inline]
    pub fn set_spid(&mut self, spid: u32) {
        self.spid = U32::new(spid);
    }

    /// Flags word; unknown bits are preserved.
    #[inline]
    pub fn flags(&self) -> ShapeFlags {
        ShapeFlags::from_bits_retain(self.flags.get())
    }

    #[inline]
    pub fn set_flags(&mut self, flags: ShapeFlags) {
        self.flags = U32::new(flags.bits());
    }
}

/// Child anchor payload: four 32-bit master-unit coordinates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct ChildAnchorAtom {
    dx1: I32<LE>,
    dy1: I32<LE>,
    dx2: I32<LE>,
    dy2: I32<LE>,
}

impl ChildAnchorAtom {
    pub fn new(dx1: i32, dy1: i32, dx2: i32, dy2: i32) -> Self {
        Self {
            dx1: I32::new(dx1),
            dy1: I32::new(dy1),
            dx2: I32::new(dx2),
            dy2: I32::new(dy2),
        }
    }

    #[inline]
    pub fn read(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(atom, _)| atom)
    }

    /// `(dx1, dy1, dx2, dy2)`
    #[inline]
    pub fn corners(&self) -> (i32, i32, i32, i32) {
        (self.dx1.get(), self.dy1.get(), self.dx2.get(), self.dy2.get())
    }
}

/// Client anchor payload in its short, 8-byte form.
///
/// The fields carry the bounding box as `x`, `y`, `x + width`, `y + height`,
/// but keep the names of the spreadsheet anchor they were borrowed from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct ClientAnchorAtom {
    flag: I16<LE>,
    col1: I16<LE>,
    dx1: I16<LE>,
    row1: I16<LE>,
}

impl ClientAnchorAtom {
    pub fn new(flag: i16, col1: i16, dx1: i16, row1: i16) -> Self {
        Self {
            flag: I16::new(flag),
            col1: I16::new(col1),
            dx1: I16::new(dx1),
            row1: I16::new(row1),
        }
    }

    #[inline]
    pub fn read(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(atom, _)| atom)
    }

    /// `(flag, col1, dx1, row1)`, i.e. `(x1, y1, x2, y2)`
    #[inline]
    pub fn corners(&self) -> (i32, i32, i32, i32) {
        (
            self.flag.get() as i32,
            self.col1.get() as i32,
            self.dx1.get() as i32,
            self.row1.get() as i32,
        )
    }
}

/// Group coordinate space carried by the Spgr atom.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, Immutable, KnownLayout, Unaligned,
)]
#[repr(C)]
pub struct SpgrAtom {
    left: I32<LE>,
    top: I32<LE>,
    right: I32<LE>,
    bottom: I32<LE>,
}

impl SpgrAtom {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left: I32::new(left),
            top: I32::new(top),
            right: I32::new(right),
            bottom: I32::new(bottom),
        }
    }

    #[inline]
    pub fn read(data: &[u8]) -> Option<Self> {
        Self::read_from_prefix(data).ok().map(|(atom, _)| atom)
    }

    /// `(left, top, right, bottom)`
    #[inline]
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        (
            self.left.get(),
            self.top.get(),
            self.right.get(),
            self.bottom.get(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = RecordHeader::new(pack_options(0x0F, 0), 0xF004, 8);
        assert_eq!(header.to_bytes(), [0x0F, 0x00, 0x04, 0xF0, 0x08, 0x00, 0x00, 0x00]);

        let parsed = RecordHeader::read(&[0xB3, 0x00, 0x0B, 0xF0, 0x12, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(parsed.version(), 3);
        assert_eq!(parsed.instance(), 0x0B);
        assert_eq!(parsed.record_id(), 0xF00B);
        assert_eq!(parsed.length(), 0x12);
        assert!(!parsed.is_container());
        assert!(RecordHeader::read(&[0x0F, 0x00]).is_none());
    }

    #[test]
    fn test_client_anchor_is_short_form() {
        let atom = ClientAnchorAtom::new(10, 20, -1, 40);
        assert_eq!(atom.as_bytes(), &[10, 0, 20, 0, 0xFF, 0xFF, 40, 0]);
        assert_eq!(atom.corners(), (10, 20, -1, 40));
    }

    #[test]
    fn test_sp_atom_preserves_unknown_flag_bits() {
        let mut bytes = SpAtom::new(1025, ShapeFlags::HAVE_ANCHOR).as_bytes().to_vec();
        bytes[7] = 0x80;
        let atom = SpAtom::read(&bytes).unwrap();
        assert_eq!(atom.spid(), 1025);
        assert_eq!(atom.flags().bits(), 0x8000_0200);
    }
}
