// Picture kinds of the document-level picture stream and the headers this
// codec synthesizes for the two legacy metafile kinds.
//
// Each picture stream entry is tagged with `0xF018 + native id`, the same
// numbering the BLIP record types use ([MS-ODRAW] 2.2.23).

use serde::{Deserialize, Serialize};

use crate::escher::types::BLIP_START;

/// Size of the synthesized PICT header.
pub const PICT_HEADER_SIZE: usize = 512;
/// Size of the synthesized Aldus placeable WMF header.
pub const WMF_HEADER_SIZE: usize = 22;

/// Aldus placeable metafile key
const WMF_PLACEABLE_KEY: u32 = 0x9AC6_CDD7;
/// Logical units per inch written into the placeable header (twips)
const WMF_UNITS_PER_INCH: u16 = 1440;

/// Kind of an embedded picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PictureType {
    /// Enhanced Metafile (EMF)
    Emf,
    /// Windows Metafile (WMF)
    Wmf,
    /// Macintosh PICT
    Pict,
    /// JPEG
    Jpeg,
    /// PNG
    Png,
    /// Device Independent Bitmap (DIB)
    Dib,
    /// TIFF
    Tiff,
}

impl PictureType {
    pub const ALL: [Self; 7] = [
        Self::Emf,
        Self::Wmf,
        Self::Pict,
        Self::Jpeg,
        Self::Png,
        Self::Dib,
        Self::Tiff,
    ];

    /// The native picture id ([MS-ODRAW] 2.4.1 MSOBLIPTYPE).
    pub const fn native_id(self) -> u16 {
        match self {
            Self::Emf => 2,
            Self::Wmf => 3,
            Self::Pict => 4,
            Self::Jpeg => 5,
            Self::Png => 6,
            Self::Dib => 7,
            Self::Tiff => 0x11,
        }
    }

    pub fn from_native_id(id: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.native_id() == id)
    }

    /// The entry type tag, `0xF018 + native id`.
    pub const fn type_tag(self) -> u16 {
        BLIP_START + self.native_id()
    }

    /// Map an entry type tag to a kind. Tags below the BLIP base, and the
    /// base itself (native id 0), map to none.
    pub fn from_type_tag(tag: u16) -> Option<Self> {
        tag.checked_sub(BLIP_START).and_then(Self::from_native_id)
    }

    /// The signature written in front of each entry of this kind.
    pub const fn signature(self) -> u16 {
        match self {
            Self::Emf => 0x3D40,
            Self::Wmf => 0x2160,
            Self::Pict => 0x5420,
            Self::Jpeg => 0x46A0,
            Self::Png => 0x6E00,
            Self::Dib => 0x7A80,
            Self::Tiff => 0x6E40,
        }
    }

    /// Check if this is a metafile format (EMF, WMF, PICT)
    pub const fn is_metafile(self) -> bool {
        matches!(self, Self::Emf | Self::Wmf | Self::Pict)
    }

    /// Length of the header synthesized in front of appended data.
    pub const fn header_size(self) -> usize {
        match self {
            Self::Pict => PICT_HEADER_SIZE,
            Self::Wmf => WMF_HEADER_SIZE,
            _ => 0,
        }
    }

    /// Get the file extension for this picture type
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Emf => "emf",
            Self::Wmf => "wmf",
            Self::Pict => "pict",
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Dib => "dib",
            Self::Tiff => "tiff",
        }
    }

    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Emf => "image/x-emf",
            Self::Wmf => "image/x-wmf",
            Self::Pict => "image/x-pict",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Dib => "image/bmp",
            Self::Tiff => "image/tiff",
        }
    }
}

/// Prefix `data` with the header this codec stores for `kind`.
///
/// PICT data gets 512 zero bytes in place of the platform-specific file
/// header. WMF data gets an Aldus placeable header with empty bounds.
/// Other kinds are returned unchanged.
pub fn with_synthesized_header(kind: PictureType, data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(kind.header_size() + data.len());
    match kind {
        PictureType::Pict => result.resize(PICT_HEADER_SIZE, 0),
        PictureType::Wmf => result.extend_from_slice(&wmf_placeable_header()),
        _ => {},
    }
    result.extend_from_slice(data);
    result
}

/// Build the 22-byte placeable header.
fn wmf_placeable_header() -> [u8; WMF_HEADER_SIZE] {
    let mut header = [0u8; WMF_HEADER_SIZE];
    header[0..4].copy_from_slice(&WMF_PLACEABLE_KEY.to_le_bytes());
    // handle (4..6) and bounds (6..14) stay zero
    header[14..16].copy_from_slice(&WMF_UNITS_PER_INCH.to_le_bytes());
    // reserved (16..20) stays zero

    // Checksum is the XOR of the ten preceding words
    let checksum = header[..20]
        .chunks_exact(2)
        .fold(0u16, |acc, word| acc ^ u16::from_le_bytes([word[0], word[1]]));
    header[20..22].copy_from_slice(&checksum.to_le_bytes());
    header
}
