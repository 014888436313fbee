//! Escher record type tags.
//!
//! Based on the Microsoft Office Drawing specification ([MS-ODRAW] 2.2).

use phf::phf_map;

/// Escher record types interpreted by this crate.
///
/// Records with any other tag are kept as opaque nodes; see
/// [`EscherRecord`](super::EscherRecord).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum EscherRecordType {
    /// Unknown or unsupported record type
    Unknown = 0x0000,

    // Container records
    /// Drawing Group Container
    DggContainer = 0xF000,
    /// Blip Store Container
    BStoreContainer = 0xF001,
    /// Drawing Container
    DgContainer = 0xF002,
    /// Shape Group Container
    SpgrContainer = 0xF003,
    /// Shape Container
    SpContainer = 0xF004,
    /// Solver Container
    SolverContainer = 0xF005,

    // Atom records
    /// File Drawing Group atom
    Dgg = 0xF006,
    /// Blip Store Entry
    BSE = 0xF007,
    /// Drawing atom
    Dg = 0xF008,
    /// Shape Group atom (child coordinate space of a group)
    Spgr = 0xF009,
    /// Shape atom (shape id and flags)
    Sp = 0xF00A,
    /// Shape Options (property table)
    Opt = 0xF00B,
    /// Client Textbox
    ClientTextbox = 0xF00D,
    /// Child Anchor (shapes inside a group)
    ChildAnchor = 0xF00F,
    /// Client Anchor (top-level shapes)
    ClientAnchor = 0xF010,
    /// Client Data
    ClientData = 0xF011,

    // Blip records
    /// EMF Blip
    BlipEmf = 0xF01A,
    /// WMF Blip
    BlipWmf = 0xF01B,
    /// PICT Blip
    BlipPict = 0xF01C,
    /// JPEG Blip
    BlipJpeg = 0xF01D,
    /// PNG Blip
    BlipPng = 0xF01E,
    /// DIB Blip
    BlipDib = 0xF01F,
    /// TIFF Blip
    BlipTiff = 0xF029,

    /// Color MRU
    ColorMRU = 0xF11A,
    /// Split Menu Colors
    SplitMenuColors = 0xF11E,
    /// Secondary Opt
    SecondaryOpt = 0xF121,
    /// Tertiary (user defined) Opt
    TertiaryOpt = 0xF122,
}

/// First tag of the blip range; picture entries carry `BLIP_START + native id`.
pub const BLIP_START: u16 = 0xF018;
/// Last tag of the blip range.
pub const BLIP_END: u16 = 0xF117;

static RECORD_NAMES: phf::Map<u16, &'static str> = phf_map! {
    0xF000u16 => "DggContainer",
    0xF001u16 => "BStoreContainer",
    0xF002u16 => "DgContainer",
    0xF003u16 => "SpgrContainer",
    0xF004u16 => "SpContainer",
    0xF005u16 => "SolverContainer",
    0xF006u16 => "Dgg",
    0xF007u16 => "BSE",
    0xF008u16 => "Dg",
    0xF009u16 => "Spgr",
    0xF00Au16 => "Sp",
    0xF00Bu16 => "Opt",
    0xF00Du16 => "ClientTextbox",
    0xF00Fu16 => "ChildAnchor",
    0xF010u16 => "ClientAnchor",
    0xF011u16 => "ClientData",
    0xF012u16 => "ConnectorRule",
    0xF013u16 => "AlignRule",
    0xF014u16 => "ArcRule",
    0xF015u16 => "ClientRule",
    0xF017u16 => "CalloutRule",
    0xF01Au16 => "BlipEmf",
    0xF01Bu16 => "BlipWmf",
    0xF01Cu16 => "BlipPict",
    0xF01Du16 => "BlipJpeg",
    0xF01Eu16 => "BlipPng",
    0xF01Fu16 => "BlipDib",
    0xF029u16 => "BlipTiff",
    0xF11Au16 => "ColorMRU",
    0xF11Eu16 => "SplitMenuColors",
    0xF121u16 => "SecondaryOpt",
    0xF122u16 => "TertiaryOpt",
};

/// Human readable name of a record tag, if it is a documented Escher tag.
#[inline]
pub fn record_name(record_id: u16) -> Option<&'static str> {
    RECORD_NAMES.get(&record_id).copied()
}

static SHAPE_TYPE_NAMES: phf::Map<u16, &'static str> = phf_map! {
    0u16 => "NotPrimitive",
    1u16 => "Rectangle",
    2u16 => "RoundRectangle",
    3u16 => "Ellipse",
    4u16 => "Diamond",
    5u16 => "IsocelesTriangle",
    6u16 => "RightTriangle",
    7u16 => "Parallelogram",
    8u16 => "Trapezoid",
    9u16 => "Hexagon",
    10u16 => "Octagon",
    11u16 => "Plus",
    12u16 => "Star",
    13u16 => "Arrow",
    14u16 => "ThickArrow",
    15u16 => "HomePlate",
    16u16 => "Cube",
    17u16 => "Balloon",
    18u16 => "Seal",
    19u16 => "Arc",
    20u16 => "Line",
    21u16 => "Plaque",
    22u16 => "Can",
    23u16 => "Donut",
    32u16 => "StraightConnector1",
    33u16 => "BentConnector2",
    34u16 => "BentConnector3",
    37u16 => "CurvedConnector3",
    75u16 => "PictureFrame",
    96u16 => "SmileyFace",
    100u16 => "HostControl",
    202u16 => "TextBox",
};

/// Native name of a shape type (the Sp instance), if it is a known type.
#[inline]
pub fn shape_type_name(shape_type: u16) -> Option<&'static str> {
    SHAPE_TYPE_NAMES.get(&shape_type).copied()
}

impl From<u16> for EscherRecordType {
    fn from(value: u16) -> Self {
        match value {
            0xF000 => Self::DggContainer,
            0xF001 => Self::BStoreContainer,
            0xF002 => Self::DgContainer,
            0xF003 => Self::SpgrContainer,
            0xF004 => Self::SpContainer,
            0xF005 => Self::SolverContainer,
            0xF006 => Self::Dgg,
            0xF007 => Self::BSE,
            0xF008 => Self::Dg,
            0xF009 => Self::Spgr,
            0xF00A => Self::Sp,
            0xF00B => Self::Opt,
            0xF00D => Self::ClientTextbox,
            0xF00F => Self::ChildAnchor,
            0xF010 => Self::ClientAnchor,
            0xF011 => Self::ClientData,
            0xF01A => Self::BlipEmf,
            0xF01B => Self::BlipWmf,
            0xF01C => Self::BlipPict,
            0xF01D => Self::BlipJpeg,
            0xF01E => Self::BlipPng,
            0xF01F => Self::BlipDib,
            0xF029 => Self::BlipTiff,
            0xF11A => Self::ColorMRU,
            0xF11E => Self::SplitMenuColors,
            0xF121 => Self::SecondaryOpt,
            0xF122 => Self::TertiaryOpt,
            _ => Self::Unknown,
        }
    }
}

impl From<EscherRecordType> for u16 {
    fn from(record_type: EscherRecordType) -> Self {
        record_type as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for tag in [0xF002u16, 0xF00A, 0xF00F, 0xF010, 0xF122] {
            assert_eq!(u16::from(EscherRecordType::from(tag)), tag);
        }
        assert_eq!(EscherRecordType::from(0x1234), EscherRecordType::Unknown);
    }

    #[test]
    fn test_record_names() {
        assert_eq!(record_name(0xF00B), Some("Opt"));
        assert_eq!(record_name(0xF012), Some("ConnectorRule"));
        assert_eq!(record_name(0x0FF0), None);
        assert_eq!(shape_type_name(75), Some("PictureFrame"));
        assert_eq!(shape_type_name(202), Some("TextBox"));
        assert_eq!(shape_type_name(999), None);
    }
}
