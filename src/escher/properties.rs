//! Shape property tables (Opt records).
//!
//! An Opt record payload is a list of 6-byte property headers followed by the
//! variable-length data of its complex properties, in header order
//! ([MS-ODRAW] 2.2.9).
//!
//! Each header is:
//! - 2 bytes: property number (low 14 bits), blip flag (bit 14), complex flag (bit 15)
//! - 4 bytes: the value, or the length of the complex data for complex properties
//!
//! The table is kept in canonical form: ascending by property number with at
//! most one entry per number. Tables read from a file are left exactly as
//! found until the first mutation.

use bytes::Bytes;

use crate::common::binary::{read_i32_le, read_u16_le};

/// Bit 14: the value is a blip id
pub const IS_BLIP: u16 = 0x4000;
/// Bit 15: the value is the length of complex data
pub const IS_COMPLEX: u16 = 0x8000;
/// Lower 14 bits: property number
pub const PROPERTY_NUMBER_MASK: u16 = 0x3FFF;

/// Passing this value to [`PropertyTable::set`] removes the property.
pub const REMOVE: i32 = -1;

/// Property numbers used by the shape layer ([MS-ODRAW] 2.3).
pub mod prop {
    /// Rotation angle, 16.16 fixed point degrees
    pub const TRANSFORM_ROTATION: u16 = 0x0004;
    /// Lock against grouping and other protection booleans
    pub const PROTECTION_LOCK_AGAINST_GROUPING: u16 = 0x007F;
    /// Blip (picture) to display, 1-based
    pub const BLIP_TO_DISPLAY: u16 = 0x0104;
    /// Picture name, UTF-16LE complex property
    pub const BLIP_NAME: u16 = 0x0105;
    /// Fill type
    pub const FILL_TYPE: u16 = 0x0180;
    /// Fill colour reference
    pub const FILL_COLOR: u16 = 0x0181;
    /// Fill opacity, 16.16 fixed point
    pub const FILL_OPACITY: u16 = 0x0182;
    /// Fill back colour reference
    pub const FILL_BACK_COLOR: u16 = 0x0183;
    /// Fill back opacity, 16.16 fixed point
    pub const FILL_BACK_OPACITY: u16 = 0x0184;
    /// Fill blip (texture/picture fill), 1-based
    pub const FILL_BLIP: u16 = 0x0186;
    /// Fill style booleans
    pub const FILL_STYLE_BOOLEAN: u16 = 0x01BF;
    /// Line colour reference
    pub const LINE_COLOR: u16 = 0x01C0;
    /// Line opacity, 16.16 fixed point
    pub const LINE_OPACITY: u16 = 0x01C1;
    /// Line width in EMUs
    pub const LINE_WIDTH: u16 = 0x01CB;
    /// Shadow colour reference
    pub const SHADOW_COLOR: u16 = 0x0201;
    /// Shape name, UTF-16LE complex property
    pub const GROUP_SHAPE_NAME: u16 = 0x0380;
}

/// Value of a single property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Simple property: 32-bit value stored in the header
    Simple(i32),
    /// Complex property: data stored after the headers
    Complex(Bytes),
}

/// A property entry: the raw id word (number plus flags) and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscherProperty {
    id: u16,
    value: PropertyValue,
}

impl EscherProperty {
    /// Create a simple property. `id` may carry the blip flag.
    pub fn simple(id: u16, value: i32) -> Self {
        Self {
            id: id & !IS_COMPLEX,
            value: PropertyValue::Simple(value),
        }
    }

    /// Create a complex property.
    pub fn complex(id: u16, data: impl Into<Bytes>) -> Self {
        Self {
            id: id | IS_COMPLEX,
            value: PropertyValue::Complex(data.into()),
        }
    }

    /// Raw id word including flags.
    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Property number without flags.
    #[inline]
    pub fn number(&self) -> u16 {
        self.id & PROPERTY_NUMBER_MASK
    }

    #[inline]
    pub fn is_blip_id(&self) -> bool {
        self.id & IS_BLIP != 0
    }

    #[inline]
    pub fn is_complex(&self) -> bool {
        matches!(self.value, PropertyValue::Complex(_))
    }

    #[inline]
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// The simple value, if this is a simple property.
    #[inline]
    pub fn simple_value(&self) -> Option<i32> {
        match self.value {
            PropertyValue::Simple(v) => Some(v),
            PropertyValue::Complex(_) => None,
        }
    }

    /// The complex data, if this is a complex property.
    #[inline]
    pub fn complex_data(&self) -> Option<&Bytes> {
        match &self.value {
            PropertyValue::Complex(data) => Some(data),
            PropertyValue::Simple(_) => None,
        }
    }

    fn header_value(&self) -> i32 {
        match &self.value {
            PropertyValue::Simple(v) => *v,
            PropertyValue::Complex(data) => data.len() as i32,
        }
    }
}

/// An ordered set of shape properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyTable {
    entries: Vec<EscherProperty>,
}

impl PropertyTable {
    /// Create an empty table.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `count` properties from an Opt payload.
    ///
    /// # Algorithm
    ///
    /// **Pass 1** reads the fixed 6-byte headers. **Pass 2** hands out the
    /// complex data that follows them, in header order. A header run that
    /// does not fit stops the first pass; complex data running past the end
    /// of the payload is cut short rather than dropped.
    pub fn parse(data: &Bytes, count: usize) -> Self {
        let mut headers = Vec::with_capacity(count.min(data.len() / 6));
        for i in 0..count {
            let offset = i * 6;
            let (Ok(id), Ok(value)) = (read_u16_le(data, offset), read_i32_le(data, offset + 2))
            else {
                break;
            };
            headers.push((id, value));
        }

        let mut complex_offset = headers.len() * 6;
        let entries = headers
            .into_iter()
            .map(|(id, value)| {
                if id & IS_COMPLEX == 0 {
                    return EscherProperty {
                        id,
                        value: PropertyValue::Simple(value),
                    };
                }
                let start = complex_offset.min(data.len());
                let end = complex_offset
                    .saturating_add(value.max(0) as usize)
                    .min(data.len());
                complex_offset = complex_offset.saturating_add(value.max(0) as usize);
                EscherProperty {
                    id,
                    value: PropertyValue::Complex(data.slice(start..end)),
                }
            })
            .collect();

        Self { entries }
    }

    /// Look up a property by number. Flags in `number` are ignored.
    pub fn get(&self, number: u16) -> Option<&EscherProperty> {
        let number = number & PROPERTY_NUMBER_MASK;
        self.entries.iter().find(|p| p.number() == number)
    }

    /// The simple value of a property.
    #[inline]
    pub fn simple(&self, number: u16) -> Option<i32> {
        self.get(number).and_then(EscherProperty::simple_value)
    }

    /// The simple value of a property, or `default` when absent.
    #[inline]
    pub fn get_or(&self, number: u16, default: i32) -> i32 {
        self.simple(number).unwrap_or(default)
    }

    /// The data of a complex property.
    #[inline]
    pub fn complex(&self, number: u16) -> Option<&Bytes> {
        self.get(number).and_then(EscherProperty::complex_data)
    }

    /// Set a simple property, or remove it when `value` is [`REMOVE`].
    ///
    /// `id` may carry the blip flag; entries are matched by number.
    pub fn set(&mut self, id: u16, value: i32) {
        if value == REMOVE {
            self.remove(id);
            return;
        }
        self.upsert(EscherProperty::simple(id, value));
    }

    /// Set a complex property.
    pub fn set_complex(&mut self, id: u16, data: impl Into<Bytes>) {
        self.upsert(EscherProperty::complex(id, data));
    }

    /// Remove a property by number, returning it if present.
    pub fn remove(&mut self, number: u16) -> Option<EscherProperty> {
        let number = number & PROPERTY_NUMBER_MASK;
        let mut removed = None;
        self.entries.retain(|p| {
            if p.number() == number {
                removed.get_or_insert_with(|| p.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    fn upsert(&mut self, property: EscherProperty) {
        let number = property.number();
        self.entries.retain(|p| p.number() != number);
        self.entries.push(property);
        self.entries.sort_by_key(EscherProperty::number);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EscherProperty> {
        self.entries.iter()
    }

    /// Size of the serialized payload.
    pub fn serialized_size(&self) -> usize {
        self.entries
            .iter()
            .map(|p| 6 + p.complex_data().map_or(0, Bytes::len))
            .sum()
    }

    /// Serialize to an Opt payload: all headers, then all complex data.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        for property in &self.entries {
            out.extend_from_slice(&property.id.to_le_bytes());
            out.extend_from_slice(&property.header_value().to_le_bytes());
        }
        for data in self.entries.iter().filter_map(EscherProperty::complex_data) {
            out.extend_from_slice(data);
        }
        out
    }
}

impl FromIterator<EscherProperty> for PropertyTable {
    fn from_iter<I: IntoIterator<Item = EscherProperty>>(iter: I) -> Self {
        let mut table = Self::new();
        for property in iter {
            table.upsert(property);
        }
        table
    }
}
