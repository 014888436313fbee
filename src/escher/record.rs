//! The Escher record tree.
//!
//! A record is either a container holding an ordered list of child records or
//! an atom holding an opaque payload. Parsing keeps every record, known or
//! not, so that serializing an unmodified tree reproduces the input byte for
//! byte. Container lengths are recomputed from their children on output.
//!
//! # Performance
//!
//! - Zero-copy: atom payloads are [`Bytes`] slices of the source buffer
//! - Property tables are materialized only when a caller mutates them

use std::borrow::Cow;
use std::io::{Read, Write};

use bytes::Bytes;

use super::header::{CONTAINER_VERSION, HEADER_SIZE, RecordHeader, pack_options};
use super::properties::PropertyTable;
use super::types::{EscherRecordType, record_name};
use crate::common::error::{Diagnosed, Diagnostic, Error, Result};
use crate::config::ParseOptions;

/// Payload of a record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    /// Opaque payload, emitted verbatim
    Atom(Bytes),
    /// Child records, plus any tail bytes that could not be parsed as records
    Container {
        children: Vec<EscherRecord>,
        trailing: Bytes,
    },
    /// An atom whose payload has been materialized as a property table
    Properties(PropertyTable),
}

/// An Escher record and, for containers, its subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct EscherRecord {
    options: u16,
    record_id: u16,
    body: RecordBody,
}

struct ParseState<'a> {
    options: &'a ParseOptions,
    diagnostics: Vec<Diagnostic>,
}

impl EscherRecord {
    /// Create an empty container.
    pub fn container(record_id: impl Into<u16>, instance: u16) -> Self {
        Self {
            options: pack_options(CONTAINER_VERSION, instance),
            record_id: record_id.into(),
            body: RecordBody::Container {
                children: Vec::new(),
                trailing: Bytes::new(),
            },
        }
    }

    /// Create an atom.
    pub fn atom(
        record_id: impl Into<u16>,
        version: u8,
        instance: u16,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            options: pack_options(version, instance),
            record_id: record_id.into(),
            body: RecordBody::Atom(data.into()),
        }
    }

    /// Create an atom backed by a property table.
    pub fn with_properties(record_id: impl Into<u16>, version: u8, table: PropertyTable) -> Self {
        Self {
            options: pack_options(version, table.len() as u16),
            record_id: record_id.into(),
            body: RecordBody::Properties(table),
        }
    }

    /// Parse one record (and its subtree) at `offset`.
    ///
    /// # Returns
    ///
    /// `(record, bytes_consumed)` tuple. Recoverable problems inside the
    /// subtree are logged; use [`parse_with`](Self::parse_with) to receive them.
    pub fn parse(data: &Bytes, offset: usize) -> Result<(Self, usize)> {
        Self::parse_with(data, offset, &ParseOptions::default()).map(Diagnosed::into_inner)
    }

    /// Parse one record with explicit options, returning its diagnostics.
    pub fn parse_with(
        data: &Bytes,
        offset: usize,
        options: &ParseOptions,
    ) -> Result<Diagnosed<(Self, usize)>> {
        let mut state = ParseState {
            options,
            diagnostics: Vec::new(),
        };
        let parsed = Self::parse_at(data, offset, 0, 0, &mut state)?;
        Ok(Diagnosed::from_parts(parsed, state.diagnostics))
    }

    /// Parse a record from a plain slice (copies the input once).
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Self::parse(&Bytes::copy_from_slice(data), 0).map(|(record, _)| record)
    }

    /// `base` is the absolute offset of `data[0]`, used for error reporting.
    fn parse_at(
        data: &Bytes,
        offset: usize,
        base: usize,
        depth: usize,
        state: &mut ParseState<'_>,
    ) -> Result<(Self, usize)> {
        let available = data.len().saturating_sub(offset);
        let header = RecordHeader::read(&data[offset.min(data.len())..]).ok_or(
            Error::TruncatedRecord {
                offset: base + offset,
                declared: HEADER_SIZE,
                available,
            },
        )?;

        let length = header.length() as usize;
        let body_start = offset + HEADER_SIZE;
        if length > data.len() - body_start {
            return Err(Error::TruncatedRecord {
                offset: base + offset,
                declared: length,
                available: data.len() - body_start,
            });
        }
        let payload = data.slice(body_start..body_start + length);

        let body = if header.is_container() {
            if depth >= state.options.max_depth {
                return Err(Error::NestingTooDeep {
                    depth: state.options.max_depth,
                });
            }
            Self::parse_children(
                &payload,
                base + body_start,
                depth + 1,
                header.record_id(),
                state,
            )?
        } else {
            RecordBody::Atom(payload)
        };

        let record = Self {
            options: header.options(),
            record_id: header.record_id(),
            body,
        };
        Ok((record, HEADER_SIZE + length))
    }

    fn parse_children(
        payload: &Bytes,
        base: usize,
        depth: usize,
        parent_id: u16,
        state: &mut ParseState<'_>,
    ) -> Result<RecordBody> {
        let mut children = Vec::new();
        let mut pos = 0;
        let mut trailing = Bytes::new();

        while pos < payload.len() {
            match Self::parse_at(payload, pos, base, depth, state) {
                Ok((child, consumed)) => {
                    children.push(child);
                    pos += consumed;
                },
                Err(err @ Error::TruncatedRecord { .. }) => {
                    if state.options.strict {
                        return Err(err);
                    }
                    state.diagnostics.push(
                        Diagnostic::TruncatedChild {
                            parent_id,
                            offset: base + pos,
                            length: payload.len() - pos,
                        }
                        .emit(),
                    );
                    trailing = payload.slice(pos..);
                    break;
                },
                Err(err) => return Err(err),
            }
        }

        Ok(RecordBody::Container { children, trailing })
    }

    /// Parse consecutive top-level records until `data` is exhausted.
    pub fn parse_all(data: &Bytes, options: &ParseOptions) -> Result<Diagnosed<Vec<Self>>> {
        let mut records = Vec::new();
        let mut diagnostics = Vec::new();
        let mut pos = 0;
        while pos < data.len() {
            let ((record, consumed), found) = Self::parse_with(data, pos, options)?.into_parts();
            diagnostics.extend(found);
            records.push(record);
            pos += consumed;
        }
        Ok(Diagnosed::from_parts(records, diagnostics))
    }

    /// Read one record from a byte source.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut head = [0u8; HEADER_SIZE];
        reader.read_exact(&mut head)?;
        let header = RecordHeader::read(&head).ok_or(Error::TruncatedRecord {
            offset: 0,
            declared: HEADER_SIZE,
            available: 0,
        })?;

        let declared = header.length() as usize;
        let mut buffer = Vec::with_capacity(HEADER_SIZE + declared.min(1 << 20));
        buffer.extend_from_slice(&head);
        reader.take(declared as u64).read_to_end(&mut buffer)?;
        if buffer.len() < HEADER_SIZE + declared {
            return Err(Error::TruncatedRecord {
                offset: 0,
                declared,
                available: buffer.len() - HEADER_SIZE,
            });
        }

        Self::parse(&Bytes::from(buffer), 0).map(|(record, _)| record)
    }

    /// Raw record type tag.
    #[inline]
    pub fn record_id(&self) -> u16 {
        self.record_id
    }

    #[inline]
    pub fn record_type(&self) -> EscherRecordType {
        EscherRecordType::from(self.record_id)
    }

    /// Documented name of the record tag, if any.
    #[inline]
    pub fn name(&self) -> Option<&'static str> {
        record_name(self.record_id)
    }

    /// Options word as it will be written.
    pub fn options(&self) -> u16 {
        match &self.body {
            RecordBody::Properties(table) => pack_options(self.version(), table.len() as u16),
            _ => self.options,
        }
    }

    #[inline]
    pub fn version(&self) -> u8 {
        (self.options & 0x000F) as u8
    }

    #[inline]
    pub fn instance(&self) -> u16 {
        self.options() >> 4
    }

    pub fn set_version(&mut self, version: u8) {
        self.options = pack_options(version, self.options >> 4);
    }

    pub fn set_instance(&mut self, instance: u16) {
        self.options = pack_options(self.version(), instance);
    }

    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.body, RecordBody::Container { .. })
    }

    #[inline]
    pub fn body(&self) -> &RecordBody {
        &self.body
    }

    /// Atom payload, as it will be written. `None` for containers.
    pub fn data(&self) -> Option<Cow<'_, [u8]>> {
        match &self.body {
            RecordBody::Atom(data) => Some(Cow::Borrowed(data.as_ref())),
            RecordBody::Properties(table) => Some(Cow::Owned(table.to_bytes())),
            RecordBody::Container { .. } => None,
        }
    }

    /// Replace the payload of an atom.
    pub fn set_data(&mut self, data: impl Into<Bytes>) -> Result<()> {
        if self.is_container() {
            return Err(Error::InvalidShape(format!(
                "cannot set payload of container 0x{:04X}",
                self.record_id
            )));
        }
        self.body = RecordBody::Atom(data.into());
        Ok(())
    }

    /// Edit an atom payload in place. Returns `false` for containers.
    pub fn modify_data(&mut self, f: impl FnOnce(&mut Vec<u8>)) -> bool {
        let Some(current) = self.data() else {
            return false;
        };
        let mut buffer = current.into_owned();
        f(&mut buffer);
        if let RecordBody::Properties(table) = &self.body {
            self.options = pack_options(self.version(), table.len() as u16);
        }
        self.body = RecordBody::Atom(Bytes::from(buffer));
        true
    }

    /// The payload read as a property table. Borrowed once materialized.
    pub fn properties(&self) -> Option<Cow<'_, PropertyTable>> {
        match &self.body {
            RecordBody::Properties(table) => Some(Cow::Borrowed(table)),
            RecordBody::Atom(data) => Some(Cow::Owned(PropertyTable::parse(
                data,
                self.instance() as usize,
            ))),
            RecordBody::Container { .. } => None,
        }
    }

    /// The payload as a mutable property table, materializing it on first use.
    pub fn properties_mut(&mut self) -> Option<&mut PropertyTable> {
        if let RecordBody::Atom(data) = &self.body {
            let table = PropertyTable::parse(data, self.instance() as usize);
            self.body = RecordBody::Properties(table);
        }
        match &mut self.body {
            RecordBody::Properties(table) => Some(table),
            _ => None,
        }
    }

    /// Direct children. Empty for atoms.
    pub fn children(&self) -> &[EscherRecord] {
        match &self.body {
            RecordBody::Container { children, .. } => children,
            _ => &[],
        }
    }

    fn children_vec_mut(&mut self) -> Result<&mut Vec<EscherRecord>> {
        let record_id = self.record_id;
        match &mut self.body {
            RecordBody::Container { children, .. } => Ok(children),
            _ => Err(Error::NotAContainer { record_id }),
        }
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&EscherRecord> {
        self.children().get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut EscherRecord> {
        self.children_vec_mut().ok()?.get_mut(index)
    }

    /// First direct child with the given tag.
    pub fn child_by_id(&self, record_id: impl Into<u16>) -> Option<&EscherRecord> {
        let record_id = record_id.into();
        self.children().iter().find(|c| c.record_id == record_id)
    }

    /// First direct child with the given tag, mutably.
    pub fn child_by_id_mut(&mut self, record_id: impl Into<u16>) -> Option<&mut EscherRecord> {
        let record_id = record_id.into();
        self.children_vec_mut()
            .ok()?
            .iter_mut()
            .find(|c| c.record_id == record_id)
    }

    /// Index of the first direct child with the given tag.
    pub fn position_of(&self, record_id: impl Into<u16>) -> Option<usize> {
        let record_id = record_id.into();
        self.children().iter().position(|c| c.record_id == record_id)
    }

    /// Append a child.
    pub fn add_child(&mut self, child: EscherRecord) -> Result<()> {
        self.children_vec_mut()?.push(child);
        Ok(())
    }

    /// Insert a child at `index`, clamped to the end of the child list.
    pub fn insert_child(&mut self, index: usize, child: EscherRecord) -> Result<()> {
        let children = self.children_vec_mut()?;
        let index = index.min(children.len());
        children.insert(index, child);
        Ok(())
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<EscherRecord> {
        let children = self.children_vec_mut().ok()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Remove and return the first child with the given tag.
    pub fn remove_child_by_id(&mut self, record_id: impl Into<u16>) -> Option<EscherRecord> {
        let index = self.position_of(record_id)?;
        self.remove_child(index)
    }

    /// Replace the child at `index`, returning the previous one.
    pub fn replace_child(&mut self, index: usize, child: EscherRecord) -> Option<EscherRecord> {
        let slot = self.children_vec_mut().ok()?.get_mut(index)?;
        Some(std::mem::replace(slot, child))
    }

    /// Unparsable tail bytes kept from the source, if any.
    pub fn trailing(&self) -> &[u8] {
        match &self.body {
            RecordBody::Container { trailing, .. } => trailing,
            _ => &[],
        }
    }

    /// All descendants with the given tag, depth first.
    pub fn find_recursive(&self, record_id: impl Into<u16>) -> Vec<&EscherRecord> {
        let record_id = record_id.into();
        let mut results = Vec::new();
        self.find_recursive_impl(record_id, &mut results);
        results
    }

    fn find_recursive_impl<'a>(&'a self, record_id: u16, results: &mut Vec<&'a EscherRecord>) {
        for child in self.children() {
            if child.record_id == record_id {
                results.push(child);
            }
            child.find_recursive_impl(record_id, results);
        }
    }

    /// Length of the payload as it will be written.
    pub fn payload_size(&self) -> usize {
        match &self.body {
            RecordBody::Atom(data) => data.len(),
            RecordBody::Properties(table) => table.serialized_size(),
            RecordBody::Container { children, trailing } => {
                children.iter().map(Self::serialized_size).sum::<usize>() + trailing.len()
            },
        }
    }

    /// Total size including the header.
    #[inline]
    pub fn serialized_size(&self) -> usize {
        HEADER_SIZE + self.payload_size()
    }

    /// Write this record and its subtree.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let header = RecordHeader::new(self.options(), self.record_id, self.payload_size() as u32);
        writer.write_all(&header.to_bytes())?;
        match &self.body {
            RecordBody::Atom(data) => writer.write_all(data),
            RecordBody::Properties(table) => writer.write_all(&table.to_bytes()),
            RecordBody::Container { children, trailing } => {
                for child in children {
                    child.write_to(writer)?;
                }
                writer.write_all(trailing)
            },
        }
    }

    /// Serialize this record and its subtree.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::header::{ShapeFlags, SpAtom};
    use crate::escher::properties::prop;
    use zerocopy::IntoBytes;

    fn sp_container_bytes() -> Vec<u8> {
        vec![
            0x0F, 0x00, 0x04, 0xF0, 0x24, 0x00, 0x00, 0x00, // SpContainer, 36 bytes
            0xA2, 0x00, 0x0A, 0xF0, 0x08, 0x00, 0x00, 0x00, // Sp, instance 10
            0x01, 0x04, 0x00, 0x00, 0x00, 0x0A, 0x00, 0x00, //   spid 1025, flags 0xA00
            0x00, 0x00, 0x66, 0xF7, 0x04, 0x00, 0x00, 0x00, // unknown vendor atom 0xF766
            0xDE, 0xAD, 0xBE, 0xEF, //
            0x00, 0x00, 0x10, 0xF0, 0x00, 0x00, 0x00, 0x00, // empty ClientAnchor
        ]
    }

    #[test]
    fn test_parse_container_record() {
        let data = Bytes::from(sp_container_bytes());
        let (record, consumed) = EscherRecord::parse(&data, 0).unwrap();

        assert_eq!(consumed, data.len());
        assert_eq!(record.record_type(), EscherRecordType::SpContainer);
        assert!(record.is_container());
        assert_eq!(record.children().len(), 3);

        let sp = record.child_by_id(EscherRecordType::Sp).unwrap();
        assert_eq!(sp.version(), 2);
        assert_eq!(sp.instance(), 10);
        let atom = SpAtom::read(&sp.data().unwrap()).unwrap();
        assert_eq!(atom.spid(), 1025);
        assert_eq!(atom.flags(), ShapeFlags::HAVE_ANCHOR | ShapeFlags::HAVE_SPT);

        let vendor = record.child(1).unwrap();
        assert_eq!(vendor.record_type(), EscherRecordType::Unknown);
        assert_eq!(vendor.name(), None);
        assert_eq!(vendor.data().unwrap().as_ref(), &[0xDE, 0xAD, 0xBE, 0xEF]);
    }

    #[test]
    fn test_round_trip_is_byte_identical() {
        let bytes = sp_container_bytes();
        let record = EscherRecord::from_slice(&bytes).unwrap();
        assert_eq!(record.to_bytes(), bytes);
        assert_eq!(record.serialized_size(), bytes.len());
    }

    #[test]
    fn test_missing_child_is_none() {
        let record = EscherRecord::from_slice(&sp_container_bytes()).unwrap();
        assert!(record.child_by_id(EscherRecordType::ChildAnchor).is_none());
        assert!(record.child_by_id(EscherRecordType::Opt).is_none());
    }

    #[test]
    fn test_truncated_record_fails() {
        let mut bytes = sp_container_bytes();
        bytes.truncate(20);
        let err = EscherRecord::from_slice(&bytes).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedRecord {
                offset: 0,
                declared: 36,
                available: 12
            }
        ));

        assert!(matches!(
            EscherRecord::from_slice(&[0x0F, 0x00, 0x04]),
            Err(Error::TruncatedRecord { declared: 8, .. })
        ));
    }

    #[test]
    fn test_truncated_child_is_kept_verbatim() {
        // DgContainer holding a valid Dg atom and a child that claims 0x40 bytes
        let bytes = vec![
            0x0F, 0x00, 0x02, 0xF0, 0x1A, 0x00, 0x00, 0x00, //
            0x00, 0x00, 0x08, 0xF0, 0x08, 0x00, 0x00, 0x00, //
            0x01, 0x00, 0x00, 0x00, 0x01, 0x04, 0x00, 0x00, //
            0x0F, 0x00, 0x04, 0xF0, 0x40, 0x00, 0x00, 0x00, //
            0x01, 0x02,
        ];
        let data = Bytes::from(bytes.clone());
        let parsed = EscherRecord::parse_with(&data, 0, &ParseOptions::default()).unwrap();
        assert_eq!(parsed.diagnostics().len(), 1);
        assert!(matches!(
            parsed.diagnostics()[0],
            Diagnostic::TruncatedChild {
                parent_id: 0xF002,
                offset: 24,
                length: 10
            }
        ));

        let (record, _) = parsed.into_inner();
        assert_eq!(record.children().len(), 1);
        assert_eq!(record.trailing().len(), 10);
        assert_eq!(record.to_bytes(), bytes);

        let strict = ParseOptions::new().with_strict(true);
        assert!(EscherRecord::parse_with(&data, 0, &strict).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let mut record = EscherRecord::container(EscherRecordType::SpContainer, 0);
        for _ in 0..4 {
            let mut outer = EscherRecord::container(EscherRecordType::SpgrContainer, 0);
            outer.add_child(record).unwrap();
            record = outer;
        }
        let data = Bytes::from(record.to_bytes());
        let shallow = ParseOptions::new().with_max_depth(3);
        assert!(matches!(
            EscherRecord::parse_with(&data, 0, &shallow),
            Err(Error::NestingTooDeep { depth: 3 })
        ));
        assert!(EscherRecord::parse(&data, 0).is_ok());
    }

    #[test]
    fn test_structural_mutation() {
        let mut record = EscherRecord::from_slice(&sp_container_bytes()).unwrap();
        let anchor = EscherRecord::atom(EscherRecordType::ChildAnchor, 0, 0, vec![0u8; 16]);

        record.insert_child(1, anchor.clone()).unwrap();
        assert_eq!(record.position_of(EscherRecordType::ChildAnchor), Some(1));
        assert_eq!(record.child(2).unwrap().record_id(), 0xF766);

        let removed = record.remove_child_by_id(0xF766u16).unwrap();
        assert_eq!(removed.data().unwrap().len(), 4);
        assert_eq!(record.children().len(), 3);

        let old = record
            .replace_child(0, EscherRecord::atom(EscherRecordType::Sp, 2, 1, vec![0u8; 8]))
            .unwrap();
        assert_eq!(old.instance(), 10);
        assert!(record.remove_child(9).is_none());

        // container lengths follow their children
        let bytes = record.to_bytes();
        assert_eq!(u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]), 16 + 24 + 8);

        let mut atom = anchor;
        assert!(matches!(
            atom.add_child(EscherRecord::container(EscherRecordType::SpContainer, 0)),
            Err(Error::NotAContainer { record_id: 0xF00F })
        ));
    }

    #[test]
    fn test_properties_materialize_lazily() {
        let mut table = PropertyTable::new();
        table.set(prop::FILL_COLOR, 0x00FF_FFFF);
        let payload = table.to_bytes();
        let mut opt = EscherRecord::atom(EscherRecordType::Opt, 3, 1, payload.clone());

        assert!(matches!(opt.body(), RecordBody::Atom(_)));
        assert_eq!(
            opt.properties().unwrap().simple(prop::FILL_COLOR),
            Some(0x00FF_FFFF)
        );
        assert!(matches!(opt.body(), RecordBody::Atom(_)));

        opt.properties_mut().unwrap().set(prop::TRANSFORM_ROTATION, 1 << 16);
        assert!(matches!(opt.body(), RecordBody::Properties(_)));
        assert_eq!(opt.instance(), 2);

        let bytes = opt.to_bytes();
        assert_eq!(&bytes[0..2], &pack_options(3, 2).to_le_bytes());
        let reparsed = EscherRecord::from_slice(&bytes).unwrap();
        assert_eq!(reparsed.properties().unwrap().len(), 2);
    }

    #[test]
    fn test_modify_data() {
        let mut sp = EscherRecord::atom(
            EscherRecordType::Sp,
            2,
            1,
            SpAtom::new(1, ShapeFlags::empty()).as_bytes().to_vec(),
        );
        assert!(sp.modify_data(|data| data[0] = 7));
        assert_eq!(SpAtom::read(&sp.data().unwrap()).unwrap().spid(), 7);
    }

    #[test]
    fn test_parse_all_and_read_from() {
        let mut stream = sp_container_bytes();
        stream.extend_from_slice(&sp_container_bytes());
        let data = Bytes::from(stream.clone());
        let records = EscherRecord::parse_all(&data, &ParseOptions::default()).unwrap();
        assert!(records.is_clean());
        assert_eq!(records.value().len(), 2);

        let mut cursor = std::io::Cursor::new(stream);
        let first = EscherRecord::read_from(&mut cursor).unwrap();
        assert_eq!(first.to_bytes(), sp_container_bytes());
        let second = EscherRecord::read_from(&mut cursor).unwrap();
        assert_eq!(first, second);
        assert!(matches!(
            EscherRecord::read_from(&mut cursor),
            Err(Error::Io(_))
        ));
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn record_strategy() -> impl Strategy<Value = EscherRecord> {
            let leaf = (
                0u8..0x0F,
                0u16..0x1000,
                0xF000u16..0xF200,
                proptest::collection::vec(any::<u8>(), 0..24),
            )
                .prop_map(|(version, instance, id, data)| {
                    EscherRecord::atom(id, version, instance, data)
                });
            leaf.prop_recursive(4, 48, 6, |inner| {
                (0xF000u16..0xF006, 0u16..0x10, proptest::collection::vec(inner, 0..6)).prop_map(
                    |(id, instance, children)| {
                        let mut container = EscherRecord::container(id, instance);
                        for child in children {
                            let _ = container.add_child(child);
                        }
                        container
                    },
                )
            })
        }

        proptest! {
            #[test]
            fn prop_parse_serialize_round_trip(record in record_strategy()) {
                let bytes = record.to_bytes();
                prop_assert_eq!(bytes.len(), record.serialized_size());

                let reparsed = EscherRecord::from_slice(&bytes).unwrap();
                prop_assert_eq!(&reparsed, &record);
                prop_assert_eq!(reparsed.to_bytes(), bytes);
            }
        }
    }
}
