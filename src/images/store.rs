// The document-wide picture stream.
//
// Layout of one entry:
//
//   u16 signature | u16 type tag | u32 length | length bytes of data
//
// Entries are referenced from shapes by their zero-based position and from
// BLIP store entries by their byte offset, so the stream is kept as an
// ordered list of raw chunks. Entries this codec cannot interpret (unknown
// type tags, a truncated tail, anything after the terminating tag) stay in
// the chunk list verbatim, which keeps every offset stable across a write.

use std::io::{Read, Write};

use bytes::Bytes;
use serde::Serialize;

use super::picture::{PictureType, with_synthesized_header};
use crate::common::binary::{read_u16_le, read_u32_le};
use crate::common::error::{Diagnosed, Diagnostic, Error, Result};
use crate::config::ParseOptions;
use crate::escher::types::{BLIP_END, BLIP_START, EscherRecordType};

/// Size of the signature, type and length fields in front of each entry.
pub const ENTRY_HEADER_SIZE: usize = 8;

/// One picture of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureData {
    kind: PictureType,
    #[serde(skip)]
    data: Bytes,
    offset: u64,
}

impl PictureData {
    #[inline]
    pub fn kind(&self) -> PictureType {
        self.kind
    }

    /// The stored bytes, including any synthesized PICT or WMF header.
    #[inline]
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// The stored bytes without the header this codec synthesizes for
    /// PICT and WMF pictures.
    pub fn image_data(&self) -> &[u8] {
        let skip = self.kind.header_size().min(self.data.len());
        &self.data[skip..]
    }

    /// Byte offset of the entry within the picture stream.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered, append-only store of the document's pictures.
#[derive(Debug, Clone, Default)]
pub struct PictureStore {
    /// Every byte of the stream, in order
    chunks: Vec<Bytes>,
    pictures: Vec<PictureData>,
    size: u64,
}

impl PictureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a picture stream.
    ///
    /// The scan ends at the first type tag outside `0xF007 | 0xF018..=0xF117`
    /// or at an entry that runs past the end of the stream. Entries whose tag
    /// maps to no picture kind are skipped by their declared length and
    /// reported, or rejected in strict mode.
    pub fn parse(data: &Bytes, options: &ParseOptions) -> Result<Diagnosed<Self>> {
        let mut store = Self::new();
        let mut diagnostics = Vec::new();
        let mut pos = 0usize;

        while data.len() - pos >= ENTRY_HEADER_SIZE {
            let type_tag = read_u16_le(data, pos + 2)?;
            let length = read_u32_le(data, pos + 4)?;
            let offset = pos as u64;

            let is_picture_tag = type_tag == u16::from(EscherRecordType::BSE)
                || (BLIP_START..=BLIP_END).contains(&type_tag);
            if !is_picture_tag {
                tracing::debug!(offset, type_tag, "picture stream ends at foreign type tag");
                break;
            }
            if length > i32::MAX as u32 {
                return Err(Error::CorruptedFile(format!(
                    "picture entry at offset {offset} declares a negative length"
                )));
            }

            let start = pos + ENTRY_HEADER_SIZE;
            let available = data.len() - start;
            if length as usize > available {
                diagnostics.push(
                    Diagnostic::TruncatedPictureStream {
                        offset,
                        declared: length,
                        available: available as u64,
                    }
                    .emit(),
                );
                break;
            }
            let end = start + length as usize;

            match PictureType::from_type_tag(type_tag) {
                Some(kind) => store.pictures.push(PictureData {
                    kind,
                    data: data.slice(start..end),
                    offset,
                }),
                None if options.strict => {
                    return Err(Error::UnknownPictureType { offset, type_tag });
                },
                None => diagnostics.push(
                    Diagnostic::UnknownPictureType {
                        offset,
                        type_tag,
                        length,
                    }
                    .emit(),
                ),
            }
            store.chunks.push(data.slice(pos..end));
            pos = end;
        }

        if pos < data.len() {
            store.chunks.push(data.slice(pos..));
        }
        store.size = data.len() as u64;
        Ok(Diagnosed::from_parts(store, diagnostics))
    }

    /// Read and scan a whole picture stream.
    pub fn read<R: Read>(reader: &mut R, options: &ParseOptions) -> Result<Diagnosed<Self>> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::parse(&Bytes::from(buffer), options)
    }

    /// Append a picture and return its zero-based index.
    ///
    /// PICT and WMF data are stored behind a synthesized header; everything
    /// else is stored as given.
    pub fn append(&mut self, kind: PictureType, data: &[u8]) -> Result<u32> {
        let data = with_synthesized_header(kind, data);
        let length = u32::try_from(data.len())
            .ok()
            .filter(|&length| length <= i32::MAX as u32)
            .ok_or_else(|| {
                Error::CorruptedFile(format!("picture of {} bytes is too large", data.len()))
            })?;
        let index = u32::try_from(self.pictures.len())
            .map_err(|_| Error::CorruptedFile("picture store is full".into()))?;

        let mut entry = Vec::with_capacity(ENTRY_HEADER_SIZE + data.len());
        entry.extend_from_slice(&kind.signature().to_le_bytes());
        entry.extend_from_slice(&kind.type_tag().to_le_bytes());
        entry.extend_from_slice(&length.to_le_bytes());
        entry.extend_from_slice(&data);
        let entry = Bytes::from(entry);

        let offset = self.size;
        self.size += entry.len() as u64;
        self.pictures.push(PictureData {
            kind,
            data: entry.slice(ENTRY_HEADER_SIZE..),
            offset,
        });
        self.chunks.push(entry);
        Ok(index)
    }

    /// The picture at a zero-based index.
    #[inline]
    pub fn get(&self, index: u32) -> Option<&PictureData> {
        self.pictures.get(index as usize)
    }

    /// All pictures in stream order.
    #[inline]
    pub fn all(&self) -> &[PictureData] {
        &self.pictures
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PictureData> {
        self.pictures.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pictures.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }

    /// Size of the serialized stream in bytes.
    #[inline]
    pub fn stream_size(&self) -> u64 {
        self.size
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for chunk in &self.chunks {
            writer.write_all(chunk)?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.chunks.concat()
    }
}

impl<'a> IntoIterator for &'a PictureStore {
    type Item = &'a PictureData;
    type IntoIter = std::slice::Iter<'a, PictureData>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
