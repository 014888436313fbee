//! Recoverable diagnostics.
//!
//! The drawing layer is written by many producers and old files are often
//! slightly inconsistent. Such inconsistencies never abort an operation; the
//! operation completes with a best-effort value and reports what it had to
//! work around.

use thiserror::Error;

/// A recoverable inconsistency encountered while reading or writing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The Sp atom carries the child flag but the shape has no child anchor.
    #[error("shape {shape_id}: child flag is set but no child anchor exists, using client anchor")]
    InconsistentAnchorFlag { shape_id: u32 },

    /// A picture entry whose type tag maps to no known picture kind was skipped.
    #[error("skipped picture entry at offset {offset} with invalid type 0x{type_tag:04X} ({length} bytes)")]
    UnknownPictureType {
        offset: u64,
        type_tag: u16,
        length: u32,
    },

    /// A colour reference could not be indirected; the raw RGB triple was used.
    #[error("colour reference 0x{raw:08X} left unresolved: {reason}")]
    UnresolvedColorReference { raw: u32, reason: &'static str },

    /// Bytes inside a container could not be parsed as records and were kept verbatim.
    #[error("container 0x{parent_id:04X}: {length} unparsable bytes at offset {offset} kept verbatim")]
    TruncatedChild {
        parent_id: u16,
        offset: usize,
        length: usize,
    },

    /// The picture stream ended in the middle of an entry.
    #[error("picture stream ended early: entry at offset {offset} declares {declared} bytes, {available} available")]
    TruncatedPictureStream {
        offset: u64,
        declared: u32,
        available: u64,
    },
}

impl Diagnostic {
    /// Log this diagnostic through `tracing` and hand it back.
    pub(crate) fn emit(self) -> Self {
        tracing::warn!(diagnostic = ?self, "{}", self);
        self
    }
}

/// A value together with the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosed<T> {
    value: T,
    diagnostics: Vec<Diagnostic>,
}

impl<T> Diagnosed<T> {
    /// A value produced without any inconsistency.
    #[inline]
    pub fn clean(value: T) -> Self {
        Self {
            value,
            diagnostics: Vec::new(),
        }
    }

    /// A value produced by working around `diagnostic`.
    #[inline]
    pub fn with(value: T, diagnostic: Diagnostic) -> Self {
        Self {
            value,
            diagnostics: vec![diagnostic],
        }
    }

    pub(crate) fn from_parts(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        Self { value, diagnostics }
    }

    pub(crate) fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True when no workaround was needed.
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Split into the value and its diagnostics.
    pub fn into_parts(self) -> (T, Vec<Diagnostic>) {
        (self.value, self.diagnostics)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Diagnosed<U> {
        Diagnosed {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnosed_accumulates() {
        let mut result = Diagnosed::clean(3);
        assert!(result.is_clean());
        result.push(Diagnostic::InconsistentAnchorFlag { shape_id: 7 });
        let doubled = result.map(|v| v * 2);
        assert_eq!(*doubled.value(), 6);
        assert_eq!(doubled.diagnostics().len(), 1);
    }

    #[test]
    fn test_diagnostic_messages() {
        let d = Diagnostic::UnknownPictureType {
            offset: 16,
            type_tag: 0xF018,
            length: 4,
        };
        assert_eq!(
            d.to_string(),
            "skipped picture entry at offset 16 with invalid type 0xF018 (4 bytes)"
        );
    }
}
