//! Shape anchors.
//!
//! The bounding box lives in one of two records. Shapes inside a group carry
//! a child anchor with 32-bit corners; top-level shapes carry the short client
//! anchor with 16-bit corners. The CHILD bit of the Sp flags says which one is
//! in use. Both store the absolute corners `(x, y, x + width, y + height)` in
//! master units.

use serde::{Deserialize, Serialize};

use super::shape::{ShapeMut, ShapeRef};
use crate::common::error::{Diagnosed, Diagnostic};
use crate::common::unit::{master_to_points, points_to_master};
use crate::escher::header::{ChildAnchorAtom, ClientAnchorAtom, ShapeFlags};
use crate::escher::record::EscherRecord;
use crate::escher::types::EscherRecordType;
use crate::escher::writer::{child_anchor_record, client_anchor_record};

/// A shape's bounding box in points. `-1` in any field means "unset".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Anchor {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Convert from master-unit corners. Each derived value passes `-1` through.
    fn from_corners((x1, y1, x2, y2): (i32, i32, i32, i32)) -> Self {
        Self {
            x: master_to_points(x1),
            y: master_to_points(y1),
            width: master_to_points(x2.wrapping_sub(x1)),
            height: master_to_points(y2.wrapping_sub(y1)),
        }
    }

    /// Absolute corners in master units.
    fn to_corners(self) -> [i32; 4] {
        [
            points_to_master(self.x),
            points_to_master(self.y),
            points_to_master(self.x + self.width),
            points_to_master(self.y + self.height),
        ]
    }
}

fn child_corners(container: &EscherRecord) -> Option<(i32, i32, i32, i32)> {
    let record = container.child_by_id(EscherRecordType::ChildAnchor)?;
    ChildAnchorAtom::read(&record.data()?).map(|atom| atom.corners())
}

fn client_corners(container: &EscherRecord) -> Option<(i32, i32, i32, i32)> {
    let record = container.child_by_id(EscherRecordType::ClientAnchor)?;
    ClientAnchorAtom::read(&record.data()?).map(|atom| atom.corners())
}

impl ShapeRef<'_> {
    /// The bounding box in points.
    ///
    /// A shape flagged as a child but without a child anchor falls back to its
    /// client anchor and reports [`Diagnostic::InconsistentAnchorFlag`]. A
    /// shape without any usable anchor has none.
    pub fn anchor(&self) -> Diagnosed<Option<Anchor>> {
        let container = self.container();
        if !self.flags().contains(ShapeFlags::CHILD) {
            return Diagnosed::clean(client_corners(container).map(Anchor::from_corners));
        }
        match child_corners(container) {
            Some(corners) => Diagnosed::clean(Some(Anchor::from_corners(corners))),
            None => Diagnosed::with(
                client_corners(container).map(Anchor::from_corners),
                Diagnostic::InconsistentAnchorFlag {
                    shape_id: self.shape_id(),
                }
                .emit(),
            ),
        }
    }
}

impl ShapeMut<'_> {
    /// Move and resize the shape.
    ///
    /// The anchor in use (per the CHILD flag) receives the absolute corners.
    /// A missing anchor record is created; a child-flagged shape without a
    /// child anchor is written through its client anchor, as it is read.
    pub fn set_anchor(&mut self, anchor: Anchor) -> Diagnosed<()> {
        let [x1, y1, x2, y2] = anchor.to_corners();
        let view = self.view();
        let is_child = view.flags().contains(ShapeFlags::CHILD);
        let has_child_anchor = view
            .container()
            .child_by_id(EscherRecordType::ChildAnchor)
            .is_some();
        let shape_id = view.shape_id();

        let mut result = Diagnosed::clean(());
        let record = if is_child && has_child_anchor {
            child_anchor_record(x1, y1, x2, y2)
        } else {
            if is_child {
                result.push(Diagnostic::InconsistentAnchorFlag { shape_id }.emit());
            }
            client_anchor_record(x1, y1, x2, y2)
        };
        self.put_anchor(record);
        result
    }

    /// Move the top-left corner, keeping width and height.
    pub fn move_to(&mut self, x: f64, y: f64) -> Diagnosed<()> {
        let (current, diagnostics) = self.view().anchor().into_parts();
        let current = current.unwrap_or_default();
        let mut result = Diagnosed::from_parts((), diagnostics);
        let (_, moved) = self
            .set_anchor(Anchor::new(x, y, current.width, current.height))
            .into_parts();
        result.extend(moved);
        result
    }

    fn put_anchor(&mut self, record: EscherRecord) {
        let record_id = record.record_id();
        let container = self.container_mut();
        if let Some(index) = container.position_of(record_id) {
            container.replace_child(index, record);
            return;
        }

        // New anchors go after the Sp atom and any property tables
        let at = container
            .children()
            .iter()
            .rposition(|child| {
                matches!(
                    child.record_type(),
                    EscherRecordType::Sp
                        | EscherRecordType::Opt
                        | EscherRecordType::SecondaryOpt
                        | EscherRecordType::TertiaryOpt
                )
            })
            .map_or(0, |index| index + 1);
        if container.insert_child(at, record).is_ok() {
            let flags = self.view().flags();
            // Shapes without an Sp atom have no flags to update
            let _ = self.set_flags(flags | ShapeFlags::HAVE_ANCHOR);
        }
    }
}
