//! Builders for fresh drawing records.
//!
//! Shapes created from scratch get the same record layout PowerPoint writes:
//! an SpContainer holding the Sp atom, an Opt table and one anchor. Groups
//! wrap their own SpContainer (with the Spgr atom first) in an SpgrContainer.

use zerocopy::IntoBytes;

use super::header::{ChildAnchorAtom, ClientAnchorAtom, ShapeFlags, SpAtom, SpgrAtom};
use super::properties::PropertyTable;
use super::record::EscherRecord;
use super::types::EscherRecordType;

/// Shape type constants carried in the Sp instance ([MS-ODRAW] 2.4.6 MSOSPT).
pub mod shape_type {
    pub const NOT_PRIMITIVE: u16 = 0;
    pub const RECTANGLE: u16 = 1;
    pub const ELLIPSE: u16 = 3;
    pub const LINE: u16 = 20;
    pub const PICTURE_FRAME: u16 = 75;
    pub const TEXT_BOX: u16 = 202;
}

/// Version nibble of the Sp atom.
pub const SP_VERSION: u8 = 2;
/// Version nibble of the Opt atom.
pub const OPT_VERSION: u8 = 3;
/// Version nibble of the Spgr atom.
pub const SPGR_VERSION: u8 = 1;

/// Sp atom record.
pub fn sp_record(shape_type: u16, spid: u32, flags: ShapeFlags) -> EscherRecord {
    EscherRecord::atom(
        EscherRecordType::Sp,
        SP_VERSION,
        shape_type,
        SpAtom::new(spid, flags).as_bytes().to_vec(),
    )
}

/// Child anchor record from absolute corners.
pub fn child_anchor_record(x1: i32, y1: i32, x2: i32, y2: i32) -> EscherRecord {
    EscherRecord::atom(
        EscherRecordType::ChildAnchor,
        0,
        0,
        ChildAnchorAtom::new(x1, y1, x2, y2).as_bytes().to_vec(),
    )
}

/// Short-form client anchor record from absolute corners.
///
/// Coordinates outside the 16-bit range wrap, matching what PowerPoint reads back.
pub fn client_anchor_record(x1: i32, y1: i32, x2: i32, y2: i32) -> EscherRecord {
    EscherRecord::atom(
        EscherRecordType::ClientAnchor,
        0,
        0,
        ClientAnchorAtom::new(x1 as i16, y1 as i16, x2 as i16, y2 as i16)
            .as_bytes()
            .to_vec(),
    )
}

/// Spgr atom record holding a group's child coordinate space.
pub fn spgr_record(left: i32, top: i32, right: i32, bottom: i32) -> EscherRecord {
    EscherRecord::atom(
        EscherRecordType::Spgr,
        SPGR_VERSION,
        0,
        SpgrAtom::new(left, top, right, bottom).as_bytes().to_vec(),
    )
}

/// Dg atom record. The instance carries the drawing id.
pub fn dg_record(drawing_id: u16, shape_count: u32, last_spid: u32) -> EscherRecord {
    let mut data = Vec::with_capacity(8);
    data.extend_from_slice(&shape_count.to_le_bytes());
    data.extend_from_slice(&last_spid.to_le_bytes());
    EscherRecord::atom(EscherRecordType::Dg, 0, drawing_id, data)
}

/// Where a new shape is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorKind {
    /// Child anchor, for shapes inside a group
    Child,
    /// Client anchor, for top-level shapes
    Client,
}

/// Helper to build shape containers.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    shape_type: u16,
    shape_id: u32,
    flags: ShapeFlags,
    properties: PropertyTable,
    anchor: Option<(AnchorKind, [i32; 4])>,
}

impl ShapeBuilder {
    pub fn new(shape_type: u16, shape_id: u32) -> Self {
        Self {
            shape_type,
            shape_id,
            flags: ShapeFlags::HAVE_SPT,
            properties: PropertyTable::new(),
            anchor: None,
        }
    }

    pub fn with_flags(mut self, flags: ShapeFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn with_property(mut self, id: u16, value: i32) -> Self {
        self.properties.set(id, value);
        self
    }

    pub fn with_complex_property(mut self, id: u16, data: Vec<u8>) -> Self {
        self.properties.set_complex(id, data);
        self
    }

    /// Anchor the shape at the given absolute corners, in master units.
    pub fn with_anchor(mut self, kind: AnchorKind, corners: [i32; 4]) -> Self {
        self.anchor = Some((kind, corners));
        self.flags |= ShapeFlags::HAVE_ANCHOR;
        if kind == AnchorKind::Child {
            self.flags |= ShapeFlags::CHILD;
        }
        self
    }

    fn anchor_record(&self) -> Option<EscherRecord> {
        self.anchor.map(|(kind, [x1, y1, x2, y2])| match kind {
            AnchorKind::Child => child_anchor_record(x1, y1, x2, y2),
            AnchorKind::Client => client_anchor_record(x1, y1, x2, y2),
        })
    }

    /// Build the SpContainer: Sp, Opt, then the anchor.
    pub fn build(self) -> EscherRecord {
        let mut container = EscherRecord::container(EscherRecordType::SpContainer, 0);
        let anchor = self.anchor_record();
        let children = [
            Some(sp_record(self.shape_type, self.shape_id, self.flags)),
            Some(EscherRecord::with_properties(
                EscherRecordType::Opt,
                OPT_VERSION,
                self.properties,
            )),
            anchor,
        ];
        for child in children.into_iter().flatten() {
            // a fresh container always accepts children
            let _ = container.add_child(child);
        }
        container
    }

    /// Build an SpgrContainer whose first SpContainer describes the group
    /// itself. `bounds` becomes the group's child coordinate space.
    pub fn build_group(self, bounds: [i32; 4]) -> EscherRecord {
        let [left, top, right, bottom] = bounds;
        let mut own = self.with_flags(ShapeFlags::GROUP).build();
        let _ = own.insert_child(0, spgr_record(left, top, right, bottom));

        let mut group = EscherRecord::container(EscherRecordType::SpgrContainer, 0);
        let _ = group.add_child(own);
        group
    }
}

/// An empty drawing: a DgContainer holding the Dg atom and the patriarch group.
pub fn empty_drawing(drawing_id: u16, patriarch_id: u32) -> EscherRecord {
    let mut own = EscherRecord::container(EscherRecordType::SpContainer, 0);
    let _ = own.add_child(spgr_record(0, 0, 0, 0));
    let _ = own.add_child(sp_record(
        shape_type::NOT_PRIMITIVE,
        patriarch_id,
        ShapeFlags::GROUP | ShapeFlags::PATRIARCH,
    ));

    let mut patriarch = EscherRecord::container(EscherRecordType::SpgrContainer, 0);
    let _ = patriarch.add_child(own);

    let mut drawing = EscherRecord::container(EscherRecordType::DgContainer, 0);
    let _ = drawing.add_child(dg_record(drawing_id, 1, patriarch_id));
    let _ = drawing.add_child(patriarch);
    drawing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::properties::prop;

    #[test]
    fn test_shape_builder_layout() {
        let shape = ShapeBuilder::new(shape_type::RECTANGLE, 1026)
            .with_property(prop::FILL_COLOR, 0x0800_0004)
            .with_anchor(AnchorKind::Client, [10, 20, 110, 70])
            .build();

        let ids: Vec<u16> = shape.children().iter().map(EscherRecord::record_id).collect();
        assert_eq!(ids, vec![0xF00A, 0xF00B, 0xF010]);

        let sp = shape.child(0).unwrap();
        assert_eq!(sp.version(), SP_VERSION);
        assert_eq!(sp.instance(), shape_type::RECTANGLE);
        let atom = SpAtom::read(&sp.data().unwrap()).unwrap();
        assert_eq!(atom.spid(), 1026);
        assert_eq!(atom.flags(), ShapeFlags::HAVE_SPT | ShapeFlags::HAVE_ANCHOR);

        let anchor = shape.child(2).unwrap();
        assert_eq!(anchor.data().unwrap().len(), 8);
        assert_eq!(
            ClientAnchorAtom::read(&anchor.data().unwrap()).unwrap().corners(),
            (10, 20, 110, 70)
        );

        let bytes = shape.to_bytes();
        assert_eq!(EscherRecord::from_slice(&bytes).unwrap().to_bytes(), bytes);
    }

    #[test]
    fn test_group_layout() {
        let group = ShapeBuilder::new(shape_type::NOT_PRIMITIVE, 1030)
            .with_anchor(AnchorKind::Client, [0, 0, 100, 100])
            .build_group([0, 0, 100, 100]);

        assert_eq!(group.record_type(), EscherRecordType::SpgrContainer);
        let own = group.child(0).unwrap();
        assert_eq!(own.child(0).unwrap().record_type(), EscherRecordType::Spgr);
        let sp = SpAtom::read(&own.child(1).unwrap().data().unwrap()).unwrap();
        assert!(sp.flags().contains(ShapeFlags::GROUP));
    }

    #[test]
    fn test_empty_drawing() {
        let drawing = empty_drawing(1, 1024);
        assert_eq!(drawing.record_type(), EscherRecordType::DgContainer);
        assert_eq!(drawing.child(0).unwrap().instance(), 1);
        let patriarch = drawing.child_by_id(EscherRecordType::SpgrContainer).unwrap();
        assert_eq!(patriarch.children().len(), 1);
    }
}
