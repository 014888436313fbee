//! Shape views: identity, flags, rotation and raw property access.

use std::borrow::Cow;
use std::rc::{Rc, Weak};

use zerocopy::IntoBytes;

use super::{ShapeId, ShapeKind, ShapeNode};
use crate::common::binary::{encode_utf16le_string, parse_utf16le_string};
use crate::common::error::{Error, Result};
use crate::common::unit::{f64_to_fixed_point, fixed_point_to_f64};
use crate::escher::header::{ShapeFlags, SpAtom, SpgrAtom};
use crate::escher::properties::{PropertyTable, REMOVE, prop};
use crate::escher::record::EscherRecord;
use crate::escher::types::{EscherRecordType, shape_type_name};
use crate::escher::writer::{OPT_VERSION, SP_VERSION};
use crate::sheet::{Hyperlink, Sheet};

/// Read-only view of a shape.
#[derive(Clone, Copy)]
pub struct ShapeRef<'a> {
    id: ShapeId,
    node: &'a ShapeNode,
    container: &'a EscherRecord,
}

/// Mutable view of a shape.
pub struct ShapeMut<'a> {
    id: ShapeId,
    node: &'a ShapeNode,
    container: &'a mut EscherRecord,
}

impl std::fmt::Debug for ShapeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapeRef")
            .field("id", &self.id)
            .field("kind", &self.node.kind)
            .field("shape_id", &self.shape_id())
            .finish()
    }
}

impl<'a> ShapeRef<'a> {
    pub(super) fn new(id: ShapeId, node: &'a ShapeNode, container: &'a EscherRecord) -> Self {
        Self {
            id,
            node,
            container,
        }
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> &'a ShapeKind {
        &self.node.kind
    }

    /// The group this shape sits in; `None` for top-level shapes.
    #[inline]
    pub fn parent(&self) -> Option<ShapeId> {
        self.node.parent
    }

    /// Shapes directly inside this group. Empty for other kinds.
    pub fn children(&self) -> &'a [ShapeId] {
        match &self.node.kind {
            ShapeKind::Group { children } => children,
            _ => &[],
        }
    }

    /// The container holding this shape's records.
    #[inline]
    pub fn container(&self) -> &'a EscherRecord {
        self.container
    }

    /// The sheet this shape is attached to, if it is still alive.
    pub fn sheet(&self) -> Option<Rc<dyn Sheet>> {
        self.node.sheet.get().and_then(Weak::upgrade)
    }

    pub(crate) fn sp_atom(&self) -> Option<SpAtom> {
        self.container
            .child_by_id(EscherRecordType::Sp)
            .and_then(|sp| sp.data().and_then(|data| SpAtom::read(&data)))
    }

    /// Shape id from the Sp atom, `0` when the atom is missing.
    pub fn shape_id(&self) -> u32 {
        self.sp_atom().map_or(0, |atom| atom.spid())
    }

    /// Shape type from the Sp instance.
    pub fn shape_type(&self) -> Option<u16> {
        self.container
            .child_by_id(EscherRecordType::Sp)
            .map(EscherRecord::instance)
    }

    /// Native name of the shape type, e.g. `"Rectangle"`.
    pub fn shape_name(&self) -> Option<&'static str> {
        self.shape_type().and_then(shape_type_name)
    }

    /// User-visible name stored in the shape's properties.
    pub fn name(&self) -> Option<String> {
        let table = self.properties()?;
        table
            .complex(prop::GROUP_SHAPE_NAME)
            .map(|data| parse_utf16le_string(data))
    }

    /// Sp flags; empty when the Sp atom is missing.
    pub fn flags(&self) -> ShapeFlags {
        self.sp_atom().map_or(ShapeFlags::empty(), |atom| atom.flags())
    }

    #[inline]
    pub fn flip_horizontal(&self) -> bool {
        self.flags().contains(ShapeFlags::FLIP_HORIZONTAL)
    }

    #[inline]
    pub fn flip_vertical(&self) -> bool {
        self.flags().contains(ShapeFlags::FLIP_VERTICAL)
    }

    /// Rotation in degrees.
    pub fn rotation(&self) -> f64 {
        fixed_point_to_f64(self.property(prop::TRANSFORM_ROTATION))
    }

    /// The property table: the Opt record, or the tertiary Opt when there is none.
    pub fn properties(&self) -> Option<Cow<'a, PropertyTable>> {
        opt_record(self.container).and_then(EscherRecord::properties)
    }

    /// A simple property, `0` when absent.
    #[inline]
    pub fn property(&self, id: u16) -> i32 {
        self.property_or(id, 0)
    }

    /// A simple property, `default` when absent.
    pub fn property_or(&self, id: u16, default: i32) -> i32 {
        self.properties()
            .and_then(|table| table.simple(id))
            .unwrap_or(default)
    }

    /// Child coordinate space of a group, `(left, top, right, bottom)`.
    pub fn group_bounds(&self) -> Option<(i32, i32, i32, i32)> {
        let spgr = self.container.child_by_id(EscherRecordType::Spgr)?;
        let data = spgr.data()?;
        SpgrAtom::read(&data).map(|atom| atom.bounds())
    }

    /// Hyperlink assigned to this shape by its sheet.
    pub fn hyperlink(&self) -> Option<Hyperlink> {
        self.sheet()?.hyperlink(self.shape_id())
    }
}

fn opt_record(container: &EscherRecord) -> Option<&EscherRecord> {
    container
        .child_by_id(EscherRecordType::Opt)
        .or_else(|| container.child_by_id(EscherRecordType::TertiaryOpt))
}

impl<'a> ShapeMut<'a> {
    pub(super) fn new(id: ShapeId, node: &'a ShapeNode, container: &'a mut EscherRecord) -> Self {
        Self {
            id,
            node,
            container,
        }
    }

    /// Read-only view of the same shape.
    pub fn view(&self) -> ShapeRef<'_> {
        ShapeRef::new(self.id, self.node, self.container)
    }

    #[inline]
    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub(crate) fn container_mut(&mut self) -> &mut EscherRecord {
        self.container
    }

    /// Attach this shape to `sheet`. A shape is attached at most once.
    pub fn attach_sheet(&self, sheet: &Rc<dyn Sheet>) -> Result<()> {
        self.node
            .sheet
            .set(Rc::downgrade(sheet))
            .map_err(|_| Error::SheetAlreadyAttached)?;
        sheet.attach(self.id);
        Ok(())
    }

    fn modify_sp(&mut self, f: impl FnOnce(&mut EscherRecord, &mut SpAtom)) -> Result<()> {
        let sp = self
            .container
            .child_by_id_mut(EscherRecordType::Sp)
            .ok_or_else(|| Error::ComponentNotFound("Sp atom".to_string()))?;
        let mut atom = sp
            .data()
            .and_then(|data| SpAtom::read(&data))
            .ok_or_else(|| Error::CorruptedFile("Sp atom shorter than 8 bytes".to_string()))?;
        f(sp, &mut atom);
        sp.modify_data(|data| {
            if let Some(head) = data.get_mut(..8) {
                head.copy_from_slice(atom.as_bytes());
            }
        });
        Ok(())
    }

    pub fn set_shape_id(&mut self, spid: u32) -> Result<()> {
        self.modify_sp(|_, atom| atom.set_spid(spid))
    }

    /// Set the shape type. The Sp atom is rewritten as version 2.
    pub fn set_shape_type(&mut self, spt: u16) -> Result<()> {
        self.modify_sp(|sp, _| {
            sp.set_instance(spt);
            sp.set_version(SP_VERSION);
        })
    }

    pub fn set_flags(&mut self, flags: ShapeFlags) -> Result<()> {
        self.modify_sp(|_, atom| atom.set_flags(flags))
    }

    /// Set or clear the horizontal flip bit. The vertical bit is left alone.
    pub fn set_flip_horizontal(&mut self, flip: bool) -> Result<()> {
        self.modify_sp(|_, atom| {
            let mut flags = atom.flags();
            flags.set(ShapeFlags::FLIP_HORIZONTAL, flip);
            atom.set_flags(flags);
        })
    }

    /// Set or clear the vertical flip bit. The horizontal bit is left alone.
    pub fn set_flip_vertical(&mut self, flip: bool) -> Result<()> {
        self.modify_sp(|_, atom| {
            let mut flags = atom.flags();
            flags.set(ShapeFlags::FLIP_VERTICAL, flip);
            atom.set_flags(flags);
        })
    }

    /// Set the rotation in degrees. The angle is reduced modulo 360 and keeps
    /// its sign, so `-30` is stored as `-30`.
    pub fn set_rotation(&mut self, degrees: f64) -> Result<()> {
        let fixed = match f64_to_fixed_point(degrees % 360.0) {
            // a raw -1 would read as REMOVE
            REMOVE => 0,
            fixed => fixed,
        };
        self.set_property(prop::TRANSFORM_ROTATION, fixed)
    }

    fn opt_position(&self) -> Option<usize> {
        self.container
            .position_of(EscherRecordType::Opt)
            .or_else(|| self.container.position_of(EscherRecordType::TertiaryOpt))
    }

    /// The property table for editing, creating an Opt record when the shape
    /// has none.
    pub fn properties_mut(&mut self) -> Result<&mut PropertyTable> {
        let index = match self.opt_position() {
            Some(index) => index,
            None => {
                let at = self
                    .container
                    .position_of(EscherRecordType::Sp)
                    .map_or(0, |sp| sp + 1);
                let opt = EscherRecord::with_properties(
                    EscherRecordType::Opt,
                    OPT_VERSION,
                    PropertyTable::new(),
                );
                self.container.insert_child(at, opt)?;
                at
            },
        };
        self.container
            .child_mut(index)
            .and_then(EscherRecord::properties_mut)
            .ok_or_else(|| Error::InvalidShape("property table is not an atom".to_string()))
    }

    /// Set a simple property; [`REMOVE`] deletes it.
    ///
    /// Removing from a shape without a property table leaves the records
    /// untouched.
    pub fn set_property(&mut self, id: u16, value: i32) -> Result<()> {
        if value == REMOVE && self.opt_position().is_none() {
            return Ok(());
        }
        self.properties_mut()?.set(id, value);
        Ok(())
    }

    /// Set the user-visible shape name.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.properties_mut()?
            .set_complex(prop::GROUP_SHAPE_NAME, encode_utf16le_string(name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escher::writer::{ShapeBuilder, shape_type};
    use crate::shapes::Drawing;

    fn single(record: EscherRecord) -> Drawing {
        Drawing::from_record(record)
    }

    fn rectangle() -> Drawing {
        single(
            ShapeBuilder::new(shape_type::RECTANGLE, 1025)
                .with_property(prop::FILL_COLOR, 0x00FF_0000)
                .build(),
        )
    }

    #[test]
    fn test_identity() {
        let mut drawing = rectangle();
        let id = drawing.top_level()[0];
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.shape_id(), 1025);
        assert_eq!(shape.shape_type(), Some(shape_type::RECTANGLE));
        assert_eq!(shape.shape_name(), Some("Rectangle"));

        let mut shape = drawing.shape_mut(id).unwrap();
        shape.set_shape_id(2048).unwrap();
        shape.set_shape_type(shape_type::ELLIPSE).unwrap();
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.shape_id(), 2048);
        assert_eq!(shape.shape_name(), Some("Ellipse"));
        let sp = shape.container().child_by_id(EscherRecordType::Sp).unwrap();
        assert_eq!(sp.version(), 2);
    }

    #[test]
    fn test_missing_sp_atom() {
        let mut container = EscherRecord::container(EscherRecordType::SpContainer, 0);
        container
            .add_child(EscherRecord::atom(0xF766u16, 0, 0, vec![1, 2, 3]))
            .unwrap();
        let mut drawing = single(container);
        let id = drawing.top_level()[0];

        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.shape_id(), 0);
        assert_eq!(shape.flags(), ShapeFlags::empty());
        assert_eq!(shape.rotation(), 0.0);
        assert!(shape.properties().is_none());

        let mut shape = drawing.shape_mut(id).unwrap();
        assert!(matches!(
            shape.set_flip_vertical(true),
            Err(Error::ComponentNotFound(_))
        ));
        // a property write creates the Opt record
        shape.set_rotation(90.0).unwrap();
        assert_eq!(drawing.shape(id).unwrap().rotation(), 90.0);
    }

    #[test]
    fn test_flip_bits_are_independent() {
        let mut drawing = rectangle();
        let id = drawing.top_level()[0];
        let mut shape = drawing.shape_mut(id).unwrap();
        shape.set_flip_horizontal(true).unwrap();
        shape.set_flip_vertical(true).unwrap();
        shape.set_flip_horizontal(false).unwrap();

        let shape = drawing.shape(id).unwrap();
        assert!(!shape.flip_horizontal());
        assert!(shape.flip_vertical());
        assert!(shape.flags().contains(ShapeFlags::HAVE_SPT));
    }

    #[test]
    fn test_rotation_normalization() {
        let mut drawing = rectangle();
        let id = drawing.top_level()[0];
        let cases = [
            (0.0, 0.0),
            (45.0, 45.0),
            (360.0, 0.0),
            (450.0, 90.0),
            (-30.0, -30.0),
        ];
        for (theta, expected) in cases {
            drawing.shape_mut(id).unwrap().set_rotation(theta).unwrap();
            let rotation = drawing.shape(id).unwrap().rotation();
            assert!((rotation - expected).abs() < 1.0 / 65536.0, "{theta} -> {rotation}");
        }
    }

    #[test]
    fn test_negative_rotation_keeps_sign() {
        let mut drawing = rectangle();
        let id = drawing.top_level()[0];
        drawing.shape_mut(id).unwrap().set_rotation(-30.0).unwrap();
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.property(prop::TRANSFORM_ROTATION) as u32, 0xFFE2_0000);
        assert_eq!(shape.rotation(), -30.0);

        // one fixed point step below zero would collide with REMOVE
        drawing
            .shape_mut(id)
            .unwrap()
            .set_rotation(-1.0 / 65536.0)
            .unwrap();
        let shape = drawing.shape(id).unwrap();
        assert!(shape.properties().unwrap().get(prop::TRANSFORM_ROTATION).is_some());
        assert_eq!(shape.rotation(), 0.0);
    }

    #[test]
    fn test_remove_without_opt_is_noop() {
        let mut container = EscherRecord::container(EscherRecordType::SpContainer, 0);
        container
            .add_child(crate::escher::writer::sp_record(
                shape_type::RECTANGLE,
                9,
                ShapeFlags::HAVE_SPT,
            ))
            .unwrap();
        let mut drawing = single(container);
        let id = drawing.top_level()[0];
        let before = drawing.to_bytes();

        let mut shape = drawing.shape_mut(id).unwrap();
        shape.set_property(prop::FILL_COLOR, REMOVE).unwrap();
        shape.set_picture_index(None).unwrap();
        shape.set_fill_back_color(None).unwrap();
        assert_eq!(drawing.to_bytes(), before);
        assert!(drawing.shape(id).unwrap().properties().is_none());
    }

    #[test]
    fn test_property_write_into_container_opt_fails() {
        let mut container = EscherRecord::container(EscherRecordType::SpContainer, 0);
        container
            .add_child(EscherRecord::container(EscherRecordType::Opt, 0))
            .unwrap();
        let mut drawing = single(container);
        let id = drawing.top_level()[0];
        let before = drawing.to_bytes();

        let mut shape = drawing.shape_mut(id).unwrap();
        assert!(matches!(
            shape.set_property(prop::FILL_COLOR, 0x00FF_0000),
            Err(Error::InvalidShape(_))
        ));
        assert!(matches!(shape.set_name("Title 1"), Err(Error::InvalidShape(_))));
        assert!(matches!(shape.set_rotation(45.0), Err(Error::InvalidShape(_))));
        assert_eq!(drawing.to_bytes(), before);
    }

    #[test]
    fn test_properties_and_opt_fallback() {
        let mut drawing = rectangle();
        let id = drawing.top_level()[0];
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.property(prop::FILL_COLOR), 0x00FF_0000);
        assert_eq!(shape.property(prop::LINE_COLOR), 0);
        assert_eq!(shape.property_or(prop::LINE_COLOR, 7), 7);

        let mut shape = drawing.shape_mut(id).unwrap();
        shape.set_property(prop::FILL_COLOR, REMOVE).unwrap();
        shape.set_name("Title 1").unwrap();
        let shape = drawing.shape(id).unwrap();
        assert_eq!(shape.property_or(prop::FILL_COLOR, -5), -5);
        assert_eq!(shape.name().as_deref(), Some("Title 1"));

        // tertiary Opt is used only when there is no primary Opt
        let mut table = PropertyTable::new();
        table.set(prop::LINE_WIDTH, 12700);
        let mut container = EscherRecord::container(EscherRecordType::SpContainer, 0);
        container
            .add_child(EscherRecord::with_properties(EscherRecordType::TertiaryOpt, 3, table))
            .unwrap();
        let drawing = single(container);
        let shape = drawing.shape(drawing.top_level()[0]).unwrap();
        assert_eq!(shape.property(prop::LINE_WIDTH), 12700);
    }

    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_rotation_wraps(theta in -10_000.0f64..10_000.0) {
                let mut drawing = rectangle();
                let id = drawing.top_level()[0];
                drawing.shape_mut(id).unwrap().set_rotation(theta).unwrap();
                let rotation = drawing.shape(id).unwrap().rotation();
                prop_assert!((rotation - theta % 360.0).abs() <= 2.0 / 65536.0);
                prop_assert!((-360.0..=360.0).contains(&rotation));
                prop_assert!(rotation == 0.0 || rotation.signum() == theta.signum());
            }
        }
    }
}
