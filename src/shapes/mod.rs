//! Shapes of a drawing.
//!
//! A [`Drawing`] owns the record tree of one sheet's drawing and an arena of
//! shapes that point into it. Shapes never own records: each one remembers
//! the path to its SpContainer, and all reads and writes go through the
//! [`ShapeRef`] and [`ShapeMut`] views handed out by the drawing.
//!
//! # Layout
//!
//! ```text
//! DgContainer
//! ├── Dg
//! └── SpgrContainer            (patriarch)
//!     ├── SpContainer          (the patriarch's own records)
//!     ├── SpContainer          (top-level shape)
//!     └── SpgrContainer        (group shape)
//!         ├── SpContainer      (the group's own records: Spgr, Sp, Opt, anchor)
//!         └── SpContainer      (child shape)
//! ```
//!
//! Shapes are only ever appended, so record paths stay valid for the
//! lifetime of the drawing.

mod color;
mod fill;
mod geometry;
mod picture;
mod shape;

use std::io::{Read, Write};
use std::rc::{Rc, Weak};

use bytes::Bytes;
use once_cell::unsync::OnceCell;
use smallvec::SmallVec;

use crate::common::error::{Diagnosed, Error, Result};
use crate::common::unit::points_to_master;
use crate::config::ParseOptions;
use crate::escher::header::SpAtom;
use crate::escher::properties::{IS_BLIP, prop};
use crate::escher::record::EscherRecord;
use crate::escher::types::EscherRecordType;
use crate::escher::writer::{self, AnchorKind, ShapeBuilder, shape_type};
use crate::sheet::Sheet;

pub use fill::{Fill, fill_type};
pub use geometry::Anchor;
pub use shape::{ShapeMut, ShapeRef};

/// Path from the drawing root to a record, as child indices.
pub(crate) type RecordPath = SmallVec<[usize; 8]>;

/// First shape id handed out in a drawing without shapes.
const FIRST_SHAPE_ID: u32 = 1025;

/// Handle of a shape inside its [`Drawing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(usize);

impl ShapeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a shape is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// A preset geometric shape
    AutoShape,
    /// A text box
    TextBox,
    /// A straight line
    Line,
    /// A picture frame referencing the document's picture store
    Picture,
    /// A group and the shapes directly inside it, in drawing order
    Group { children: Vec<ShapeId> },
}

impl ShapeKind {
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group { .. })
    }

    /// Classify a non-group shape from its SpContainer.
    fn classify(container: &EscherRecord) -> Self {
        let spt = container
            .child_by_id(EscherRecordType::Sp)
            .map_or(shape_type::NOT_PRIMITIVE, EscherRecord::instance);
        let has_blip = container
            .child_by_id(EscherRecordType::Opt)
            .and_then(EscherRecord::properties)
            .is_some_and(|table| table.get(prop::BLIP_TO_DISPLAY).is_some());

        match spt {
            shape_type::PICTURE_FRAME => Self::Picture,
            shape_type::LINE => Self::Line,
            shape_type::TEXT_BOX => Self::TextBox,
            _ if has_blip => Self::Picture,
            _ => Self::AutoShape,
        }
    }
}

pub(crate) struct ShapeNode {
    /// The container holding the shape's own records
    pub(crate) path: RecordPath,
    /// For groups, the SpgrContainer holding the children
    pub(crate) group_path: Option<RecordPath>,
    pub(crate) parent: Option<ShapeId>,
    pub(crate) kind: ShapeKind,
    pub(crate) sheet: OnceCell<Weak<dyn Sheet>>,
}

impl ShapeNode {
    fn new(path: RecordPath, parent: Option<ShapeId>, kind: ShapeKind) -> Self {
        Self {
            path,
            group_path: None,
            parent,
            kind,
            sheet: OnceCell::new(),
        }
    }
}

enum Template {
    AutoShape(u16),
    TextBox,
    Line,
    Picture(u32),
    Group,
}

/// Description of a shape to add to a drawing.
pub struct NewShape {
    template: Template,
    anchor: Anchor,
}

impl NewShape {
    /// A preset shape of the given type (see [`shape_type`]).
    pub fn auto_shape(spt: u16) -> Self {
        Self::from_template(Template::AutoShape(spt))
    }

    pub fn text_box() -> Self {
        Self::from_template(Template::TextBox)
    }

    pub fn line() -> Self {
        Self::from_template(Template::Line)
    }

    /// A picture frame showing the picture at `index` in the picture store.
    pub fn picture(index: u32) -> Self {
        Self::from_template(Template::Picture(index))
    }

    /// An empty group.
    pub fn group() -> Self {
        Self::from_template(Template::Group)
    }

    fn from_template(template: Template) -> Self {
        Self {
            template,
            anchor: Anchor::default(),
        }
    }

    /// Position and size in points.
    pub fn with_anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    fn into_record(self, spid: u32, anchor_kind: AnchorKind) -> Result<EscherRecord> {
        let anchor = self.anchor;
        let corners = [
            points_to_master(anchor.x),
            points_to_master(anchor.y),
            points_to_master(anchor.x + anchor.width),
            points_to_master(anchor.y + anchor.height),
        ];

        let record = match self.template {
            Template::AutoShape(spt) => ShapeBuilder::new(spt, spid)
                .with_property(prop::FILL_COLOR, 0x0800_0004)
                .with_property(prop::FILL_BACK_COLOR, 0x0800_0000)
                .with_property(prop::FILL_STYLE_BOOLEAN, 0x0010_0010)
                .with_property(prop::LINE_COLOR, 0x0800_0001)
                .with_property(prop::SHADOW_COLOR, 0x0800_0002)
                .with_anchor(anchor_kind, corners)
                .build(),
            Template::TextBox => ShapeBuilder::new(shape_type::TEXT_BOX, spid)
                .with_property(prop::FILL_COLOR, 0x0800_0004)
                .with_property(prop::FILL_BACK_COLOR, 0x0800_0000)
                .with_anchor(anchor_kind, corners)
                .build(),
            Template::Line => ShapeBuilder::new(shape_type::LINE, spid)
                .with_property(prop::LINE_COLOR, 0x0800_0001)
                .with_anchor(anchor_kind, corners)
                .build(),
            Template::Picture(index) => ShapeBuilder::new(shape_type::PICTURE_FRAME, spid)
                .with_property(prop::PROTECTION_LOCK_AGAINST_GROUPING, 0x0080_0080)
                .with_property(prop::BLIP_TO_DISPLAY | IS_BLIP, picture::blip_reference(index)?)
                .with_anchor(anchor_kind, corners)
                .build(),
            Template::Group => ShapeBuilder::new(shape_type::NOT_PRIMITIVE, spid)
                .with_property(prop::PROTECTION_LOCK_AGAINST_GROUPING, 0x0004_0004)
                .with_anchor(anchor_kind, corners)
                .build_group(corners),
        };
        Ok(record)
    }
}

/// The record tree of one drawing together with its shapes.
pub struct Drawing {
    root: EscherRecord,
    shapes: Vec<ShapeNode>,
    top_level: Vec<ShapeId>,
    patriarch: Option<RecordPath>,
    sheet: OnceCell<Weak<dyn Sheet>>,
}

impl std::fmt::Debug for Drawing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawing")
            .field("root", &self.root.name())
            .field("shapes", &self.shapes.len())
            .field("top_level", &self.top_level)
            .finish()
    }
}

impl Drawing {
    /// An empty drawing with only the patriarch group.
    pub fn new(drawing_id: u16) -> Self {
        let patriarch_id = u32::from(drawing_id) << 10;
        Self::from_record(writer::empty_drawing(drawing_id, patriarch_id))
    }

    /// Index the shapes of an already parsed record tree.
    ///
    /// The root may be a DgContainer, a bare patriarch SpgrContainer, or a
    /// single SpContainer. Any other root yields a drawing without shapes.
    pub fn from_record(root: EscherRecord) -> Self {
        let mut shapes = Vec::new();
        let mut top_level = Vec::new();

        let patriarch: Option<RecordPath> = match root.record_type() {
            EscherRecordType::SpgrContainer => Some(RecordPath::new()),
            EscherRecordType::DgContainer => root
                .position_of(EscherRecordType::SpgrContainer)
                .map(|index| SmallVec::from_slice(&[index])),
            _ => None,
        };

        if let Some(path) = &patriarch {
            if let Some(group) = resolve(&root, path) {
                top_level = collect_group(group, path, None, &mut shapes);
            }
        } else if root.record_type() == EscherRecordType::SpContainer {
            shapes.push(ShapeNode::new(
                RecordPath::new(),
                None,
                ShapeKind::classify(&root),
            ));
            top_level.push(ShapeId(0));
        }

        tracing::debug!(shapes = shapes.len(), "indexed drawing");
        Self {
            root,
            shapes,
            top_level,
            patriarch,
            sheet: OnceCell::new(),
        }
    }

    /// Parse a drawing from bytes.
    pub fn parse(data: &Bytes, options: &ParseOptions) -> Result<Diagnosed<Self>> {
        let parsed = EscherRecord::parse_with(data, 0, options)?;
        Ok(parsed.map(|(root, _)| Self::from_record(root)))
    }

    /// Read a drawing from a byte source positioned at its first record.
    pub fn read<R: Read>(reader: &mut R, options: &ParseOptions) -> Result<Diagnosed<Self>> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Self::parse(&Bytes::from(buffer), options)
    }

    /// Write the record tree, including every unmodified record verbatim.
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.root.write_to(writer)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.root.to_bytes()
    }

    #[inline]
    pub fn root(&self) -> &EscherRecord {
        &self.root
    }

    pub fn into_record(self) -> EscherRecord {
        self.root
    }

    /// Number of shapes, nested ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes directly under the patriarch, in drawing order.
    #[inline]
    pub fn top_level(&self) -> &[ShapeId] {
        &self.top_level
    }

    pub fn shape(&self, id: ShapeId) -> Option<ShapeRef<'_>> {
        let node = self.shapes.get(id.0)?;
        let container = resolve(&self.root, &node.path)?;
        Some(ShapeRef::new(id, node, container))
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<ShapeMut<'_>> {
        let node = self.shapes.get(id.0)?;
        let container = resolve_mut(&mut self.root, &node.path)?;
        Some(ShapeMut::new(id, node, container))
    }

    /// All shapes in document order, nested ones included.
    pub fn shapes(&self) -> impl Iterator<Item = ShapeRef<'_>> {
        (0..self.shapes.len()).filter_map(|index| self.shape(ShapeId(index)))
    }

    /// Find a shape by its Sp id.
    pub fn find_by_shape_id(&self, shape_id: u32) -> Option<ShapeRef<'_>> {
        self.shapes().find(|shape| shape.shape_id() == shape_id)
    }

    /// Attach every shape to `sheet`. A drawing is attached at most once;
    /// shapes attached individually beforehand keep their sheet.
    pub fn attach_sheet(&mut self, sheet: &Rc<dyn Sheet>) -> Result<()> {
        self.sheet
            .set(Rc::downgrade(sheet))
            .map_err(|_| Error::SheetAlreadyAttached)?;
        for (index, node) in self.shapes.iter().enumerate() {
            if node.sheet.set(Rc::downgrade(sheet)).is_ok() {
                sheet.attach(ShapeId(index));
            }
        }
        Ok(())
    }

    /// The sheet this drawing is attached to, if it is still alive.
    pub fn sheet(&self) -> Option<Rc<dyn Sheet>> {
        self.sheet.get().and_then(Weak::upgrade)
    }

    /// Add a shape at the end of the patriarch (`parent` is `None`) or of a group.
    ///
    /// Shapes inside a group are anchored with a child anchor, top-level
    /// shapes with a client anchor. The new shape gets the next free Sp id
    /// and is attached to the drawing's sheet.
    pub fn add_shape(&mut self, parent: Option<ShapeId>, shape: NewShape) -> Result<ShapeId> {
        let container_path = match parent {
            None => self
                .patriarch
                .clone()
                .ok_or_else(|| Error::ComponentNotFound("patriarch group".to_string()))?,
            Some(id) => {
                let node = self
                    .shapes
                    .get(id.0)
                    .ok_or_else(|| Error::InvalidShape(format!("no shape {}", id.0)))?;
                node.group_path
                    .clone()
                    .ok_or_else(|| Error::InvalidShape(format!("shape {} is not a group", id.0)))?
            },
        };

        let anchor_kind = if parent.is_some() {
            AnchorKind::Child
        } else {
            AnchorKind::Client
        };
        let spid = self.next_shape_id()?;
        let is_group = matches!(shape.template, Template::Group);
        let record = shape.into_record(spid, anchor_kind)?;

        let container = resolve_mut(&mut self.root, &container_path)
            .ok_or_else(|| Error::ComponentNotFound("shape container".to_string()))?;
        container.add_child(record)?;
        let mut path = container_path;
        path.push(container.children().len() - 1);

        let id = ShapeId(self.shapes.len());
        let node = if is_group {
            let mut own = path.clone();
            own.push(0);
            let mut node = ShapeNode::new(own, parent, ShapeKind::Group {
                children: Vec::new(),
            });
            node.group_path = Some(path);
            node
        } else {
            let kind = resolve(&self.root, &path).map_or(ShapeKind::AutoShape, ShapeKind::classify);
            ShapeNode::new(path, parent, kind)
        };
        self.shapes.push(node);

        match parent.and_then(|p| self.shapes.get_mut(p.0)) {
            Some(ShapeNode {
                kind: ShapeKind::Group { children },
                ..
            }) => children.push(id),
            _ => self.top_level.push(id),
        }

        if let Some(sheet) = self.sheet() {
            let node = &self.shapes[id.0];
            if node.sheet.set(Rc::downgrade(&sheet)).is_ok() {
                sheet.attach(id);
            }
        }

        self.record_new_shape(spid);
        tracing::debug!(shape_id = spid, ?parent, "added shape");
        Ok(id)
    }

    /// One past the largest Sp id in the tree.
    fn next_shape_id(&self) -> Result<u32> {
        let mut sp_records = self.root.find_recursive(EscherRecordType::Sp);
        if self.root.record_type() == EscherRecordType::Sp {
            sp_records.push(&self.root);
        }
        sp_records
            .into_iter()
            .filter_map(|sp| sp.data().and_then(|data| SpAtom::read(&data)))
            .map(|atom| atom.spid())
            .max()
            .map_or(Some(FIRST_SHAPE_ID), |max| max.checked_add(1))
            .ok_or_else(|| Error::InvalidShape("no shape id left after u32::MAX".to_string()))
    }

    /// Keep the Dg atom's shape count and last id in step with the tree.
    fn record_new_shape(&mut self, spid: u32) {
        let Some(dg) = self.root.child_by_id_mut(EscherRecordType::Dg) else {
            return;
        };
        dg.modify_data(|data| {
            if data.len() >= 8 {
                let count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
                data[0..4].copy_from_slice(&count.saturating_add(1).to_le_bytes());
                data[4..8].copy_from_slice(&spid.to_le_bytes());
            }
        });
    }
}

/// Index the shapes inside a group container, skipping the group's own
/// SpContainer at position 0.
fn collect_group(
    group: &EscherRecord,
    group_path: &RecordPath,
    parent: Option<ShapeId>,
    shapes: &mut Vec<ShapeNode>,
) -> Vec<ShapeId> {
    let mut ids = Vec::new();
    for (index, child) in group.children().iter().enumerate() {
        let mut path = group_path.clone();
        path.push(index);
        match child.record_type() {
            EscherRecordType::SpContainer if index == 0 => {},
            EscherRecordType::SpContainer => {
                let id = ShapeId(shapes.len());
                shapes.push(ShapeNode::new(path, parent, ShapeKind::classify(child)));
                ids.push(id);
            },
            EscherRecordType::SpgrContainer => {
                let id = ShapeId(shapes.len());
                let own = match child.child(0) {
                    Some(first) if first.record_type() == EscherRecordType::SpContainer => {
                        let mut own = path.clone();
                        own.push(0);
                        own
                    },
                    _ => path.clone(),
                };
                let mut node = ShapeNode::new(own, parent, ShapeKind::Group {
                    children: Vec::new(),
                });
                node.group_path = Some(path.clone());
                shapes.push(node);
                ids.push(id);

                let children = collect_group(child, &path, Some(id), shapes);
                shapes[id.0].kind = ShapeKind::Group { children };
            },
            _ => {},
        }
    }
    ids
}

fn resolve<'a>(root: &'a EscherRecord, path: &[usize]) -> Option<&'a EscherRecord> {
    path.iter().try_fold(root, |record, &index| record.child(index))
}

fn resolve_mut<'a>(root: &'a mut EscherRecord, path: &[usize]) -> Option<&'a mut EscherRecord> {
    path.iter()
        .try_fold(root, |record, &index| record.child_mut(index))
}
