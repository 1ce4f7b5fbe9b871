use std::collections::BTreeSet;

use crate::scene_graph::object3d::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Object,
    Vertex,
    /// Reserved. Switching to it only clears the element selection.
    Edge,
    /// Reserved. Switching to it only clears the element selection.
    Face,
}

impl EditMode {
    pub const ALL: [EditMode; 4] = [
        EditMode::Object,
        EditMode::Vertex,
        EditMode::Edge,
        EditMode::Face,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EditMode::Object => "Object",
            EditMode::Vertex => "Vertex",
            EditMode::Edge => "Edge",
            EditMode::Face => "Face",
        }
    }

    pub fn is_element_mode(&self) -> bool {
        !matches!(self, EditMode::Object)
    }
}

/// Manipulation applied by the object gizmo. Independent of [`EditMode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    None,
    Single,
    Multi,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    pub(crate) primary: Option<ObjectId>,
    pub(crate) multi: BTreeSet<ObjectId>,
    pub(crate) elements: Vec<usize>,
}

impl SelectionState {
    pub fn primary(&self) -> Option<ObjectId> {
        self.primary
    }

    pub fn multi(&self) -> &BTreeSet<ObjectId> {
        &self.multi
    }

    pub fn elements(&self) -> &[usize] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.multi.is_empty() && self.elements.is_empty()
    }

    pub fn cardinality(&self) -> Cardinality {
        match self.multi.len() {
            0 if self.primary.is_some() => Cardinality::Single,
            0 => Cardinality::None,
            1 => Cardinality::Single,
            _ => Cardinality::Multi,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.primary = None;
        self.multi.clear();
        self.elements.clear();
    }

    /// Drops every reference to `id`. Losing the primary object also drops
    /// the element selection that belonged to it.
    pub(crate) fn forget(&mut self, id: ObjectId) {
        self.multi.remove(&id);
        if self.primary == Some(id) {
            self.primary = None;
            self.elements.clear();
        }
    }
}
