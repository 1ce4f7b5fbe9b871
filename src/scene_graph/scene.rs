use glam::{Mat4, Quat, Vec3};
use slotmap::SlotMap;

use crate::error::{Result, SceneError};
use crate::model::Mesh;
use crate::scene_graph::object3d::{Content, ObjectId, SceneObject};
use crate::scene_graph::selection::{Cardinality, EditMode, SelectionState, TransformMode};
use crate::scene_graph::transform::Transform;

/// Owns every scene object and the selection. All mutation goes through the
/// methods here so parent links and selection stay consistent.
#[derive(Debug, Default)]
pub struct Scene {
    objects: SlotMap<ObjectId, SceneObject>,
    pub(crate) selection: SelectionState,
    edit_mode: EditMode,
    transform_mode: TransformMode,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(
        &mut self,
        content: Content,
        name: impl Into<String>,
        parent_id: Option<ObjectId>,
    ) -> Result<ObjectId> {
        if let Some(parent_id) = parent_id {
            if !self.objects.contains_key(parent_id) {
                return Err(SceneError::InvalidParent(parent_id));
            }
        }

        let name = name.into();
        let id = self.objects.insert_with_key(|id| SceneObject {
            id,
            name,
            transform: Transform::default(),
            content,
            visible: true,
            parent_id,
            child_ids: Vec::new(),
        });

        if let Some(parent) = parent_id.and_then(|parent_id| self.objects.get_mut(parent_id)) {
            parent.child_ids.push(id);
        }

        log::debug!("Added object {:?} ({})", id, self.objects[id].name);

        Ok(id)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    /// What the renderer draws and the hit-tester may hit.
    pub fn visible_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values().filter(|object| object.visible)
    }

    pub fn root_objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects
            .values()
            .filter(|object| object.parent_id.is_none())
    }

    pub fn mesh(&self, id: ObjectId) -> Option<&Mesh> {
        self.objects.get(id).and_then(|object| object.content.as_mesh())
    }

    pub fn mesh_mut(&mut self, id: ObjectId) -> Option<&mut Mesh> {
        self.objects
            .get_mut(id)
            .and_then(|object| object.content.as_mesh_mut())
    }

    /// Removes `id` together with its whole subtree. Returns every removed id.
    pub fn remove_object(&mut self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let parent_id = self
            .objects
            .get(id)
            .ok_or(SceneError::NotFound(id))?
            .parent_id;

        if let Some(parent) = parent_id.and_then(|p| self.objects.get_mut(p)) {
            parent.child_ids.retain(|&child| child != id);
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(object) = self.objects.remove(next) {
                pending.extend(object.child_ids);
                self.selection.forget(next);
                removed.push(next);
            }
        }

        log::debug!("Removed {} object(s) rooted at {:?}", removed.len(), id);

        Ok(removed)
    }

    /// Flips visibility and returns the new value. Hiding the primary object
    /// deselects it.
    pub fn toggle_visibility(&mut self, id: ObjectId) -> Result<bool> {
        let object = self.objects.get_mut(id).ok_or(SceneError::NotFound(id))?;
        object.visible = !object.visible;
        let visible = object.visible;

        if !visible && self.selection.primary == Some(id) {
            self.selection.primary = None;
            self.selection.elements.clear();
        }

        log::debug!("Object {:?} visible: {}", id, visible);

        Ok(visible)
    }

    /// Returns `false` without changing anything when the name is blank.
    pub fn rename(&mut self, id: ObjectId, new_name: &str) -> Result<bool> {
        let object = self.objects.get_mut(id).ok_or(SceneError::NotFound(id))?;

        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Ok(false);
        }

        object.name = trimmed.to_string();
        Ok(true)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn primary_selection(&self) -> Option<ObjectId> {
        self.selection.primary
    }

    /// Replaces the primary selection and clears the multi and element
    /// selections. Hidden objects can't become primary; asking for one leaves
    /// the selection untouched.
    pub fn set_primary_selection(&mut self, id: Option<ObjectId>) -> Result<()> {
        if let Some(id) = id {
            let object = self.objects.get(id).ok_or(SceneError::NotFound(id))?;
            if !object.visible {
                log::debug!("Ignoring selection of hidden object {:?}", id);
                return Ok(());
            }
        }

        self.selection.primary = id;
        self.selection.multi.clear();
        self.selection.elements.clear();

        Ok(())
    }

    /// Adds or removes `id` from the multi-selection and returns whether it
    /// is now selected. A set of exactly one promotes that object to primary,
    /// unless it is hidden, in which case the primary is cleared.
    pub fn toggle_multi_selection(&mut self, id: ObjectId) -> Result<bool> {
        if !self.objects.contains_key(id) {
            return Err(SceneError::NotFound(id));
        }

        let selected = if self.selection.multi.remove(&id) {
            false
        } else {
            self.selection.multi.insert(id);
            true
        };

        if self.selection.multi.len() == 1 {
            self.selection.primary = self
                .selection
                .multi
                .first()
                .copied()
                .filter(|&only| self.objects.get(only).is_some_and(|object| object.visible));
            self.selection.elements.clear();
        }

        Ok(selected)
    }

    pub fn edit_mode(&self) -> EditMode {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        if mode != self.edit_mode {
            log::debug!("Edit mode: {}", mode.label());
        }

        self.edit_mode = mode;
        self.selection.elements.clear();
    }

    pub fn transform_mode(&self) -> TransformMode {
        self.transform_mode
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.transform_mode = mode;
    }

    /// Replaces the element selection. Not gated on the edit mode; consumers
    /// read it through [`Scene::editable_vertices`].
    pub fn set_element_selection(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selection.elements.clear();
        self.selection.elements.extend(indices);
    }

    /// Adds `index` if absent, removes it otherwise. Returns whether it is selected.
    pub fn toggle_element(&mut self, index: usize) -> bool {
        let elements = &mut self.selection.elements;
        match elements.iter().position(|&selected| selected == index) {
            Some(position) => {
                elements.remove(position);
                false
            }
            None => {
                elements.push(index);
                true
            }
        }
    }

    pub fn mode_state(&self) -> (EditMode, Cardinality) {
        (self.edit_mode, self.selection.cardinality())
    }

    /// The primary object when it holds a mesh.
    pub fn primary_mesh(&self) -> Option<(ObjectId, &Mesh)> {
        let id = self.selection.primary?;
        self.mesh(id).map(|mesh| (id, mesh))
    }

    /// Vertex indices that may be edited right now: the element selection in
    /// vertex mode with a mesh as primary, nothing otherwise.
    pub fn editable_vertices(&self) -> &[usize] {
        match (self.edit_mode, self.primary_mesh()) {
            (EditMode::Vertex, Some(_)) => self.selection.elements.as_slice(),
            _ => &[],
        }
    }

    /// Object driving the transform gizmo, if one should be shown.
    pub fn gizmo_target(&self) -> Option<(ObjectId, TransformMode)> {
        if self.edit_mode != EditMode::Object {
            return None;
        }

        self.selection
            .primary
            .filter(|&id| self.objects.get(id).is_some_and(|object| object.visible))
            .map(|id| (id, self.transform_mode))
    }

    /// Composes the local transforms from the root down to `id`.
    pub fn world_matrix(&self, id: ObjectId) -> Option<Mat4> {
        let object = self.objects.get(id)?;
        let mut matrix = object.transform.local_matrix();
        let mut parent_id = object.parent_id;

        while let Some(id) = parent_id {
            let parent = self.objects.get(id)?;
            matrix = parent.transform.local_matrix() * matrix;
            parent_id = parent.parent_id;
        }

        Some(matrix)
    }

    pub fn world_position(&self, id: ObjectId) -> Option<Vec3> {
        self.world_matrix(id)
            .map(|matrix| matrix.transform_point3(Vec3::ZERO))
    }

    pub fn world_transform(&self, id: ObjectId) -> Option<Transform> {
        self.world_matrix(id).map(Transform::from_matrix)
    }

    fn is_ancestor_or_self(&self, ancestor: ObjectId, id: ObjectId) -> bool {
        let mut current = Some(id);
        while let Some(next) = current {
            if next == ancestor {
                return true;
            }
            current = self.objects.get(next).and_then(|object| object.parent_id);
        }
        false
    }

    /// Sets the parent of an object and updates child lists. The local
    /// transform is kept as is, so the world pose follows the new parent.
    pub fn set_object_parent(
        &mut self,
        child_id: ObjectId,
        new_parent_id: Option<ObjectId>,
    ) -> Result<()> {
        let old_parent_id = self
            .objects
            .get(child_id)
            .ok_or(SceneError::NotFound(child_id))?
            .parent_id;

        if let Some(parent_id) = new_parent_id {
            if !self.objects.contains_key(parent_id)
                || self.is_ancestor_or_self(child_id, parent_id)
            {
                return Err(SceneError::InvalidParent(parent_id));
            }
        }

        if let Some(old_parent) = old_parent_id.and_then(|id| self.objects.get_mut(id)) {
            old_parent.child_ids.retain(|&id| id != child_id);
        }

        if let Some(new_parent) = new_parent_id.and_then(|id| self.objects.get_mut(id)) {
            new_parent.child_ids.push(child_id);
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;
        }

        Ok(())
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut SceneObject> {
        self.objects.get_mut(id).ok_or(SceneError::NotFound(id))
    }

    pub fn set_object_transform(&mut self, id: ObjectId, transform: Transform) -> Result<()> {
        self.object_mut(id)?.transform = transform;
        Ok(())
    }

    pub fn set_object_translation(&mut self, id: ObjectId, translation: Vec3) -> Result<()> {
        self.object_mut(id)?.transform.set_translation(translation);
        Ok(())
    }

    pub fn set_object_rotation(&mut self, id: ObjectId, rotation: Quat) -> Result<()> {
        self.object_mut(id)?.transform.set_rotation(rotation);
        Ok(())
    }

    pub fn set_object_scale(&mut self, id: ObjectId, scale: Vec3) -> Result<()> {
        self.object_mut(id)?.transform.set_scale(scale);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::scene_graph::object3d::PrimitiveShape;

    use super::*;

    fn cube(scene: &mut Scene, name: &str, parent: Option<ObjectId>) -> ObjectId {
        scene
            .add_object(Content::Primitive(PrimitiveShape::Cube), name, parent)
            .unwrap()
    }

    #[test]
    fn add_object_defaults() {
        let mut scene = Scene::new();
        let id = cube(&mut scene, "Cube", None);

        let object = scene.get_object(id).unwrap();
        assert_eq!(object.id(), id);
        assert_eq!(object.name(), "Cube");
        assert!(object.is_visible());
        assert_eq!(object.parent_id(), None);
        assert_eq!(scene.get_object_by_name("Cube"), Some(id));
    }

    #[test]
    fn add_object_with_unknown_parent_fails() {
        let mut scene = Scene::new();
        let ghost = cube(&mut scene, "Ghost", None);
        scene.remove_object(ghost).unwrap();

        let result = scene.add_object(Content::Group, "Orphan", Some(ghost));
        assert_eq!(result, Err(SceneError::InvalidParent(ghost)));
        assert!(scene.is_empty());
    }

    #[test]
    fn add_object_links_parent_and_child() {
        let mut scene = Scene::new();
        let parent = scene.add_object(Content::Group, "Group", None).unwrap();
        let child = cube(&mut scene, "Child", Some(parent));

        assert_eq!(scene.get_object(parent).unwrap().child_ids(), &[child]);
        let names: Vec<_> = scene
            .get_object(parent)
            .unwrap()
            .children(&scene)
            .map(|child| child.name())
            .collect();
        assert_eq!(names, vec!["Child"]);
        assert_eq!(
            scene.get_object(child).unwrap().parent(&scene).map(|p| p.id()),
            Some(parent)
        );
    }

    #[test]
    fn remove_cascades_and_clears_selection() {
        let mut scene = Scene::new();
        let group = scene.add_object(Content::Group, "Group", None).unwrap();
        let a = cube(&mut scene, "A", Some(group));
        let nested = cube(&mut scene, "Nested", Some(a));
        let other = cube(&mut scene, "Other", None);

        scene.set_primary_selection(Some(nested)).unwrap();
        scene.set_element_selection([1, 2]);

        let removed = scene.remove_object(group).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(!scene.contains(a));
        assert!(!scene.contains(nested));
        assert!(scene.contains(other));
        assert_eq!(scene.primary_selection(), None);
        assert!(scene.selection().elements().is_empty());
    }

    #[test]
    fn remove_child_detaches_from_parent() {
        let mut scene = Scene::new();
        let group = scene.add_object(Content::Group, "Group", None).unwrap();
        let a = cube(&mut scene, "A", Some(group));
        let b = cube(&mut scene, "B", Some(group));

        scene.remove_object(a).unwrap();
        assert_eq!(scene.get_object(group).unwrap().child_ids(), &[b]);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut scene = Scene::new();
        let id = cube(&mut scene, "A", None);
        scene.remove_object(id).unwrap();

        assert_eq!(scene.remove_object(id), Err(SceneError::NotFound(id)));
    }

    #[test]
    fn removing_unselected_object_keeps_primary() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        scene.set_primary_selection(Some(a)).unwrap();

        scene.remove_object(b).unwrap();
        assert_eq!(scene.primary_selection(), Some(a));
    }

    #[test]
    fn hiding_primary_clears_it() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        scene.set_primary_selection(Some(a)).unwrap();

        assert_eq!(scene.toggle_visibility(a), Ok(false));
        assert_eq!(scene.primary_selection(), None);
        assert_eq!(scene.visible_objects().count(), 0);

        assert_eq!(scene.toggle_visibility(a), Ok(true));
        assert_eq!(scene.primary_selection(), None);
    }

    #[test]
    fn hiding_other_object_keeps_primary() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        scene.set_primary_selection(Some(a)).unwrap();

        scene.toggle_visibility(b).unwrap();
        assert_eq!(scene.primary_selection(), Some(a));
    }

    #[test]
    fn hidden_object_cannot_become_primary() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        scene.set_primary_selection(Some(a)).unwrap();
        scene.toggle_visibility(b).unwrap();

        scene.set_primary_selection(Some(b)).unwrap();
        assert_eq!(scene.primary_selection(), Some(a));
    }

    #[test]
    fn rename_trims_and_rejects_blank() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);

        assert_eq!(scene.rename(a, "  Crate  "), Ok(true));
        assert_eq!(scene.get_object(a).unwrap().name(), "Crate");

        assert_eq!(scene.rename(a, "   "), Ok(false));
        assert_eq!(scene.get_object(a).unwrap().name(), "Crate");
    }

    #[test]
    fn primary_selection_clears_multi_and_elements() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        scene.toggle_multi_selection(a).unwrap();
        scene.toggle_multi_selection(b).unwrap();
        scene.set_element_selection([3]);

        scene.set_primary_selection(Some(b)).unwrap();
        assert_eq!(scene.primary_selection(), Some(b));
        assert!(scene.selection().multi().is_empty());
        assert!(scene.selection().elements().is_empty());

        scene.set_primary_selection(None).unwrap();
        assert!(scene.selection().is_empty());
    }

    #[test]
    fn single_multi_selection_promotes_to_primary() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        scene.set_element_selection([0, 1]);

        assert_eq!(scene.toggle_multi_selection(a), Ok(true));
        assert_eq!(scene.primary_selection(), Some(a));
        assert!(scene.selection().elements().is_empty());
        assert_eq!(scene.mode_state().1, Cardinality::Single);

        scene.toggle_multi_selection(b).unwrap();
        assert_eq!(scene.mode_state().1, Cardinality::Multi);

        // Dropping back to one promotes the survivor
        assert_eq!(scene.toggle_multi_selection(a), Ok(false));
        assert_eq!(scene.primary_selection(), Some(b));
    }

    #[test]
    fn hidden_object_is_not_promoted_from_multi_selection() {
        let mut scene = Scene::new();
        let mesh = scene
            .add_object(Content::Mesh(Mesh::cube()), "Mesh", None)
            .unwrap();
        scene.toggle_visibility(mesh).unwrap();

        assert_eq!(scene.toggle_multi_selection(mesh), Ok(true));
        assert_eq!(scene.primary_selection(), None);
        assert!(scene.selection().multi().contains(&mesh));

        scene.set_edit_mode(EditMode::Vertex);
        scene.set_element_selection([0]);
        assert!(scene.editable_vertices().is_empty());
        assert_eq!(scene.mode_state().1, Cardinality::Single);
    }

    #[test]
    fn toggle_multi_selection_twice_restores_set() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        let b = cube(&mut scene, "B", None);
        let c = cube(&mut scene, "C", None);
        scene.toggle_multi_selection(a).unwrap();
        scene.toggle_multi_selection(b).unwrap();

        for id in [a, b, c] {
            let before = scene.selection().multi().clone();
            scene.toggle_multi_selection(id).unwrap();
            scene.toggle_multi_selection(id).unwrap();
            assert_eq!(*scene.selection().multi(), before);
        }
    }

    #[test]
    fn set_edit_mode_always_clears_elements() {
        let mut scene = Scene::new();
        for mode in EditMode::ALL {
            scene.set_element_selection([4, 2, 9]);
            scene.set_edit_mode(mode);
            assert!(scene.selection().elements().is_empty(), "{mode:?}");
            assert_eq!(scene.edit_mode(), mode);
        }
    }

    #[test]
    fn editable_vertices_require_vertex_mode_and_mesh() {
        let mut scene = Scene::new();
        let mesh = scene
            .add_object(Content::Mesh(Mesh::cube()), "Mesh", None)
            .unwrap();
        let solid = cube(&mut scene, "Solid", None);

        scene.set_edit_mode(EditMode::Vertex);
        assert!(scene.editable_vertices().is_empty());

        scene.set_primary_selection(Some(solid)).unwrap();
        scene.set_element_selection([0]);
        assert!(scene.editable_vertices().is_empty());

        scene.set_primary_selection(Some(mesh)).unwrap();
        scene.set_element_selection([0, 5]);
        assert_eq!(scene.editable_vertices(), &[0, 5]);

        scene.set_edit_mode(EditMode::Edge);
        scene.set_element_selection([0, 5]);
        assert!(scene.editable_vertices().is_empty());
    }

    #[test]
    fn toggle_element_keeps_sequence_unique() {
        let mut scene = Scene::new();
        assert!(scene.toggle_element(3));
        assert!(scene.toggle_element(1));
        assert!(!scene.toggle_element(3));
        assert!(scene.toggle_element(3));
        assert_eq!(scene.selection().elements(), &[1, 3]);
    }

    #[test]
    fn gizmo_follows_primary_in_object_mode() {
        let mut scene = Scene::new();
        let a = cube(&mut scene, "A", None);
        assert_eq!(scene.gizmo_target(), None);

        scene.set_primary_selection(Some(a)).unwrap();
        scene.set_transform_mode(TransformMode::Rotate);
        assert_eq!(scene.gizmo_target(), Some((a, TransformMode::Rotate)));

        scene.set_edit_mode(EditMode::Vertex);
        assert_eq!(scene.gizmo_target(), None);
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut scene = Scene::new();
        let parent = scene.add_object(Content::Group, "Parent", None).unwrap();
        let child = cube(&mut scene, "Child", Some(parent));

        scene
            .set_object_transform(
                parent,
                Transform::new(
                    Vec3::new(10.0, 0.0, 0.0),
                    Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
                    Vec3::splat(2.0),
                ),
            )
            .unwrap();
        scene.set_object_translation(child, Vec3::X).unwrap();

        // Scaled by 2, rotated onto +Y, then offset
        let position = scene.world_position(child).unwrap();
        assert!(position.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5), "{position:?}");
    }

    #[test]
    fn reparenting_rejects_cycles() {
        let mut scene = Scene::new();
        let a = scene.add_object(Content::Group, "A", None).unwrap();
        let b = scene.add_object(Content::Group, "B", Some(a)).unwrap();

        assert_eq!(
            scene.set_object_parent(a, Some(b)),
            Err(SceneError::InvalidParent(b))
        );
        assert_eq!(
            scene.set_object_parent(a, Some(a)),
            Err(SceneError::InvalidParent(a))
        );

        scene.set_object_parent(b, None).unwrap();
        assert!(scene.get_object(a).unwrap().child_ids().is_empty());
        assert_eq!(scene.root_objects().count(), 2);
    }
}
