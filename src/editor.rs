use glam::Vec3;

use crate::config::EditorConfig;
use crate::deform::DeformEngine;
use crate::error::Result;
use crate::input::{Hit, Modifiers, PointerEvent};
use crate::render_common::{MeshObserver, RecomputeNormals};
use crate::scene_graph::{Content, EditMode, ObjectId, Scene, Transform, TransformMode};

/// Routes input events to the scene and the deformation engine. Toolbar
/// operations are forwarded so an open drag can be closed when its target
/// stops being editable.
pub struct Editor<O: MeshObserver = RecomputeNormals> {
    scene: Scene,
    deformer: DeformEngine,
    observer: O,
}

impl Editor<RecomputeNormals> {
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_observer(config, RecomputeNormals)
    }
}

impl<O: MeshObserver> Editor<O> {
    pub fn with_observer(config: &EditorConfig, observer: O) -> Self {
        Self {
            scene: Scene::new(),
            deformer: DeformEngine::new(config),
            observer,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn deformer(&self) -> &DeformEngine {
        &self.deformer
    }

    pub fn deformer_mut(&mut self) -> &mut DeformEngine {
        &mut self.deformer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Returns whether the event changed anything.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<bool> {
        match event {
            PointerEvent::Down {
                point,
                hit,
                modifiers,
            } => self.pointer_down(point, hit, modifiers),
            PointerEvent::Move { point } => {
                self.deformer
                    .update_drag(&mut self.scene, point, &mut self.observer)
            }
            PointerEvent::Up | PointerEvent::FocusLost => Ok(self.deformer.end_drag()),
            PointerEvent::Wheel { notches } => {
                let radius = self.deformer.falloff_radius();
                self.deformer.adjust_falloff_radius(notches);
                if self.deformer.falloff_radius() == radius {
                    return Ok(false);
                }

                // Re-apply at the current anchor so the new radius shows immediately
                match self.deformer.session().map(|session| session.anchor()) {
                    Some(anchor) => {
                        self.deformer
                            .update_drag(&mut self.scene, anchor, &mut self.observer)
                    }
                    None => Ok(true),
                }
            }
        }
    }

    fn pointer_down(&mut self, point: Vec3, hit: Hit, modifiers: Modifiers) -> Result<bool> {
        match (self.scene.edit_mode(), hit) {
            (EditMode::Object, Hit::Object(id)) => {
                if modifiers.extends_selection() {
                    self.scene.toggle_multi_selection(id)?;
                } else {
                    self.scene.set_primary_selection(Some(id))?;
                }
                Ok(true)
            }
            (EditMode::Object, Hit::Nothing) if !modifiers.extends_selection() => {
                self.scene.set_primary_selection(None)?;
                Ok(true)
            }
            (EditMode::Vertex, Hit::Vertex(index)) => {
                if modifiers.shift {
                    self.scene.toggle_element(index);
                    return Ok(true);
                }

                if !self.scene.selection().elements().contains(&index) {
                    self.scene.set_element_selection([index]);
                }

                Ok(self.deformer.begin_drag(&self.scene, point, index))
            }
            (EditMode::Vertex, Hit::Object(id)) if self.scene.primary_selection() != Some(id) => {
                self.scene.set_primary_selection(Some(id))?;
                Ok(true)
            }
            (EditMode::Vertex, Hit::Nothing) if !modifiers.extends_selection() => {
                self.scene.set_element_selection([]);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Ends the open drag when its mesh is no longer the editable primary.
    fn reconcile_drag(&mut self) {
        let Some(session) = self.deformer.session() else {
            return;
        };

        let still_editable = self.scene.edit_mode() == EditMode::Vertex
            && self.scene.primary_selection() == Some(session.object_id())
            && self.scene.editable_vertices().contains(&session.vertex());

        if !still_editable {
            self.deformer.end_drag();
        }
    }

    pub fn add_object(
        &mut self,
        content: Content,
        name: impl Into<String>,
        parent_id: Option<ObjectId>,
    ) -> Result<ObjectId> {
        self.scene.add_object(content, name, parent_id)
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<Vec<ObjectId>> {
        let removed = self.scene.remove_object(id);
        self.reconcile_drag();
        removed
    }

    pub fn toggle_visibility(&mut self, id: ObjectId) -> Result<bool> {
        let visible = self.scene.toggle_visibility(id);
        self.reconcile_drag();
        visible
    }

    pub fn rename(&mut self, id: ObjectId, new_name: &str) -> Result<bool> {
        self.scene.rename(id, new_name)
    }

    pub fn set_primary_selection(&mut self, id: Option<ObjectId>) -> Result<()> {
        let result = self.scene.set_primary_selection(id);
        self.reconcile_drag();
        result
    }

    pub fn toggle_multi_selection(&mut self, id: ObjectId) -> Result<bool> {
        let result = self.scene.toggle_multi_selection(id);
        self.reconcile_drag();
        result
    }

    pub fn set_edit_mode(&mut self, mode: EditMode) {
        self.scene.set_edit_mode(mode);
        self.reconcile_drag();
    }

    pub fn set_transform_mode(&mut self, mode: TransformMode) {
        self.scene.set_transform_mode(mode);
    }

    pub fn set_object_transform(&mut self, id: ObjectId, transform: Transform) -> Result<()> {
        self.scene.set_object_transform(id, transform)
    }

    pub fn group_selection(&mut self) -> Result<Option<ObjectId>> {
        let group = self.scene.group_selection();
        self.reconcile_drag();
        group
    }

    pub fn ungroup(&mut self, group_id: ObjectId) -> Result<bool> {
        let ungrouped = self.scene.ungroup(group_id);
        self.reconcile_drag();
        ungrouped
    }
}
