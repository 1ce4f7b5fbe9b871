use glam::Vec3;

use crate::config::EditorConfig;
use crate::deform::policy::DeformationPolicy;
use crate::error::{Result, SceneError};
use crate::math::adjacency::find_adjacent_vertices;
use crate::math::falloff::FalloffCurve;
use crate::math::space::to_local_with_epsilon;
use crate::model::Mesh;
use crate::render_common::MeshObserver;
use crate::scene_graph::{ObjectId, Scene};

/// Snapshot taken when a drag begins.
#[derive(Debug, Clone)]
pub struct DragSession {
    object_id: ObjectId,
    vertex: usize,
    policy: DeformationPolicy,
    /// World-space point of the previous update.
    anchor: Vec3,
    /// Local-space offset accumulated since the drag began.
    total_delta: Vec3,
    start_positions: Vec<Vec3>,
    /// Neighbors and their weights, only filled for the connected policy.
    neighbors: Vec<(usize, f32)>,
}

impl DragSession {
    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn vertex(&self) -> usize {
        self.vertex
    }

    pub fn policy(&self) -> DeformationPolicy {
        self.policy
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn total_delta(&self) -> Vec3 {
        self.total_delta
    }

    pub fn start_positions(&self) -> &[Vec3] {
        &self.start_positions
    }

    pub fn neighbors(&self) -> &[(usize, f32)] {
        &self.neighbors
    }
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Moves mesh vertices while a pointer drag is in progress.
#[derive(Debug, Clone)]
pub struct DeformEngine {
    state: DragState,
    policy: DeformationPolicy,
    falloff_curve: FalloffCurve,
    falloff_radius: f32,
    min_falloff_radius: f32,
    max_falloff_radius: f32,
    radius_step: f32,
    determinant_epsilon: f32,
}

impl Default for DeformEngine {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl DeformEngine {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            state: DragState::Idle,
            policy: config.deformation,
            falloff_curve: config.falloff_curve,
            falloff_radius: config.clamped_radius(),
            min_falloff_radius: config.min_falloff_radius,
            max_falloff_radius: config.max_falloff_radius,
            radius_step: config.radius_step,
            determinant_epsilon: config.determinant_epsilon,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn policy(&self) -> DeformationPolicy {
        self.policy
    }

    /// Takes effect with the next drag; an open session keeps its policy.
    pub fn set_policy(&mut self, policy: DeformationPolicy) {
        self.policy = policy;
    }

    pub fn falloff_curve(&self) -> FalloffCurve {
        self.falloff_curve
    }

    pub fn set_falloff_curve(&mut self, curve: FalloffCurve) {
        self.falloff_curve = curve;
    }

    pub fn falloff_radius(&self) -> f32 {
        self.falloff_radius
    }

    pub fn set_falloff_radius(&mut self, radius: f32) {
        if radius.is_finite() {
            self.falloff_radius = radius.clamp(self.min_falloff_radius, self.max_falloff_radius);
        }
    }

    /// Scales the radius by `radius_step` per wheel notch. Positive notches grow it.
    pub fn adjust_falloff_radius(&mut self, notches: f32) {
        let factor = (1.0 + self.radius_step).powf(notches);
        self.set_falloff_radius(self.falloff_radius * factor);
        log::trace!("Falloff radius: {}", self.falloff_radius);
    }

    /// Starts a drag on `vertex` of the primary mesh. Does nothing and
    /// returns `false` unless the vertex is editable and no drag is open.
    pub fn begin_drag(&mut self, scene: &Scene, anchor: Vec3, vertex: usize) -> bool {
        if self.is_dragging() || !scene.editable_vertices().contains(&vertex) {
            return false;
        }

        let Some((object_id, mesh)) = scene.primary_mesh() else {
            return false;
        };

        let Some(target) = mesh.position(vertex) else {
            return false;
        };

        let neighbors = match self.policy {
            DeformationPolicy::Connected { weight } => find_adjacent_vertices(vertex, mesh)
                .into_iter()
                .filter_map(|neighbor| {
                    let position = mesh.position(neighbor)?;
                    Some((neighbor, weight.weight(target.distance(position))))
                })
                .collect(),
            _ => Vec::new(),
        };

        log::debug!(
            "Begin {} drag on vertex {} of {:?}",
            self.policy.label(),
            vertex,
            object_id
        );

        self.state = DragState::Dragging(DragSession {
            object_id,
            vertex,
            policy: self.policy,
            anchor,
            total_delta: Vec3::ZERO,
            start_positions: mesh.positions().collect(),
            neighbors,
        });

        true
    }

    /// Applies pointer movement to the open drag. Returns `Ok(false)` when no
    /// drag is open. A non-invertible object transform skips the frame and
    /// reports [`SceneError::DegenerateTransform`]; the session stays open.
    pub fn update_drag(
        &mut self,
        scene: &mut Scene,
        point: Vec3,
        observer: &mut dyn MeshObserver,
    ) -> Result<bool> {
        let DragState::Dragging(session) = &mut self.state else {
            return Ok(false);
        };

        let object_id = session.object_id;
        let Some(world_matrix) = scene.world_matrix(object_id) else {
            log::warn!("Drag target {:?} disappeared, ending drag", object_id);
            self.state = DragState::Idle;
            return Err(SceneError::NotFound(object_id));
        };

        let local_points = to_local_with_epsilon(point, &world_matrix, self.determinant_epsilon)
            .and_then(|new_local| {
                to_local_with_epsilon(session.anchor, &world_matrix, self.determinant_epsilon)
                    .map(|anchor_local| new_local - anchor_local)
            });

        let step = match local_points {
            Ok(step) => step,
            Err(err) => {
                log::warn!("Skipping drag update on {:?}: {}", object_id, err);
                return Err(err);
            }
        };

        session.total_delta += step;
        session.anchor = point;

        let Some(mesh) = scene.mesh_mut(object_id) else {
            log::warn!("Drag target {:?} no longer holds a mesh, ending drag", object_id);
            self.state = DragState::Idle;
            return Err(SceneError::NotFound(object_id));
        };

        apply(session, mesh, self.falloff_curve, self.falloff_radius);
        mesh.mark_dirty();
        observer.positions_changed(object_id, mesh);

        log::trace!(
            "Drag update on {:?}: total delta {:?}",
            object_id,
            session.total_delta
        );

        Ok(true)
    }

    /// Closes the open drag, if any. Returns whether a session was closed.
    pub fn end_drag(&mut self) -> bool {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => {
                log::debug!(
                    "End drag on vertex {} of {:?}",
                    session.vertex,
                    session.object_id
                );
                true
            }
            DragState::Idle => false,
        }
    }
}

/// Writes `start + total_delta * weight` for every vertex the policy touches.
fn apply(session: &DragSession, mesh: &mut Mesh, curve: FalloffCurve, radius: f32) {
    let delta = session.total_delta;
    let start = &session.start_positions;

    match session.policy {
        DeformationPolicy::Direct => {
            if let Some(&origin) = start.get(session.vertex) {
                mesh.set_position(session.vertex, origin + delta);
            }
        }
        DeformationPolicy::Connected { .. } => {
            if let Some(&origin) = start.get(session.vertex) {
                mesh.set_position(session.vertex, origin + delta);
            }

            for &(neighbor, weight) in &session.neighbors {
                if let Some(&origin) = start.get(neighbor) {
                    mesh.set_position(neighbor, origin + delta * weight);
                }
            }
        }
        DeformationPolicy::SoftSelection => {
            let Some(&center) = start.get(session.vertex) else {
                return;
            };

            for (index, &origin) in start.iter().enumerate() {
                let weight = curve.weight(origin.distance(center), radius);
                mesh.set_position(index, origin + delta * weight);
            }
        }
    }
}
