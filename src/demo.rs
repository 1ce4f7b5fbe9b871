use anyhow::Context;
use glam::{Quat, Vec3};
use scenesmith::deform::{AdjacencyWeight, DeformationPolicy};
use scenesmith::input::{Hit, Modifiers, PointerEvent};
use scenesmith::model::Mesh;
use scenesmith::render_common::MeshObserver;
use scenesmith::scene_graph::{Content, EditMode, ObjectId, PrimitiveShape, Transform};
use scenesmith::{Editor, EditorConfig};

/// Stands in for the renderer: recomputes normals and consumes the dirty flag
/// the way an upload pass would.
#[derive(Default)]
struct Uploads {
    count: usize,
}

impl MeshObserver for Uploads {
    fn positions_changed(&mut self, _object_id: ObjectId, mesh: &mut Mesh) {
        mesh.recompute_normals();
        if mesh.take_dirty() {
            self.count += 1;
        }
    }
}

pub struct DemoState {
    editor: Editor<Uploads>,
    cube: ObjectId,
    sphere: ObjectId,
    cylinder: ObjectId,
}

impl DemoState {
    pub fn new() -> anyhow::Result<Self> {
        let config = EditorConfig::default().with_radius_limits(0.1, 10.0);
        let mut editor = Editor::with_observer(&config, Uploads::default());

        let cube = editor.add_object(Content::Mesh(Mesh::cube()), "Cube", None)?;
        let sphere = editor.add_object(Content::Primitive(PrimitiveShape::Sphere), "Sphere", None)?;
        let cylinder =
            editor.add_object(Content::Primitive(PrimitiveShape::Cylinder), "Cylinder", None)?;

        editor.set_object_transform(cube, Transform::from_translation(Vec3::new(0.0, 0.5, 0.0)))?;
        editor.set_object_transform(
            sphere,
            Transform::new(Vec3::new(3.0, 1.0, 0.0), Quat::IDENTITY, Vec3::splat(0.5)),
        )?;
        editor.set_object_transform(
            cylinder,
            Transform::new(
                Vec3::new(-2.0, 0.0, 2.0),
                Quat::from_rotation_x(std::f32::consts::FRAC_PI_2),
                Vec3::ONE,
            ),
        )?;

        Ok(Self {
            editor,
            cube,
            sphere,
            cylinder,
        })
    }

    fn click(&mut self, point: Vec3, hit: Hit, modifiers: Modifiers) -> anyhow::Result<bool> {
        Ok(self.editor.handle_pointer(PointerEvent::Down {
            point,
            hit,
            modifiers,
        })?)
    }

    fn group_solids(&mut self) -> anyhow::Result<ObjectId> {
        self.click(Vec3::ZERO, Hit::Object(self.sphere), Modifiers::CTRL_OR_META)?;
        self.click(Vec3::ZERO, Hit::Object(self.cylinder), Modifiers::CTRL_OR_META)?;

        let group = self
            .editor
            .group_selection()?
            .context("Expected two selected objects to group")?;

        let scene = self.editor.scene();
        log::info!(
            "{} holds {} object(s) at {:?}",
            scene.get_object(group).map(|g| g.name()).unwrap_or("?"),
            scene.get_object(group).map(|g| g.child_ids().len()).unwrap_or(0),
            scene.world_position(group)
        );

        Ok(group)
    }

    fn drag_vertex(&mut self, vertex: usize, to: Vec3, steps: usize) -> anyhow::Result<()> {
        let start = self
            .editor
            .scene()
            .world_matrix(self.cube)
            .zip(self.editor.scene().mesh(self.cube).and_then(|m| m.position(vertex)))
            .map(|(world, local)| world.transform_point3(local))
            .context("Cube vertex missing")?;

        self.click(start, Hit::Vertex(vertex), Modifiers::NONE)?;
        for step in 1..=steps {
            let point = start.lerp(to, step as f32 / steps as f32);
            self.editor.handle_pointer(PointerEvent::Move { point })?;
        }
        self.editor.handle_pointer(PointerEvent::Up)?;

        Ok(())
    }

    fn sculpt_cube(&mut self) -> anyhow::Result<()> {
        self.click(Vec3::ZERO, Hit::Object(self.cube), Modifiers::NONE)?;
        self.editor.set_edit_mode(EditMode::Vertex);

        // Soft selection pull on the top corner, widening the radius halfway
        self.drag_vertex(6, Vec3::new(0.5, 2.0, 0.5), 4)?;
        self.editor
            .handle_pointer(PointerEvent::Wheel { notches: 3.0 })?;
        log::info!(
            "Falloff radius now {:.3}",
            self.editor.deformer().falloff_radius()
        );

        // Connected pull on the opposite corner
        self.editor
            .deformer_mut()
            .set_policy(DeformationPolicy::Connected {
                weight: AdjacencyWeight::InverseDistance,
            });
        self.drag_vertex(0, Vec3::new(-1.0, 0.0, -1.0), 3)?;

        if let Some(mesh) = self.editor.scene().mesh(self.cube) {
            for (index, vertex) in mesh.vertices().iter().enumerate() {
                log::debug!("Vertex {}: {:?} n={:?}", index, vertex.position, vertex.normal);
            }
        }

        self.editor.set_edit_mode(EditMode::Object);
        Ok(())
    }
}

pub fn run() -> anyhow::Result<()> {
    let mut state = DemoState::new().context("Failed to set up demo scene")?;

    let group = state.group_solids()?;
    state.sculpt_cube()?;

    let before = state.editor.scene().world_transform(state.sphere);
    state.editor.ungroup(group)?;
    let after = state.editor.scene().world_transform(state.sphere);

    log::info!("Sphere world pose before ungroup: {:?}", before);
    log::info!("Sphere world pose after ungroup:  {:?}", after);
    log::info!(
        "{} object(s) in scene, {} mesh upload(s)",
        state.editor.scene().len(),
        state.editor.observer_mut().count
    );

    Ok(())
}
