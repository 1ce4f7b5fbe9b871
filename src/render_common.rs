use crate::model::Mesh;
use crate::scene_graph::ObjectId;

/// Hook for the rendering side. Called after a mesh's positions were fully
/// written and the mesh marked dirty.
pub trait MeshObserver {
    fn positions_changed(&mut self, object_id: ObjectId, mesh: &mut Mesh);
}

impl<F> MeshObserver for F
where
    F: FnMut(ObjectId, &mut Mesh),
{
    fn positions_changed(&mut self, object_id: ObjectId, mesh: &mut Mesh) {
        self(object_id, mesh)
    }
}

/// Keeps lighting correct by recomputing normals on every change.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecomputeNormals;

impl MeshObserver for RecomputeNormals {
    fn positions_changed(&mut self, _object_id: ObjectId, mesh: &mut Mesh) {
        mesh.recompute_normals();
    }
}
