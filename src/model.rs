use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use itertools::Either;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            normal: Vec3::ZERO,
        }
    }
}

/// Editable triangle mesh. Without an index buffer, every three consecutive
/// vertices form a triangle.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Option<Vec<u32>>,
    positions_dirty: bool,
}

impl Mesh {
    pub fn new(positions: impl IntoIterator<Item = Vec3>, indices: Option<Vec<u32>>) -> Self {
        let mut mesh = Self {
            vertices: positions.into_iter().map(Vertex::new).collect(),
            indices,
            positions_dirty: false,
        };
        mesh.recompute_normals();
        mesh
    }

    /// Indexed unit cube centered on the origin, eight shared corners.
    pub fn cube() -> Self {
        let positions = [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];

        #[rustfmt::skip]
        let indices = vec![
            // Back
            0, 2, 1, 0, 3, 2,
            // Front
            4, 5, 6, 4, 6, 7,
            // Left
            0, 4, 7, 0, 7, 3,
            // Right
            1, 2, 6, 1, 6, 5,
            // Bottom
            0, 1, 5, 0, 5, 4,
            // Top
            3, 7, 6, 3, 6, 2,
        ];

        Self::new(positions, Some(indices))
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> Option<&[u32]> {
        self.indices.as_deref()
    }

    pub fn position(&self, index: usize) -> Option<Vec3> {
        self.vertices.get(index).map(|vertex| vertex.position)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|vertex| vertex.position)
    }

    /// Writes a position in place. Callers signal completion with
    /// [`Mesh::mark_dirty`] once the whole edit is written.
    pub fn set_position(&mut self, index: usize, position: Vec3) {
        if let Some(vertex) = self.vertices.get_mut(index) {
            vertex.position = position;
        }
    }

    /// Triangles as vertex index triples. Trailing indices that don't form a
    /// full triangle are ignored.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        match &self.indices {
            Some(indices) => Either::Left(
                indices
                    .chunks_exact(3)
                    .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize]),
            ),
            None => Either::Right(
                (0..self.vertices.len() / 3).map(|tri| [tri * 3, tri * 3 + 1, tri * 3 + 2]),
            ),
        }
    }

    pub fn mark_dirty(&mut self) {
        self.positions_dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.positions_dirty
    }

    /// Returns the dirty flag and clears it. Used by the renderer before re-uploading.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.positions_dirty, false)
    }

    /// Area-weighted vertex normals, computed in place.
    pub fn recompute_normals(&mut self) {
        for vertex in &mut self.vertices {
            vertex.normal = Vec3::ZERO;
        }

        let vertex_count = self.vertices.len();
        let Self {
            vertices, indices, ..
        } = self;

        let mut accumulate = |[a, b, c]: [usize; 3]| {
            if a >= vertex_count || b >= vertex_count || c >= vertex_count {
                return;
            }

            let p0 = vertices[a].position;
            let face_normal = (vertices[b].position - p0).cross(vertices[c].position - p0);

            vertices[a].normal += face_normal;
            vertices[b].normal += face_normal;
            vertices[c].normal += face_normal;
        };

        match indices {
            Some(indices) => indices
                .chunks_exact(3)
                .for_each(|tri| accumulate([tri[0] as usize, tri[1] as usize, tri[2] as usize])),
            None => (0..vertex_count / 3)
                .for_each(|tri| accumulate([tri * 3, tri * 3 + 1, tri * 3 + 2])),
        }

        for vertex in &mut self.vertices {
            vertex.normal = vertex.normal.normalize_or_zero();
        }
    }
}
