use std::collections::BTreeSet;

use crate::model::Mesh;

/// Vertices sharing at least one triangle with `vertex_index`.
pub fn find_adjacent_vertices(vertex_index: usize, mesh: &Mesh) -> BTreeSet<usize> {
    let mut adjacent = BTreeSet::new();

    for triangle in mesh.triangles() {
        if !triangle.contains(&vertex_index) {
            continue;
        }

        adjacent.extend(
            triangle
                .into_iter()
                .filter(|&other| other != vertex_index && other < mesh.vertex_count()),
        );
    }

    adjacent
}

/// Adjacency for every vertex, built in a single pass over the triangles.
pub fn adjacency_map(mesh: &Mesh) -> Vec<BTreeSet<usize>> {
    let vertex_count = mesh.vertex_count();
    let mut map = vec![BTreeSet::new(); vertex_count];

    for [a, b, c] in mesh.triangles() {
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            continue;
        }

        for (from, to) in [(a, b), (b, c), (c, a)] {
            if from != to {
                map[from].insert(to);
                map[to].insert(from);
            }
        }
    }

    map
}
