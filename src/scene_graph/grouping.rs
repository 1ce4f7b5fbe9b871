use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::scene_graph::object3d::{Content, ObjectId};
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

impl Scene {
    /// Groups the multi-selection under a new group object placed at the
    /// centroid of the members' world positions. Members keep their world
    /// pose. Returns `None` when fewer than two objects are selected.
    pub fn group_selection(&mut self) -> Result<Option<ObjectId>> {
        let members: Vec<ObjectId> = self
            .selection
            .multi()
            .iter()
            .copied()
            .filter(|&id| self.contains(id))
            .collect();

        if members.len() < 2 {
            return Ok(None);
        }

        let world_matrices: Vec<(ObjectId, Mat4)> = members
            .iter()
            .filter_map(|&id| self.world_matrix(id).map(|matrix| (id, matrix)))
            .collect();

        let centroid = world_matrices
            .iter()
            .map(|(_, matrix)| matrix.transform_point3(Vec3::ZERO))
            .sum::<Vec3>()
            / world_matrices.len() as f32;

        let name = self.next_group_name();
        let group_id = self.add_object(Content::Group, name, None)?;
        self.set_object_transform(group_id, Transform::from_translation(centroid))?;

        let inverse_group = Mat4::from_translation(-centroid);
        for (id, world) in world_matrices {
            self.set_object_parent(id, Some(group_id))?;
            self.set_object_transform(id, Transform::from_matrix(inverse_group * world))?;
        }

        self.selection.clear();
        self.selection.primary = Some(group_id);
        self.selection.multi.insert(group_id);

        log::debug!(
            "Grouped {} object(s) under {:?} at {:?}",
            members.len(),
            group_id,
            centroid
        );

        Ok(Some(group_id))
    }

    /// Dissolves a group: every direct child becomes a root object with the
    /// group's pose baked in, then the empty group is removed. Returns
    /// `false` when `group_id` is not an existing group.
    pub fn ungroup(&mut self, group_id: ObjectId) -> Result<bool> {
        let Some(group) = self.get_object(group_id) else {
            return Ok(false);
        };

        if !group.content().is_group() {
            return Ok(false);
        }

        let children = group.child_ids().to_vec();
        for &child_id in &children {
            let Some(world) = self.world_matrix(child_id) else {
                continue;
            };

            self.set_object_parent(child_id, None)?;
            self.set_object_transform(child_id, Transform::from_matrix(world))?;
        }

        self.remove_object(group_id)?;
        self.selection.clear();

        log::debug!("Ungrouped {:?}, released {} object(s)", group_id, children.len());

        Ok(true)
    }

    /// "Group N" with the smallest N not already used by a group.
    fn next_group_name(&self) -> String {
        let group_names: Vec<&str> = self
            .objects()
            .filter(|object| object.content().is_group())
            .map(|object| object.name())
            .collect();

        (1..)
            .map(|n| format!("Group {n}"))
            .find(|candidate| !group_names.contains(&candidate.as_str()))
            .unwrap_or_default()
    }
}
