use crate::model::Mesh;
use crate::scene_graph::scene::Scene;
use crate::scene_graph::transform::Transform;

slotmap::new_key_type! {
    pub struct ObjectId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveShape {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    Plane,
    Torus,
}

/// What an object holds. Operations match on the variant instead of
/// inspecting types at runtime.
#[derive(Debug, Clone)]
pub enum Content {
    Mesh(Mesh),
    Group,
    Primitive(PrimitiveShape),
}

impl Content {
    pub fn is_group(&self) -> bool {
        matches!(self, Content::Group)
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Content::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Content::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub(crate) id: ObjectId,
    pub(crate) name: String,
    pub(crate) transform: Transform,
    pub(crate) content: Content,
    pub(crate) visible: bool,
    pub(crate) parent_id: Option<ObjectId>,
    pub(crate) child_ids: Vec<ObjectId>,
}

impl SceneObject {
    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn parent_id(&self) -> Option<ObjectId> {
        self.parent_id
    }

    pub fn child_ids(&self) -> &[ObjectId] {
        &self.child_ids
    }

    pub fn parent<'a>(&self, scene: &'a Scene) -> Option<&'a SceneObject> {
        self.parent_id.and_then(|id| scene.get_object(id))
    }

    pub fn children<'a, 'b>(
        &'a self,
        scene: &'b Scene,
    ) -> impl Iterator<Item = &'b SceneObject> + 'b
    where
        'a: 'b,
    {
        self.child_ids
            .iter()
            .filter_map(move |id| scene.get_object(*id))
    }
}
