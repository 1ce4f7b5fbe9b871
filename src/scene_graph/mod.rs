pub mod grouping;
pub mod object3d;
pub mod scene;
pub mod selection;
pub mod transform;

pub use object3d::{Content, ObjectId, PrimitiveShape, SceneObject};
pub use scene::Scene;
pub use selection::{Cardinality, EditMode, SelectionState, TransformMode};
pub use transform::Transform;
