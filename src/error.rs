use crate::scene_graph::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("parent object {0:?} does not exist")]
    InvalidParent(ObjectId),
    #[error("object {0:?} does not exist")]
    NotFound(ObjectId),
    /// The world matrix has a (near) zero determinant and cannot be inverted.
    #[error("object transform is not invertible")]
    DegenerateTransform,
}

pub type Result<T> = std::result::Result<T, SceneError>;
