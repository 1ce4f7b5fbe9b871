pub mod engine;
pub mod policy;

pub use engine::{DeformEngine, DragSession, DragState};
pub use policy::{AdjacencyWeight, DeformationPolicy};
