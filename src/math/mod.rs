pub mod adjacency;
pub mod falloff;
pub mod space;

pub use adjacency::{adjacency_map, find_adjacent_vertices};
pub use falloff::{falloff_weight, FalloffCurve};
pub use space::{to_local, to_world};
