pub mod config;
pub mod deform;
pub mod editor;
pub mod error;
pub mod input;
pub mod math;
pub mod model;
pub mod render_common;
pub mod scene_graph;

pub use config::EditorConfig;
pub use editor::Editor;
pub use error::SceneError;
