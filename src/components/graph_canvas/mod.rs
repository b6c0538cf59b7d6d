mod component;
mod render;
mod state;
mod types;

pub use component::GraphCanvas;
pub use types::{ViewMode, kind_color, kind_label};
