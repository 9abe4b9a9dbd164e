//! UI modules for the GeoJSON scene viewer.
//!
//! The UI is split into distinct panels:
//! - Top bar: Title and load status
//! - Right panel: Layer toggles and view controls
//! - Central canvas: The 3D scene

mod canvas;
mod right_panel;
mod top_bar;

pub use canvas::render_canvas;
pub use right_panel::render_right_panel;
pub use top_bar::render_top_bar;
