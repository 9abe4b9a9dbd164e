//! Scene model: renderable objects, the scene container and the visibility
//! filter that toggles objects by geometry type.

mod container;
mod object;
mod visibility;

pub use container::SceneState;
pub use object::{GeometryKind, Primitive, SceneObject, Style, Surface};
pub use visibility::{apply_visibility, VisibilityFlags};
