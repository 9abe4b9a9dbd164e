//! Application state management.
//!
//! The scene (objects and visibility flags), the camera, and the bits of
//! status shown in the UI. Only the UI thread mutates this state; async
//! loads hand their results over through `LoadChannel`.

mod camera;

pub use camera::OrbitCamera;

use crate::config::ViewerConfig;
use crate::geo::{FeatureBuilder, Projector};
use crate::loader::LoadResult;
use crate::scene::{SceneObject, SceneState};
use geo_types::Coord;

/// Root application state containing all sub-states.
pub struct AppState {
    pub config: ViewerConfig,

    /// Scene objects and visibility flags
    pub scene: SceneState,

    /// Feature-to-object conversion with the configured projection
    pub builder: FeatureBuilder,

    /// Orbit camera for the canvas
    pub camera: OrbitCamera,

    /// Application status message displayed in top bar
    pub status_message: String,

    /// Loads started but not yet handled
    pub pending_loads: usize,

    /// Geographic position under the pointer, if it is over the ground plane
    pub cursor_geo: Option<Coord<f64>>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}

impl AppState {
    pub fn new(config: ViewerConfig) -> Self {
        let projector = Projector::from(config.projection);
        let builder = FeatureBuilder::new(projector, config.styles.clone());

        let mut scene = SceneState::new();
        if config.show_axes {
            scene.insert(SceneObject::axes(config.axes_length));
        }

        Self {
            camera: OrbitCamera::new(config.camera),
            scene,
            builder,
            status_message: "Ready".to_string(),
            pending_loads: 0,
            cursor_geo: None,
            config,
        }
    }

    pub fn projector(&self) -> &Projector {
        self.builder.projector()
    }

    /// Records that a load was started for `path`.
    pub fn load_started(&mut self, path: &str) {
        self.pending_loads += 1;
        self.status_message = format!("Loading {}...", path);
    }

    /// Populates the scene from a finished load, or logs its failure.
    ///
    /// A failed document never affects objects from other documents.
    pub fn handle_load_result(&mut self, result: LoadResult) {
        self.pending_loads = self.pending_loads.saturating_sub(1);

        match result {
            LoadResult::Success {
                path,
                document,
                elapsed_ms,
            } => {
                log::info!("Data loaded from {}: {} features", path, document.len());
                if document.is_empty() {
                    log::warn!("{} contains no usable features", path);
                }
                if document.rejected > 0 {
                    log::warn!(
                        "{}: {} invalid features were dropped",
                        path,
                        document.rejected
                    );
                }

                let added = self.scene.populate(&document, &self.builder);
                log::info!(
                    "Added {} objects from {} in {:.1} ms ({} objects total)",
                    added,
                    path,
                    elapsed_ms,
                    self.scene.len()
                );
                self.status_message = format!("Loaded {} ({} objects)", path, added);
            }
            LoadResult::Error { path, message } => {
                log::error!("Error loading {}: {}", path, message);
                self.status_message = format!("Failed to load {}", path);
            }
        }
    }
}
