#![warn(clippy::all)]

//! GeoJSON Scene Viewer - renders GeoJSON points, lines and polygons as a 3D scene.
//!
//! Features are projected onto a local plane around a fixed reference point
//! and shown as spheres, polylines and translucent surfaces. Each geometry
//! type can be toggled on and off.

mod config;
mod geo;
mod loader;
mod scene;
mod state;
mod ui;

use config::ViewerConfig;
use eframe::egui;
use loader::LoadChannel;
use state::AppState;

// Native entry point
#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    env_logger::init();

    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "GeoJSON Scene Viewer",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    )
}

// WASM entry point - main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

/// Entry point for the WASM application.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub async fn start() {
    use eframe::wasm_bindgen::JsCast as _;

    // Redirect `log` messages to `console.log`:
    eframe::WebLogger::init(log::LevelFilter::Debug).ok();

    let web_options = eframe::WebOptions::default();

    wasm_bindgen_futures::spawn_local(async {
        let document = web_sys::window()
            .expect("No window")
            .document()
            .expect("No document");

        let canvas = document
            .get_element_by_id("app_canvas")
            .expect("Failed to find app_canvas")
            .dyn_into::<web_sys::HtmlCanvasElement>()
            .expect("app_canvas was not a HtmlCanvasElement");

        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
            )
            .await;

        // Remove the loading text once the app has loaded:
        if let Some(loading_text) = document.get_element_by_id("loading_text") {
            match start_result {
                Ok(_) => {
                    loading_text.remove();
                }
                Err(e) => {
                    loading_text.set_inner_html(
                        "<p>The app has crashed. See the developer console for details.</p>",
                    );
                    panic!("Failed to start eframe: {e:?}");
                }
            }
        }
    });
}

/// Main application state and logic.
pub struct ViewerApp {
    /// Application state containing all sub-states
    state: AppState,

    /// Channel for async GeoJSON loads
    load_channel: LoadChannel,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ViewerConfig::default();
        let paths = config.data_paths.clone();

        let mut app = Self {
            state: AppState::new(config),
            load_channel: LoadChannel::new(),
        };

        // Every startup document loads independently; failures are isolated
        for path in paths {
            app.state.load_started(&path);
            app.load_channel.load(cc.egui_ctx.clone(), path);
        }

        app
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed loads
        while let Some(result) = self.load_channel.try_recv() {
            log::debug!("Load finished: {}", result.path());
            self.state.handle_load_result(result);
        }

        // Render UI panels (order matters for egui layout)
        ui::render_top_bar(ctx, &self.state);
        ui::render_right_panel(ctx, &mut self.state);
        ui::render_canvas(ctx, &mut self.state);
    }
}
