//! GeoJSON loading pipeline.
//!
//! Uses channel-based communication to bridge async fetches with egui's
//! synchronous update loop. Parsing happens in the load task; populating the
//! scene is left to the UI thread when it drains the channel.

use crate::geo::{parse_document, GeoDocument};
use eframe::egui;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Outcome of loading one GeoJSON file.
#[derive(Debug)]
pub enum LoadResult {
    Success {
        path: String,
        document: GeoDocument,
        elapsed_ms: f64,
    },
    Error {
        path: String,
        message: String,
    },
}

impl LoadResult {
    pub fn path(&self) -> &str {
        match self {
            LoadResult::Success { path, .. } | LoadResult::Error { path, .. } => path,
        }
    }
}

/// Channel-based loader for GeoJSON documents.
///
/// Each call to `load` runs independently; results arrive in completion
/// order, not request order.
pub struct LoadChannel {
    sender: Sender<LoadResult>,
    receiver: Receiver<LoadResult>,
}

impl Default for LoadChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl LoadChannel {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self { sender, receiver }
    }

    /// Spawns a load task for `path`.
    ///
    /// On native: reads the file on a new thread using pollster.
    /// On WASM: fetches relative to the page using wasm_bindgen_futures::spawn_local.
    ///
    /// When the task completes, the result is sent through the channel and
    /// ctx.request_repaint() is called to trigger a UI update.
    pub fn load(&self, ctx: egui::Context, path: String) {
        let sender = self.sender.clone();
        log::info!("Loading {}", path);

        #[cfg(not(target_arch = "wasm32"))]
        {
            std::thread::spawn(move || {
                let result = pollster::block_on(load_document(path));
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let result = load_document(path).await;
                let _ = sender.send(result);
                ctx.request_repaint();
            });
        }
    }

    /// Non-blocking check for a completed load.
    pub fn try_recv(&self) -> Option<LoadResult> {
        self.receiver.try_recv().ok()
    }

    #[cfg(test)]
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<LoadResult> {
        self.receiver.recv_timeout(timeout).ok()
    }
}

async fn load_document(path: String) -> LoadResult {
    let start = web_time::Instant::now();

    let document = fetch_bytes(&path)
        .await
        .and_then(|bytes| parse_document(&bytes));

    match document {
        Ok(document) => LoadResult::Success {
            path,
            document,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        },
        Err(message) => LoadResult::Error { path, message },
    }
}

#[cfg(not(target_arch = "wasm32"))]
async fn fetch_bytes(path: &str) -> Result<Vec<u8>, String> {
    std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path, e))
}

#[cfg(target_arch = "wasm32")]
async fn fetch_bytes(path: &str) -> Result<Vec<u8>, String> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let window = web_sys::window().ok_or_else(|| "No window".to_string())?;

    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| format!("Fetch of {} failed: {:?}", path, e))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| "Fetch response is not a Response".to_string())?;

    if !response.ok() {
        return Err(format!(
            "Failed to fetch {}: status {}",
            path,
            response.status()
        ));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| format!("Failed to read body of {}: {:?}", path, e))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| format!("Failed to read body of {}: {:?}", path, e))?;

    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
