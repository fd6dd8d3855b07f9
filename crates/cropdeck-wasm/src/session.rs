//! WASM bindings for the crop session.
//!
//! The host keeps one `JsCropSession` per widget and forwards UI events to
//! it: file selection, image layout, drag updates and button clicks. After
//! each call the host re-reads the getters to refresh its view.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsCropSession({ devicePixelRatio: window.devicePixelRatio });
//!
//! session.load_image(file.name, new Uint8Array(await file.arrayBuffer()));
//! img.onload = () => session.attach_surface(img.naturalWidth, img.naturalHeight, img.width, img.height);
//! onCropChange = (c) => session.update_selection(c.unit, c.x, c.y, c.width, c.height);
//!
//! cropButton.onclick = () => session.commit_crop();
//! downloadButton.onclick = () => session.download_current((name, type, bytes) => {
//!   const link = document.createElement('a');
//!   link.href = URL.createObjectURL(new Blob([bytes], { type }));
//!   link.download = name;
//!   link.click();
//! });
//! ```

use cropdeck_core::{
    CommitOutcome, CropError, CropResult, CropSession, Direction, SelectionRect, SessionConfig,
    SourceFile, SurfaceMetrics, Unit,
};
use js_sys::Function;
use wasm_bindgen::prelude::*;

use crate::sink::CallbackSink;

fn to_js(err: CropError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Tag returned to JavaScript for each commit outcome.
fn outcome_tag(outcome: CommitOutcome) -> &'static str {
    match outcome {
        CommitOutcome::Committed(_) => "committed",
        CommitOutcome::Duplicate => "duplicate",
        CommitOutcome::NoImage => "noImage",
        CommitOutcome::EmptySelection => "emptySelection",
    }
}

/// A crop session for JavaScript.
#[wasm_bindgen]
pub struct JsCropSession {
    inner: CropSession,
}

#[wasm_bindgen]
impl JsCropSession {
    /// Create a session from an optional config object, e.g.
    /// `{ devicePixelRatio: 2, outputFormat: { type: "png" }, filter: "lanczos3" }`.
    ///
    /// # Errors
    /// Returns error if the config object has the wrong shape
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsCropSession, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            SessionConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Invalid session config: {}", e)))?
        };
        Ok(Self::from_config(config))
    }

    /// Discard all state and load the selected file.
    pub fn load_image(&mut self, name: &str, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner
            .load_image(&SourceFile::new(name, bytes))
            .map_err(to_js)
    }

    /// Report the image layout once the surface has shown it.
    pub fn attach_surface(
        &mut self,
        natural_width: f64,
        natural_height: f64,
        width: f64,
        height: f64,
    ) -> bool {
        self.inner.attach_surface(SurfaceMetrics {
            natural_width,
            natural_height,
            width,
            height,
        })
    }

    /// Report a new displayed size, e.g. after the container resized.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> bool {
        self.inner.set_display_size(width, height)
    }

    /// Replace the pending selection. `unit` is `"px"` or `"%"`; anything
    /// else is treated as pixels.
    pub fn update_selection(&mut self, unit: &str, x: f64, y: f64, width: f64, height: f64) {
        let unit = Unit::parse(unit).unwrap_or_else(|| {
            log::warn!("Unknown selection unit {unit:?}, assuming px");
            Unit::Px
        });
        self.inner.update_selection(SelectionRect {
            unit,
            x,
            y,
            width,
            height,
        });
    }

    /// Commit the pending selection.
    ///
    /// Returns `"committed"`, `"duplicate"`, `"noImage"` or `"emptySelection"`.
    pub fn commit_crop(&mut self) -> Result<String, JsValue> {
        self.inner
            .commit_crop()
            .map(|outcome| outcome_tag(outcome).to_string())
            .map_err(to_js)
    }

    /// Show the previous crop. False when already at the first one.
    pub fn previous(&mut self) -> bool {
        self.inner.navigate(Direction::Previous)
    }

    /// Show the next crop. False when already at the last one.
    pub fn next(&mut self) -> bool {
        self.inner.navigate(Direction::Next)
    }

    pub fn delete_result(&mut self, id: u32) -> bool {
        self.inner.delete_result(id)
    }

    pub fn delete_current(&mut self) -> bool {
        self.inner.delete_current()
    }

    /// Clear the image and every crop.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    #[wasm_bindgen(getter)]
    pub fn result_count(&self) -> usize {
        self.inner.results().len()
    }

    /// Ids of all crops in stored order.
    pub fn result_ids(&self) -> Vec<u32> {
        self.inner.results().iter().map(CropResult::id).collect()
    }

    /// Index of the crop on display, or -1 when there is none.
    #[wasm_bindgen(getter)]
    pub fn selected_index(&self) -> i32 {
        self.inner
            .selected_index()
            .map_or(-1, |index| index as i32)
    }

    #[wasm_bindgen(getter)]
    pub fn no_more_images(&self) -> bool {
        self.inner.no_more_images()
    }

    #[wasm_bindgen(getter)]
    pub fn next_id(&self) -> u32 {
        self.inner.next_id()
    }

    pub fn current_id(&self) -> Option<u32> {
        self.inner.current().map(CropResult::id)
    }

    /// Encoded bytes of the crop on display.
    ///
    /// Note: This copies the bytes into JavaScript memory.
    pub fn current_bytes(&self) -> Option<Vec<u8>> {
        self.inner.current().map(|r| r.raster_output().to_vec())
    }

    pub fn current_mime_type(&self) -> Option<String> {
        self.inner.current().map(|r| r.mime_type().to_string())
    }

    /// Multi-line details for the crop on display.
    pub fn current_summary(&self) -> Option<String> {
        self.inner.current_summary().map(|s| s.to_string())
    }

    /// Geometry of every crop as an array of plain objects.
    pub fn export_geometry(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.export_geometry())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Geometry export as pretty-printed JSON text.
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.inner.export_json().map_err(to_js)
    }

    /// Pass the crop on display to `callback(name, mimeType, bytes)`.
    ///
    /// Returns false when there is no crop to save.
    pub fn download_current(&self, callback: &Function) -> Result<bool, JsValue> {
        self.inner
            .download_current(&mut CallbackSink::new(callback))
            .map_err(to_js)
    }

    /// Pass `croppedImgProperties.json` to `callback(name, mimeType, bytes)`.
    pub fn export_to(&self, callback: &Function) -> Result<(), JsValue> {
        self.inner
            .export_to(&mut CallbackSink::new(callback))
            .map_err(to_js)
    }
}

impl JsCropSession {
    pub(crate) fn from_config(config: SessionConfig) -> Self {
        Self {
            inner: CropSession::new(config),
        }
    }
}
