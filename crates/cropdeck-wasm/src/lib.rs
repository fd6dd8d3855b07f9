//! Cropdeck WASM - WebAssembly bindings for the Cropdeck cropping widget
//!
//! This crate exposes the cropdeck-core session to JavaScript/TypeScript so
//! the browser UI only has to render and forward events.
//!
//! # Module Structure
//!
//! - `session` - `JsCropSession`, the widget's state and operations
//! - `sink` - Delivers saved files to a JavaScript callback
//! - `logger` - Routes `log` records to the browser console
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsCropSession, accepted_file_types } from '@cropdeck/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! input.accept = accepted_file_types();
//! const session = new JsCropSession({ devicePixelRatio: window.devicePixelRatio });
//! ```

use wasm_bindgen::prelude::*;

mod logger;
mod session;
mod sink;

pub use session::JsCropSession;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::init(log::LevelFilter::Info);
}

/// Change the console log level (`"off"`, `"error"`, `"warn"`, `"info"`,
/// `"debug"` or `"trace"`). Returns false for an unknown level.
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> bool {
    match logger::parse_level(level) {
        Some(filter) => {
            logger::init(filter);
            true
        }
        None => false,
    }
}

/// Value for the file input's `accept` attribute
#[wasm_bindgen]
pub fn accepted_file_types() -> String {
    cropdeck_core::ACCEPTED_FILE_TYPES.to_string()
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }

    #[test]
    fn test_accepted_file_types() {
        assert_eq!(accepted_file_types(), ".jpg, .jpeg, .png, .Jfif, .json");
    }

    #[test]
    fn test_set_log_level_rejects_unknown() {
        assert!(!set_log_level("verbose"));
    }
}
