//! File sink that hands saved files to a JavaScript callback.

use cropdeck_core::{FileSink, SinkError};
use js_sys::{Function, Uint8Array};
use wasm_bindgen::JsValue;

/// Calls `callback(name, mimeType, bytes)` for every emitted file.
///
/// The host usually wraps the bytes in a `Blob` and clicks a download link.
pub(crate) struct CallbackSink<'a> {
    callback: &'a Function,
}

impl<'a> CallbackSink<'a> {
    pub(crate) fn new(callback: &'a Function) -> Self {
        Self { callback }
    }
}

impl FileSink for CallbackSink<'_> {
    fn emit(&mut self, name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), SinkError> {
        let data = Uint8Array::from(bytes);
        self.callback
            .call3(
                &JsValue::NULL,
                &JsValue::from_str(name),
                &JsValue::from_str(mime_type),
                &data,
            )
            .map(|_| ())
            .map_err(|e| SinkError {
                name: name.to_string(),
                reason: e.as_string().unwrap_or_else(|| format!("{e:?}")),
            })
    }
}
