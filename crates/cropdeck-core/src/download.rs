//! File output for crops and exported geometry.
//!
//! The session never touches the DOM; it hands named byte buffers to a
//! [`FileSink`] and the host decides how to save them.

use thiserror::Error;

use crate::session::CropId;

/// Name of the geometry export file.
pub const GEOMETRY_FILE_NAME: &str = "croppedImgProperties.json";

/// MIME type of the geometry export file.
pub const GEOMETRY_MIME_TYPE: &str = "application/json";

/// File name for a downloaded crop. The extension is always `.png`,
/// whatever encoding the crop was rendered with.
pub fn crop_file_name(id: CropId) -> String {
    format!("cropped_image_{id}.png")
}

#[derive(Debug, Error)]
#[error("Failed to save {name}: {reason}")]
pub struct SinkError {
    pub name: String,
    pub reason: String,
}

/// Something that can save a named file.
pub trait FileSink {
    fn emit(&mut self, name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

/// A file handed to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Sink that keeps every emitted file in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Vec<EmittedFile>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn files(&self) -> &[EmittedFile] {
        &self.files
    }

    pub fn last(&self) -> Option<&EmittedFile> {
        self.files.last()
    }

    pub fn into_files(self) -> Vec<EmittedFile> {
        self.files
    }
}

impl FileSink for MemorySink {
    fn emit(&mut self, name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), SinkError> {
        self.files.push(EmittedFile {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            bytes: bytes.to_vec(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_file_name() {
        assert_eq!(crop_file_name(1), "cropped_image_1.png");
        assert_eq!(crop_file_name(42), "cropped_image_42.png");
    }

    #[test]
    fn test_memory_sink_collects_in_order() {
        let mut sink = MemorySink::new();
        sink.emit("a.png", "image/png", &[1, 2]).unwrap();
        sink.emit(GEOMETRY_FILE_NAME, GEOMETRY_MIME_TYPE, b"[]").unwrap();

        assert_eq!(sink.files().len(), 2);
        assert_eq!(sink.files()[0].name, "a.png");
        assert_eq!(sink.last().unwrap().bytes, b"[]".to_vec());
        assert_eq!(sink.into_files()[1].mime_type, "application/json");
    }

    #[test]
    fn test_sink_error_display() {
        let err = SinkError {
            name: "x.png".to_string(),
            reason: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to save x.png: denied");
    }
}
