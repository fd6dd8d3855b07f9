//! Shared encoder types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while encoding a rendered crop.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying codec failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encoding applied to every committed crop.
///
/// JPEG at quality 92 matches `canvas.toDataURL("image/jpeg")` in browsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutputFormat {
    Jpeg { quality: u8 },
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 92 }
    }
}

impl OutputFormat {
    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }

    /// Encode RGB pixel data in this format.
    pub fn encode(self, pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
        match self {
            OutputFormat::Jpeg { quality } => super::encode_jpeg(pixels, width, height, quality),
            OutputFormat::Png => super::encode_png(pixels, width, height),
        }
    }
}

/// Check dimensions and buffer length before handing pixels to a codec.
pub(super) fn validate_rgb(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    Ok(())
}
