//! Encoding of rendered crops.
//!
//! This module provides functionality for:
//! - Encoding RGB pixels to JPEG with configurable quality
//! - Encoding RGB pixels to lossless PNG
//!
//! The encoded bytes are what the session stores and compares when it
//! rejects duplicate crops, so every encoder here must be deterministic.

mod jpeg;
mod png;
mod types;

pub use jpeg::encode_jpeg;
pub use png::encode_png;
pub use types::{EncodeError, OutputFormat};
