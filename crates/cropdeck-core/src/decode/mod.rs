//! Source image decoding for the crop session.
//!
//! This module provides functionality for:
//! - Decoding JPEG/JFIF and PNG images with EXIF orientation applied
//! - Exact-size resampling for rendering crops at display resolution
//!
//! All operations are synchronous and single-threaded, matching the
//! run-to-completion model of the browser host.

mod loader;
mod resize;
mod types;

pub use loader::decode_image;
pub use resize::resize;
pub use types::{DecodeError, DecodedImage, FilterType};
