//! Rendering a native-pixel region of the source image into encoded output.
//!
//! The session talks to rasterization through the [`RasterEngine`] trait so
//! hosts can supply their own drawing surface. [`ImageRasterEngine`] is the
//! pure-Rust implementation backed by the `image` crate.

use thiserror::Error;

use crate::decode::{resize, DecodeError, DecodedImage, FilterType};
use crate::encode::{EncodeError, OutputFormat};
use crate::geometry::{NativeRegion, PixelRegion, SelectionRect};

#[derive(Debug, Error)]
pub enum RasterError {
    /// The requested region does not overlap the source image.
    #[error("Crop region lies outside the source image")]
    EmptyRegion,

    /// The output surface would have a zero dimension.
    #[error("Output surface is empty ({width}x{height})")]
    EmptyOutput { width: u32, height: u32 },

    #[error("Resampling failed: {0}")]
    Resample(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl RasterError {
    /// True for errors that only mean "nothing to draw".
    pub fn is_empty(&self) -> bool {
        matches!(self, RasterError::EmptyRegion | RasterError::EmptyOutput { .. })
    }
}

/// Pixel size of the surface a crop is drawn into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    /// Size for a displayed-pixel selection at the given device pixel ratio.
    ///
    /// Fractional sizes are truncated, as when assigning to `canvas.width`.
    pub fn from_selection(selection: &SelectionRect, pixel_ratio: f64) -> Self {
        let truncate = |v: f64| -> u32 {
            if v.is_finite() && v > 0.0 {
                v.trunc().min(u32::MAX as f64) as u32
            } else {
                0
            }
        };
        Self {
            width: truncate(selection.width * pixel_ratio),
            height: truncate(selection.height * pixel_ratio),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// A capability that samples a source image and produces encoded pixels.
pub trait RasterEngine {
    /// Draw `region` of `source` scaled to `output` and encode the result.
    fn rasterize(
        &self,
        source: &DecodedImage,
        region: &NativeRegion,
        output: OutputSize,
    ) -> Result<Vec<u8>, RasterError>;

    /// MIME type of the bytes this engine produces.
    fn mime_type(&self) -> &'static str;
}

/// Rasterizer built on the `image` crate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ImageRasterEngine {
    pub filter: FilterType,
    pub format: OutputFormat,
}

impl ImageRasterEngine {
    pub fn new(filter: FilterType, format: OutputFormat) -> Self {
        Self { filter, format }
    }

    /// Render `region` of `source` at `output` size without encoding.
    ///
    /// Parts of `region` that hang past the image edge stay black on the
    /// output surface; only the covered part is drawn, at its proportional
    /// offset and size.
    pub fn render(
        &self,
        source: &DecodedImage,
        region: &NativeRegion,
        output: OutputSize,
    ) -> Result<DecodedImage, RasterError> {
        if output.is_empty() {
            return Err(RasterError::EmptyOutput {
                width: output.width,
                height: output.height,
            });
        }

        let pixels = region
            .clamp_to(source.width, source.height)
            .ok_or(RasterError::EmptyRegion)?;

        let target = destination(region, source.width, source.height, output);
        let full_surface = PixelRegion {
            x: 0,
            y: 0,
            width: output.width,
            height: output.height,
        };

        let sampled = extract_region(source, pixels);
        if target == Some(full_surface) {
            return Ok(resize(&sampled, output.width, output.height, self.filter)?);
        }

        let mut canvas = DecodedImage::black(output.width, output.height);
        if let Some(target) = target {
            let drawn = resize(&sampled, target.width, target.height, self.filter)?;
            paste(&mut canvas, &drawn, target.x, target.y);
        }
        Ok(canvas)
    }
}

/// Where the in-bounds part of `region` lands on the output surface.
///
/// Edges inside the image map to the surface edges. Edges past the image
/// are pulled in by the overhang scaled to output pixels. Returns `None`
/// when the covered part rounds to nothing.
fn destination(
    region: &NativeRegion,
    bounds_width: u32,
    bounds_height: u32,
    output: OutputSize,
) -> Option<PixelRegion> {
    let axis = |start: f64, len: f64, bound: u32, out: u32| -> (u32, u32) {
        let scale = out as f64 / len;
        let to_out = |v: f64| (v * scale).round().clamp(0.0, out as f64) as u32;
        let near = if start < 0.0 { to_out(-start) } else { 0 };
        let far = if start + len > bound as f64 {
            to_out(bound as f64 - start)
        } else {
            out
        };
        (near, far)
    };

    let (left, right) = axis(region.x, region.width, bounds_width, output.width);
    let (top, bottom) = axis(region.y, region.height, bounds_height, output.height);
    if right <= left || bottom <= top {
        return None;
    }

    Some(PixelRegion {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    })
}

/// Copy `src` into `canvas` with its top-left corner at (`x`, `y`).
///
/// `src` must fit inside `canvas` at that offset.
fn paste(canvas: &mut DecodedImage, src: &DecodedImage, x: u32, y: u32) {
    let row_bytes = src.width as usize * 3;
    for row in 0..src.height as usize {
        let from = row * row_bytes;
        let to = ((y as usize + row) * canvas.width as usize + x as usize) * 3;
        canvas.pixels[to..to + row_bytes].copy_from_slice(&src.pixels[from..from + row_bytes]);
    }
}

impl RasterEngine for ImageRasterEngine {
    fn rasterize(
        &self,
        source: &DecodedImage,
        region: &NativeRegion,
        output: OutputSize,
    ) -> Result<Vec<u8>, RasterError> {
        let rendered = self.render(source, region, output)?;
        Ok(self
            .format
            .encode(&rendered.pixels, rendered.width, rendered.height)?)
    }

    fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Copy a whole-pixel region out of an RGB image.
///
/// `region` must lie inside `image`; [`NativeRegion::clamp_to`] guarantees it.
pub fn extract_region(image: &DecodedImage, region: PixelRegion) -> DecodedImage {
    let row_bytes = region.width as usize * 3;
    let mut output = Vec::with_capacity(row_bytes * region.height as usize);

    // Copy row slices rather than individual pixels
    for y in region.y as usize..(region.y + region.height) as usize {
        let start = (y * image.width as usize + region.x as usize) * 3;
        output.extend_from_slice(&image.pixels[start..start + row_bytes]);
    }

    DecodedImage::new(region.width, region.height, output)
}
