//! Selection geometry and the displayed-to-native coordinate transform.
//!
//! # Coordinate System
//!
//! - Displayed coordinates are pixels of the on-screen (possibly scaled) image
//! - Native coordinates are pixels of the decoded, full-resolution image
//! - Origin is the top-left corner in both systems
//!
//! Stored crop coordinates stay in displayed units. Only rasterization works
//! in native pixels.

use serde::{Deserialize, Serialize};

use crate::decode::DecodedImage;

/// Unit of a selection rectangle as emitted by the image surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "px")]
    Px,
    #[default]
    #[serde(rename = "%")]
    Percent,
}

impl Unit {
    /// Parse the unit string used by the surface (`"px"` or `"%"`).
    pub fn parse(value: &str) -> Option<Unit> {
        match value.trim() {
            "px" => Some(Unit::Px),
            "%" => Some(Unit::Percent),
            _ => None,
        }
    }
}

/// The pending, not yet committed crop region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub unit: Unit,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SelectionRect {
    /// A selection in displayed pixels.
    pub fn px(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: Unit::Px,
            x,
            y,
            width,
            height,
        }
    }

    /// A selection in percent of the displayed image.
    pub fn percent(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            unit: Unit::Percent,
            x,
            y,
            width,
            height,
        }
    }

    /// Express this selection in displayed pixels.
    pub fn to_display_px(&self, display_width: f64, display_height: f64) -> SelectionRect {
        match self.unit {
            Unit::Px => *self,
            Unit::Percent => SelectionRect::px(
                self.x / 100.0 * display_width,
                self.y / 100.0 * display_height,
                self.width / 100.0 * display_width,
                self.height / 100.0 * display_height,
            ),
        }
    }

    /// True when the selection covers no area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Corner coordinates of this selection, in the selection's own units.
    pub fn coordinates(&self) -> CropCoordinates {
        CropCoordinates {
            top_left: Point::new(self.x, self.y),
            bottom_right: Point::new(self.x + self.width, self.y + self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Corners of a committed crop in displayed units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropCoordinates {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl CropCoordinates {
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }
}

/// Layout reported by the image surface once the image is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceMetrics {
    pub natural_width: f64,
    pub natural_height: f64,
    pub width: f64,
    pub height: f64,
}

/// A region of the source image in native pixels, possibly fractional and
/// possibly extending past the image bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NativeRegion {
    /// Snap to whole pixels and clip to a `bounds_width` x `bounds_height` image.
    ///
    /// Returns `None` when nothing of the region lies inside the image.
    pub fn clamp_to(&self, bounds_width: u32, bounds_height: u32) -> Option<PixelRegion> {
        let snap = |v: f64, max: u32| -> u32 {
            if v.is_nan() {
                0
            } else {
                v.round().clamp(0.0, max as f64) as u32
            }
        };

        let left = snap(self.x, bounds_width);
        let top = snap(self.y, bounds_height);
        let right = snap(self.x + self.width, bounds_width);
        let bottom = snap(self.y + self.height, bounds_height);

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
}

/// A whole-pixel region fully inside the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The loaded source image together with the size it is displayed at.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    name: String,
    image: DecodedImage,
    display_width: f64,
    display_height: f64,
}

impl ImageHandle {
    /// Wrap a decoded image. Until the surface reports a layout, the image is
    /// assumed to be displayed at its natural size.
    pub fn new(name: impl Into<String>, image: DecodedImage) -> Self {
        let display_width = image.width as f64;
        let display_height = image.height as f64;
        Self {
            name: name.into(),
            image,
            display_width,
            display_height,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn natural_width(&self) -> u32 {
        self.image.width
    }

    pub fn natural_height(&self) -> u32 {
        self.image.height
    }

    pub fn display_size(&self) -> (f64, f64) {
        (self.display_width, self.display_height)
    }

    /// Record the displayed size. Returns false and keeps the previous size
    /// when either dimension is not a positive finite number.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return false;
        }
        self.display_width = width;
        self.display_height = height;
        true
    }

    /// `(natural / displayed)` on each axis.
    pub fn scale_factors(&self) -> (f64, f64) {
        (
            self.image.width as f64 / self.display_width,
            self.image.height as f64 / self.display_height,
        )
    }

    /// Map a selection from displayed coordinates to native pixels.
    pub fn to_native(&self, selection: &SelectionRect) -> NativeRegion {
        let rect = selection.to_display_px(self.display_width, self.display_height);
        let (scale_x, scale_y) = self.scale_factors();
        NativeRegion {
            x: rect.x * scale_x,
            y: rect.y * scale_y,
            width: rect.width * scale_x,
            height: rect.height * scale_y,
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Mapping scales every component by the axis scale factor.
        #[test]
        fn prop_native_region_scales_linearly(
            (natural_w, natural_h) in (10u32..=200, 10u32..=200),
            (display_w, display_h) in (5.0f64..=400.0, 5.0f64..=400.0),
            (x, y, w, h) in (0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0, 0.0f64..=100.0),
        ) {
            let image = DecodedImage::new(natural_w, natural_h, vec![0u8; (natural_w * natural_h * 3) as usize]);
            let mut handle = ImageHandle::new("p.png", image);
            prop_assert!(handle.set_display_size(display_w, display_h));

            let (sx, sy) = handle.scale_factors();
            let region = handle.to_native(&SelectionRect::px(x, y, w, h));

            prop_assert!((region.x - x * sx).abs() < 1e-9);
            prop_assert!((region.y - y * sy).abs() < 1e-9);
            prop_assert!((region.width - w * sx).abs() < 1e-9);
            prop_assert!((region.height - h * sy).abs() < 1e-9);
        }

        /// A clamped region always lies inside the image and is non-empty.
        #[test]
        fn prop_clamped_region_within_bounds(
            (bounds_w, bounds_h) in (1u32..=300, 1u32..=300),
            (x, y) in (-500.0f64..=500.0, -500.0f64..=500.0),
            (w, h) in (0.0f64..=800.0, 0.0f64..=800.0),
        ) {
            let region = NativeRegion { x, y, width: w, height: h };
            if let Some(px) = region.clamp_to(bounds_w, bounds_h) {
                prop_assert!(px.width >= 1 && px.height >= 1);
                prop_assert!(px.x + px.width <= bounds_w);
                prop_assert!(px.y + px.height <= bounds_h);
            }
        }
    }
}
