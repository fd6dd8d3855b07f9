//! Session configuration supplied by the host.

use serde::{Deserialize, Serialize};

use crate::decode::FilterType;
use crate::encode::OutputFormat;
use crate::raster::ImageRasterEngine;

/// Settings that shape how crops are rendered.
///
/// Deserializes from a partial camelCase object; missing fields take their
/// defaults, e.g. `{ "devicePixelRatio": 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Device pixel density; output surfaces are this many times the
    /// displayed selection size so crops stay sharp on dense screens.
    pub device_pixel_ratio: f64,
    pub output_format: OutputFormat,
    pub filter: FilterType,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            device_pixel_ratio: 1.0,
            output_format: OutputFormat::default(),
            filter: FilterType::default(),
        }
    }
}

impl SessionConfig {
    /// Replace values the renderer cannot use with their defaults.
    pub fn validated(mut self) -> Self {
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            log::warn!(
                "Ignoring device pixel ratio {}, using 1.0",
                self.device_pixel_ratio
            );
            self.device_pixel_ratio = 1.0;
        }
        self
    }

    /// The `image`-crate rasterizer for these settings.
    pub fn raster_engine(&self) -> ImageRasterEngine {
        ImageRasterEngine::new(self.filter, self.output_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.device_pixel_ratio, 1.0);
        assert_eq!(config.output_format, OutputFormat::Jpeg { quality: 92 });
        assert_eq!(config.filter, FilterType::Lanczos3);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"devicePixelRatio": 2.5}"#).unwrap();
        assert_eq!(config.device_pixel_ratio, 2.5);
        assert_eq!(config.output_format, OutputFormat::default());
    }

    #[test]
    fn test_full_json() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"devicePixelRatio": 1, "outputFormat": {"type": "png"}, "filter": "nearest"}"#,
        )
        .unwrap();
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.filter, FilterType::Nearest);
    }

    #[test]
    fn test_validated_rejects_bad_ratio() {
        let mut config = SessionConfig::default();
        config.device_pixel_ratio = 0.0;
        assert_eq!(config.validated().device_pixel_ratio, 1.0);

        config.device_pixel_ratio = f64::INFINITY;
        assert_eq!(config.validated().device_pixel_ratio, 1.0);

        config.device_pixel_ratio = 3.0;
        assert_eq!(config.validated().device_pixel_ratio, 3.0);
    }

    #[test]
    fn test_raster_engine_follows_config() {
        let mut config = SessionConfig::default();
        config.output_format = OutputFormat::Png;
        config.filter = FilterType::Bilinear;
        let engine = config.raster_engine();
        assert_eq!(engine.format, OutputFormat::Png);
        assert_eq!(engine.filter, FilterType::Bilinear);
    }
}
