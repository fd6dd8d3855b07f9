//! Geometry export for committed crops.
//!
//! Each number in the export is rounded to two decimals and written as a
//! fixed-point string (`"10.00"`), the shape of the properties file the
//! cropper has always produced.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::geometry::CropCoordinates;
use crate::session::{CropId, CropResult};

/// A number rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed2(f64);

impl Fixed2 {
    pub fn new(value: f64) -> Self {
        Fixed2((value * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Fixed2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Fixed2 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FixedPoint {
    pub x: Fixed2,
    pub y: Fixed2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCoordinates {
    pub top_left: FixedPoint,
    pub bottom_right: FixedPoint,
}

/// One exported crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeometryRecord {
    pub id: CropId,
    pub coordinates: FixedCoordinates,
    pub width: Fixed2,
    pub height: Fixed2,
}

impl GeometryRecord {
    pub fn new(id: CropId, coordinates: &CropCoordinates) -> Self {
        let point = |x: f64, y: f64| FixedPoint {
            x: Fixed2::new(x),
            y: Fixed2::new(y),
        };
        Self {
            id,
            coordinates: FixedCoordinates {
                top_left: point(coordinates.top_left.x, coordinates.top_left.y),
                bottom_right: point(coordinates.bottom_right.x, coordinates.bottom_right.y),
            },
            // Derived from the unrounded corners
            width: Fixed2::new(coordinates.width()),
            height: Fixed2::new(coordinates.height()),
        }
    }
}

/// Build one record per crop, in stored order.
pub fn export_geometry(results: &[CropResult]) -> Vec<GeometryRecord> {
    results.iter().map(CropResult::geometry).collect()
}

/// Pretty-print records as JSON with two-space indentation.
pub fn to_json(records: &[GeometryRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Details shown beside the currently viewed crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSummary {
    /// 1-based position in the result list.
    pub position: usize,
    pub record: GeometryRecord,
}

impl fmt::Display for CropSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.record.coordinates;
        writeln!(f, "Id: {}", self.position)?;
        writeln!(f, "Top-left: ({}, {})", c.top_left.x, c.top_left.y)?;
        writeln!(f, "Bottom-right: ({}, {})", c.bottom_right.x, c.bottom_right.y)?;
        writeln!(f, "Width: {} pixels", self.record.width)?;
        write!(f, "Height: {} pixels", self.record.height)
    }
}
