//! Cropdeck Core - crop session library
//!
//! This crate provides everything behind the Cropdeck cropping widget that
//! does not touch the DOM: decoding the source image, mapping selections
//! from displayed to native coordinates, rendering and encoding crops, the
//! ordered list of committed crops, and geometry export.
//!
//! # Usage
//!
//! ```ignore
//! use cropdeck_core::{CropSession, SelectionRect, SessionConfig, SourceFile};
//!
//! let mut session = CropSession::new(SessionConfig::default());
//! session.load_image(&SourceFile::new("photo.jpg", bytes))?;
//! session.set_display_size(1000.0, 500.0);
//! session.update_selection(SelectionRect::px(100.0, 50.0, 200.0, 100.0));
//! session.commit_crop()?;
//! let json = session.export_json()?;
//! ```

pub mod config;
pub mod decode;
pub mod download;
pub mod encode;
pub mod export;
pub mod geometry;
pub mod raster;
pub mod session;
pub mod source;

pub use config::SessionConfig;
pub use download::{crop_file_name, EmittedFile, FileSink, MemorySink, SinkError, GEOMETRY_FILE_NAME};
pub use export::{CropSummary, Fixed2, GeometryRecord};
pub use geometry::{CropCoordinates, ImageHandle, NativeRegion, Point, SelectionRect, SurfaceMetrics, Unit};
pub use raster::{ImageRasterEngine, OutputSize, RasterEngine, RasterError};
pub use session::{CommitOutcome, CropError, CropId, CropResult, CropSession, Direction};
pub use source::{FileKind, SourceFile, ACCEPTED_FILE_TYPES};
