//! The crop session: one loaded image, a pending selection and the ordered
//! list of committed crops.
//!
//! # Contract
//!
//! Precondition misses are silent no-ops. Committing without an image, with
//! an empty selection or with a duplicate of an existing crop leaves the
//! session untouched and reports why through [`CommitOutcome`]. Navigating
//! past either end of the list, or deleting the crop under the cursor at the
//! end of the list, raises the "no more images" flag instead of failing.
//!
//! Only genuine failures (an undecodable file, an encoder error, a sink that
//! refuses a file) surface as [`CropError`].

use thiserror::Error;

use crate::config::SessionConfig;
use crate::decode::{decode_image, DecodeError};
use crate::download::{crop_file_name, FileSink, SinkError, GEOMETRY_FILE_NAME, GEOMETRY_MIME_TYPE};
use crate::export::{export_geometry, to_json, CropSummary, GeometryRecord};
use crate::geometry::{CropCoordinates, ImageHandle, SelectionRect, SurfaceMetrics};
use crate::raster::{ImageRasterEngine, OutputSize, RasterEngine, RasterError};
use crate::source::{FileKind, SourceFile};

/// Identifier of a committed crop, unique within a session.
pub type CropId = u32;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("Failed to load image: {0}")]
    Decode(#[from] DecodeError),

    #[error("Failed to render crop: {0}")]
    Raster(#[from] RasterError),

    #[error("Failed to serialize geometry: {0}")]
    Export(#[from] serde_json::Error),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// A committed, immutable crop.
#[derive(Debug, Clone, PartialEq)]
pub struct CropResult {
    id: CropId,
    raster_output: Vec<u8>,
    mime_type: &'static str,
    coordinates: CropCoordinates,
}

impl CropResult {
    pub fn id(&self) -> CropId {
        self.id
    }

    /// Encoded pixels of the crop.
    pub fn raster_output(&self) -> &[u8] {
        &self.raster_output
    }

    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// Corners in displayed units.
    pub fn coordinates(&self) -> &CropCoordinates {
        &self.coordinates
    }

    pub fn geometry(&self) -> GeometryRecord {
        GeometryRecord::new(self.id, &self.coordinates)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// What a call to [`CropSession::commit_crop`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new crop was appended with this id.
    Committed(CropId),
    /// The rendered bytes matched an existing crop; nothing changed.
    Duplicate,
    /// No image is loaded; nothing changed.
    NoImage,
    /// The selection has no area inside the image; nothing changed.
    EmptySelection,
}

impl CommitOutcome {
    pub fn is_committed(self) -> bool {
        matches!(self, CommitOutcome::Committed(_))
    }
}

pub struct CropSession<E = ImageRasterEngine> {
    config: SessionConfig,
    engine: E,
    image: Option<ImageHandle>,
    selection: SelectionRect,
    results: Vec<CropResult>,
    next_id: CropId,
    selected: Option<usize>,
    no_more_images: bool,
}

impl CropSession<ImageRasterEngine> {
    /// An empty session rendering with the `image`-crate rasterizer.
    pub fn new(config: SessionConfig) -> Self {
        let engine = config.raster_engine();
        Self::with_engine(config, engine)
    }
}

impl Default for CropSession<ImageRasterEngine> {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl<E: RasterEngine> CropSession<E> {
    /// An empty session rendering through `engine`.
    pub fn with_engine(config: SessionConfig, engine: E) -> Self {
        Self {
            config: config.validated(),
            engine,
            image: None,
            selection: SelectionRect::default(),
            results: Vec::new(),
            next_id: 1,
            selected: None,
            no_more_images: false,
        }
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Discard all state and load a new source image.
    ///
    /// The session is reset before decoding, so a file that fails to decode
    /// leaves an empty session behind.
    pub fn load_image(&mut self, file: &SourceFile) -> Result<(), CropError> {
        self.reset();

        match file.kind() {
            FileKind::Image => {}
            FileKind::Json => log::warn!("{} is a geometry file, not an image", file.name),
            FileKind::Unsupported => log::warn!("{} has an unexpected extension", file.name),
        }

        let image = decode_image(&file.bytes).map_err(|e| {
            log::warn!("Could not decode {}: {}", file.name, e);
            e
        })?;

        log::debug!(
            "Loaded {} ({}x{})",
            file.name,
            image.width,
            image.height
        );
        self.image = Some(ImageHandle::new(file.name.clone(), image));
        Ok(())
    }

    /// Record the size the surface displays the image at.
    ///
    /// Returns false when no image is loaded or the size is unusable.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> bool {
        let Some(handle) = self.image.as_mut() else {
            log::trace!("Ignoring display size without an image");
            return false;
        };

        let accepted = handle.set_display_size(width, height);
        if accepted {
            log::debug!("Image displayed at {width}x{height}");
        } else {
            log::warn!("Ignoring display size {width}x{height}");
        }
        accepted
    }

    /// Apply the layout the surface reports after showing the image.
    pub fn attach_surface(&mut self, metrics: SurfaceMetrics) -> bool {
        if let Some(handle) = &self.image {
            let natural = (handle.natural_width() as f64, handle.natural_height() as f64);
            if natural != (metrics.natural_width, metrics.natural_height) {
                log::warn!(
                    "Surface reports natural size {}x{}, decoded {}x{}",
                    metrics.natural_width,
                    metrics.natural_height,
                    natural.0,
                    natural.1
                );
            }
        }
        self.set_display_size(metrics.width, metrics.height)
    }

    /// Return to the state of a freshly constructed session.
    pub fn reset(&mut self) {
        if let Some(handle) = self.image.take() {
            log::debug!("Releasing {}", handle.name());
        }
        self.selection = SelectionRect::default();
        self.results.clear();
        self.results.shrink_to_fit();
        self.next_id = 1;
        self.selected = None;
        self.no_more_images = false;
    }

    // ------------------------------------------------------------------
    // Selection and commit
    // ------------------------------------------------------------------

    /// Replace the pending selection.
    pub fn update_selection(&mut self, selection: SelectionRect) {
        self.selection = selection;
    }

    /// Render the pending selection and append it to the result list.
    pub fn commit_crop(&mut self) -> Result<CommitOutcome, CropError> {
        let Some(handle) = &self.image else {
            log::trace!("Commit ignored: no image loaded");
            return Ok(CommitOutcome::NoImage);
        };

        let (display_width, display_height) = handle.display_size();
        let rect = self.selection.to_display_px(display_width, display_height);
        if rect.is_empty() {
            log::trace!("Commit ignored: empty selection");
            return Ok(CommitOutcome::EmptySelection);
        }

        let region = handle.to_native(&rect);
        let output = OutputSize::from_selection(&rect, self.config.device_pixel_ratio);

        let raster_output = match self.engine.rasterize(handle.image(), &region, output) {
            Ok(bytes) => bytes,
            Err(e) if e.is_empty() => {
                log::trace!("Commit ignored: {e}");
                return Ok(CommitOutcome::EmptySelection);
            }
            Err(e) => {
                log::warn!("Crop rendering failed: {e}");
                return Err(e.into());
            }
        };

        if self
            .results
            .iter()
            .any(|existing| existing.raster_output == raster_output)
        {
            log::debug!("Discarding duplicate crop");
            return Ok(CommitOutcome::Duplicate);
        }

        let id = self.next_id;
        self.results.push(CropResult {
            id,
            raster_output,
            mime_type: self.engine.mime_type(),
            coordinates: rect.coordinates(),
        });
        self.next_id += 1;

        if self.selected.is_none() {
            self.selected = Some(0);
        }

        log::debug!(
            "Committed crop {id}: native {:.1},{:.1} {:.1}x{:.1} -> {}x{}",
            region.x,
            region.y,
            region.width,
            region.height,
            output.width,
            output.height
        );
        Ok(CommitOutcome::Committed(id))
    }

    // ------------------------------------------------------------------
    // Navigation and deletion
    // ------------------------------------------------------------------

    /// Move the cursor one step. Returns false, and raises the "no more
    /// images" flag, when there is nothing in that direction.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        let target = self.selected.and_then(|index| match direction {
            Direction::Previous => index.checked_sub(1),
            Direction::Next => Some(index + 1).filter(|&next| next < self.results.len()),
        });

        match target {
            Some(index) => {
                self.selected = Some(index);
                self.no_more_images = false;
                true
            }
            None => {
                log::trace!("No more images {direction:?}");
                self.no_more_images = true;
                false
            }
        }
    }

    /// Remove the crop with `id`. Returns false when no such crop exists.
    pub fn delete_result(&mut self, id: CropId) -> bool {
        let before = self.results.len();
        self.results.retain(|result| result.id != id);
        let removed = self.results.len() != before;

        if let Some(index) = self.selected {
            if index >= self.results.len() {
                self.selected = self.results.len().checked_sub(1);
                self.no_more_images = true;
            }
        }

        if removed {
            log::debug!("Deleted crop {id}");
        }
        removed
    }

    /// Remove the crop under the cursor.
    pub fn delete_current(&mut self) -> bool {
        match self.current().map(CropResult::id) {
            Some(id) => self.delete_result(id),
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Export and download
    // ------------------------------------------------------------------

    /// Geometry of every crop, in stored order.
    pub fn export_geometry(&self) -> Vec<GeometryRecord> {
        export_geometry(&self.results)
    }

    /// Geometry export as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, CropError> {
        Ok(to_json(&self.export_geometry())?)
    }

    /// Save the crop under the cursor. Returns false when there is none.
    pub fn download_current(&self, sink: &mut impl FileSink) -> Result<bool, CropError> {
        let Some(current) = self.current() else {
            return Ok(false);
        };

        let name = crop_file_name(current.id);
        sink.emit(&name, current.mime_type, &current.raster_output)?;
        log::debug!("Saved {name}");
        Ok(true)
    }

    /// Save the geometry export file.
    pub fn export_to(&self, sink: &mut impl FileSink) -> Result<(), CropError> {
        let json = self.export_json()?;
        sink.emit(GEOMETRY_FILE_NAME, GEOMETRY_MIME_TYPE, json.as_bytes())?;
        log::debug!("Saved {GEOMETRY_FILE_NAME} with {} crops", self.results.len());
        Ok(())
    }

    // ------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn image(&self) -> Option<&ImageHandle> {
        self.image.as_ref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn selection(&self) -> &SelectionRect {
        &self.selection
    }

    pub fn results(&self) -> &[CropResult] {
        &self.results
    }

    /// Index of the crop under the cursor; `None` when the list is empty.
    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn current(&self) -> Option<&CropResult> {
        self.selected.and_then(|index| self.results.get(index))
    }

    /// Details for the crop under the cursor.
    pub fn current_summary(&self) -> Option<CropSummary> {
        let index = self.selected?;
        let result = self.results.get(index)?;
        Some(CropSummary {
            position: index + 1,
            record: result.geometry(),
        })
    }

    pub fn no_more_images(&self) -> bool {
        self.no_more_images
    }

    /// Id the next committed crop will receive.
    pub fn next_id(&self) -> CropId {
        self.next_id
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::decode::DecodedImage;
    use crate::encode::encode_png;
    use crate::geometry::NativeRegion;
    use proptest::prelude::*;

    /// Deterministic engine: identical regions give identical bytes.
    struct RegionEngine;

    impl RasterEngine for RegionEngine {
        fn rasterize(
            &self,
            _source: &DecodedImage,
            region: &NativeRegion,
            _output: OutputSize,
        ) -> Result<Vec<u8>, RasterError> {
            Ok(format!("{}:{}:{}:{}", region.x, region.y, region.width, region.height).into_bytes())
        }

        fn mime_type(&self) -> &'static str {
            "test/raw"
        }
    }

    #[derive(Debug, Clone)]
    enum Op {
        Commit(u8, u8),
        Delete(CropId),
        DeleteCurrent,
        Previous,
        Next,
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (0u8..6, 0u8..6).prop_map(|(x, y)| Op::Commit(x, y)),
            1 => (1u32..12).prop_map(Op::Delete),
            1 => Just(Op::DeleteCurrent),
            2 => Just(Op::Previous),
            2 => Just(Op::Next),
        ]
    }

    fn loaded_session() -> CropSession<RegionEngine> {
        let mut session = CropSession::with_engine(SessionConfig::default(), RegionEngine);
        let png = encode_png(&[90u8; 16 * 16 * 3], 16, 16).unwrap();
        session.load_image(&SourceFile::new("p.png", png)).unwrap();
        session
    }

    proptest! {
        /// Ids strictly increase, the cursor stays in bounds, and no two
        /// results share raster bytes.
        #[test]
        fn prop_session_invariants(ops in prop::collection::vec(op_strategy(), 0..40)) {
            let mut session = loaded_session();

            for op in ops {
                let before: Vec<CropId> = session.results().iter().map(CropResult::id).collect();
                match op {
                    Op::Commit(x, y) => {
                        session.update_selection(SelectionRect::px(x as f64, y as f64, 4.0, 4.0));
                        let next = session.next_id();
                        match session.commit_crop().unwrap() {
                            CommitOutcome::Committed(id) => {
                                prop_assert_eq!(id, next);
                                prop_assert_eq!(session.results().len(), before.len() + 1);
                            }
                            CommitOutcome::Duplicate => {
                                prop_assert_eq!(session.next_id(), next);
                                prop_assert_eq!(session.results().len(), before.len());
                            }
                            other => prop_assert!(false, "unexpected outcome {:?}", other),
                        }
                    }
                    Op::Delete(id) => { session.delete_result(id); }
                    Op::DeleteCurrent => { session.delete_current(); }
                    Op::Previous => { session.navigate(Direction::Previous); }
                    Op::Next => { session.navigate(Direction::Next); }
                }

                let ids: Vec<CropId> = session.results().iter().map(CropResult::id).collect();
                prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
                prop_assert!(ids.iter().all(|&id| id < session.next_id()));

                // Existing results keep their relative order
                let kept: Vec<CropId> = before.iter().copied().filter(|id| ids.contains(id)).collect();
                prop_assert_eq!(&kept[..], &ids[..kept.len()]);

                match session.selected_index() {
                    Some(index) => prop_assert!(index < ids.len()),
                    None => prop_assert!(ids.is_empty()),
                }

                let outputs: Vec<&[u8]> = session.results().iter().map(CropResult::raster_output).collect();
                for (i, a) in outputs.iter().enumerate() {
                    for b in &outputs[i + 1..] {
                        prop_assert_ne!(a, b);
                    }
                }
            }
        }

        /// Exporting twice without mutation yields identical output.
        #[test]
        fn prop_export_idempotent(rects in prop::collection::vec((0u8..20, 0u8..20, 1u8..20, 1u8..20), 0..10)) {
            let mut session = loaded_session();
            for (x, y, w, h) in rects {
                session.update_selection(SelectionRect::px(x as f64 + 0.125, y as f64, w as f64, h as f64));
                session.commit_crop().unwrap();
            }

            let first = session.export_json().unwrap();
            let second = session.export_json().unwrap();
            prop_assert_eq!(first, second);
            prop_assert_eq!(session.export_geometry().len(), session.results().len());
        }
    }
}
