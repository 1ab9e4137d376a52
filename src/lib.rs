//! Maskwright authors inpainting masks for image-edit backends.
//!
//! Freehand strokes are drawn on a display-resolution bitmap over a source image, then
//! resampled into a binary, full-resolution mask: transparent pixels mark the region to
//! regenerate, opaque black pixels are preserved. The mask, the source image and the edit
//! parameters are then packaged into a multipart request for the backend.
//!
//! - Load a [`SourceImage`]
//! - Draw into an [`EditSession`] (or replay a [`StrokeScript`])
//! - Build an [`EditRequest`] or [`EditSession::submit`] it to an [`EditBackend`]
#![forbid(unsafe_code)]

/// Upload validation and decoding.
pub mod assets;
/// Configuration, core types and errors.
pub mod foundation;
/// Coordinate mapping and mask resampling.
pub mod geometry;
/// Undo/redo history.
pub mod history;
/// Full-resolution mask synthesis.
pub mod mask;
/// Stroke rasterization.
pub mod raster;
/// Editing sessions, shortcuts and stroke scripts.
pub mod session;
/// Edit request packaging and the backend seam.
pub mod submit;

pub use crate::assets::source::{SourceFormat, SourceImage};
pub use crate::foundation::config::MaskwrightConfig;
pub use crate::foundation::core::{PixelPoint, PixelRect, Point, Size};
pub use crate::foundation::error::{MaskError, MaskResult};
pub use crate::geometry::mapper::{map_point, map_point_clamped, resample_mask};
pub use crate::history::stack::{History, HistoryEntry};
pub use crate::mask::synth::{MaskStats, WorkingMask, synthesize};
pub use crate::raster::bitmap::DisplayBitmap;
pub use crate::raster::stroke::{BrushState, Tool};
pub use crate::session::editor::EditSession;
pub use crate::session::script::{ReplayStats, ScriptOp, StrokeScript};
pub use crate::session::shortcuts::{EditorAction, InputContext, Key, KeyInput, resolve_shortcut};
pub use crate::submit::backend::{EditBackend, EditResponse, GeneratedImage};
pub use crate::submit::request::{
    EditParams, EditRequest, ImageSize, OutputFormat, Quality, build_edit_request,
};
