use kurbo::Point;

use crate::assets::source::SourceImage;
use crate::foundation::config::MaskwrightConfig;
use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::MaskResult;
use crate::geometry::mapper::{resample_mask_region, target_region_for};
use crate::history::stack::{History, HistoryEntry};
use crate::mask::synth::{MaskStats, WorkingMask, synthesize};
use crate::raster::bitmap::DisplayBitmap;
use crate::raster::composite::CompositeMode;
use crate::raster::stroke::{BrushState, StrokeRasterizer, Tool};
use crate::session::shortcuts::EditorAction;
use crate::submit::backend::{EditBackend, EditResponse};
use crate::submit::request::{EditParams, EditRequest, build_edit_request};

/// Mode and radius are fixed when a stroke starts; tool changes apply to the next stroke.
#[derive(Clone, Copy, Debug)]
struct ActiveStroke {
    mode: CompositeMode,
    radius: u32,
    last: Point,
}

/// One source image being masked.
///
/// Owns the display bitmap, the full-resolution working mask derived from it, the undo
/// history and the brush. Points passed to the stroke methods are in display pixels.
#[derive(Debug)]
pub struct EditSession {
    source: SourceImage,
    config: MaskwrightConfig,
    brush: BrushState,
    display: DisplayBitmap,
    mask: WorkingMask,
    mask_stale: bool,
    history: History,
    rasterizer: StrokeRasterizer,
    stroke: Option<ActiveStroke>,
}

impl EditSession {
    pub fn new(source: SourceImage, display_size: Size, config: MaskwrightConfig) -> Self {
        let brush = BrushState::new(Tool::Brush, i64::from(config.default_brush_radius));
        let mask = WorkingMask::opaque(source.size());
        let history = History::with_limit(config.max_history_entries);
        Self {
            source,
            config,
            brush,
            display: DisplayBitmap::new(display_size),
            mask,
            mask_stale: false,
            history,
            rasterizer: StrokeRasterizer::new(),
            stroke: None,
        }
    }

    pub fn source(&self) -> &SourceImage {
        &self.source
    }

    pub fn config(&self) -> &MaskwrightConfig {
        &self.config
    }

    pub fn display(&self) -> &DisplayBitmap {
        &self.display
    }

    pub fn display_size(&self) -> Size {
        self.display.size()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Start over on a drawing surface of a new size. Drops strokes and history.
    pub fn resize_display(&mut self, size: Size) {
        tracing::debug!(from = %self.display.size(), to = %size, "reinitializing display");
        self.display = DisplayBitmap::new(size);
        self.mask = WorkingMask::opaque(self.source.size());
        self.mask_stale = false;
        self.history.reset();
        self.stroke = None;
    }

    pub fn brush(&self) -> BrushState {
        self.brush
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.brush.set_tool(tool);
    }

    /// Clamped to `[1, 500]`.
    pub fn set_radius(&mut self, radius: i64) {
        self.brush.set_radius(radius);
    }

    pub fn apply(&mut self, action: EditorAction) -> MaskResult<()> {
        match action {
            EditorAction::SelectTool(tool) => self.set_tool(tool),
            EditorAction::SetRadius(r) => self.set_radius(i64::from(r)),
            EditorAction::Undo => {
                self.undo()?;
            }
            EditorAction::Redo => {
                self.redo()?;
            }
            EditorAction::ClearMask => self.clear()?,
        }
        Ok(())
    }

    pub fn is_stroking(&self) -> bool {
        self.stroke.is_some()
    }

    /// Pointer down. Stamps a dot at `point`, then records the pre-stroke state for undo.
    pub fn begin_stroke(&mut self, point: Point) -> MaskResult<()> {
        if self.stroke.is_some() {
            self.end_stroke()?;
        }
        let snapshot = self.display.clone();
        let stroke = ActiveStroke {
            mode: self.brush.tool().composite_mode(),
            radius: self.brush.radius(),
            last: point,
        };
        // History and stroke state only change once the first dab lands.
        if let Err(err) = self.draw(stroke, point) {
            self.display = snapshot;
            self.mask_stale = true;
            return Err(err);
        }
        self.history.push(HistoryEntry::Draw { snapshot });
        self.stroke = Some(stroke);
        Ok(())
    }

    /// Pointer move. Ignored when no stroke is active.
    pub fn continue_stroke(&mut self, point: Point) -> MaskResult<()> {
        let Some(stroke) = self.stroke else {
            return Ok(());
        };
        self.draw(stroke, point)?;
        if let Some(s) = self.stroke.as_mut() {
            s.last = point;
        }
        Ok(())
    }

    /// Pointer up. Seals the history entry and re-derives the whole working mask.
    pub fn end_stroke(&mut self) -> MaskResult<()> {
        if self.stroke.take().is_none() {
            return Ok(());
        }
        self.history.seal(self.display.clone())?;
        self.refresh_mask()
    }

    pub fn undo(&mut self) -> MaskResult<bool> {
        self.end_stroke()?;
        let Some(entry) = self.history.undo() else {
            return Ok(false);
        };
        entry.apply_to(&mut self.display)?;
        self.mask_stale = true;
        tracing::debug!(index = self.history.index(), "undo");
        Ok(true)
    }

    pub fn redo(&mut self) -> MaskResult<bool> {
        self.end_stroke()?;
        let Some(entry) = self.history.redo() else {
            return Ok(false);
        };
        entry.apply_to(&mut self.display)?;
        self.mask_stale = true;
        tracing::debug!(index = self.history.index(), "redo");
        Ok(true)
    }

    /// Erase every stroke. Undoable.
    pub fn clear(&mut self) -> MaskResult<()> {
        self.end_stroke()?;
        self.history.push(HistoryEntry::Clear);
        self.display.clear();
        self.mask_stale = true;
        tracing::debug!(index = self.history.index(), "mask cleared");
        Ok(())
    }

    /// Full-resolution mask for the current display contents.
    pub fn working_mask(&mut self) -> MaskResult<&WorkingMask> {
        if self.mask_stale {
            self.refresh_mask()?;
        }
        Ok(&self.mask)
    }

    pub fn mask_stats(&mut self) -> MaskResult<MaskStats> {
        Ok(self.working_mask()?.stats())
    }

    /// Finish any open stroke and package the current mask for the backend.
    pub fn build_request(&mut self, prompt: &str, params: EditParams) -> MaskResult<EditRequest> {
        self.end_stroke()?;
        if self.mask_stale {
            self.refresh_mask()?;
        }
        build_edit_request(&self.source, &self.mask, prompt, params, &self.config)
    }

    /// Build the request and hand it to `backend`. Nothing reaches the backend when
    /// validation fails.
    pub fn submit<B: EditBackend + ?Sized>(
        &mut self,
        backend: &mut B,
        prompt: &str,
        params: EditParams,
    ) -> MaskResult<EditResponse> {
        let request = self.build_request(prompt, params)?;
        let response = backend.edit(&request)?;
        tracing::debug!(images = response.data.len(), "edit backend responded");
        Ok(response)
    }

    fn draw(&mut self, stroke: ActiveStroke, to: Point) -> MaskResult<()> {
        let region = self.rasterizer.draw_segment(
            &mut self.display,
            stroke.last,
            to,
            stroke.radius,
            stroke.mode,
        )?;
        self.update_mask_region(region)
    }

    /// Live preview: recompute only the mask pixels fed by `region` of the display.
    fn update_mask_region(&mut self, region: PixelRect) -> MaskResult<()> {
        if self.mask_stale {
            return self.refresh_mask();
        }
        let target = self.source.size();
        let target_region = target_region_for(region, self.display.size(), target);
        resample_mask_region(
            self.display.data(),
            self.display.size(),
            self.mask.data_mut(),
            target,
            target_region,
        )
    }

    fn refresh_mask(&mut self) -> MaskResult<()> {
        self.mask = synthesize(&self.display, self.source.size())?;
        self.mask_stale = false;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor.rs"]
mod tests;
