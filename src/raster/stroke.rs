use kurbo::{BezPath, Circle, Point, Shape as _, Vec2};

use crate::foundation::core::{PixelRect, Size};
use crate::foundation::error::{MaskError, MaskResult};
use crate::raster::bitmap::DisplayBitmap;
use crate::raster::composite::{CompositeMode, composite_coverage_in_place};

pub const MIN_BRUSH_RADIUS: u32 = 1;
pub const MAX_BRUSH_RADIUS: u32 = 500;
pub const DEFAULT_BRUSH_RADIUS: u32 = 20;

const PATH_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Brush,
    Eraser,
}

impl Tool {
    pub fn composite_mode(self) -> CompositeMode {
        match self {
            Tool::Brush => CompositeMode::PaintOver,
            Tool::Eraser => CompositeMode::PunchThrough,
        }
    }
}

/// Active tool and radius for an editing session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrushState {
    tool: Tool,
    radius: u32,
}

impl Default for BrushState {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            radius: DEFAULT_BRUSH_RADIUS,
        }
    }
}

impl BrushState {
    pub fn new(tool: Tool, radius: i64) -> Self {
        Self {
            tool,
            radius: clamp_radius(radius),
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn radius(&self) -> u32 {
        self.radius
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Zero and negative radii clamp to [`MIN_BRUSH_RADIUS`].
    pub fn set_radius(&mut self, radius: i64) {
        self.radius = clamp_radius(radius);
    }

    /// Stroke width in display pixels.
    pub fn line_width(&self) -> f64 {
        f64::from(self.radius) * 2.0
    }
}

fn clamp_radius(radius: i64) -> u32 {
    radius.clamp(i64::from(MIN_BRUSH_RADIUS), i64::from(MAX_BRUSH_RADIUS)) as u32
}

/// Fill shapes whose union is a round-capped segment from `a` to `b`.
///
/// Each shape is filled on its own so overlapping windings never cancel.
pub fn segment_shapes(a: Point, b: Point, radius: f64) -> Vec<BezPath> {
    let mut shapes = vec![Circle::new(a, radius).to_path(PATH_TOLERANCE)];

    let d = b - a;
    let len = d.hypot();
    if len > f64::EPSILON {
        shapes.push(Circle::new(b, radius).to_path(PATH_TOLERANCE));

        let n = Vec2::new(-d.y / len, d.x / len) * radius;
        let mut quad = BezPath::new();
        quad.move_to(a + n);
        quad.line_to(b + n);
        quad.line_to(b - n);
        quad.line_to(a - n);
        quad.close_path();
        shapes.push(quad);
    }
    shapes
}

/// Pixel rectangle a segment can touch, clipped to `size`.
pub fn segment_region(a: Point, b: Point, radius: f64, size: Size) -> PixelRect {
    let min = Point::new(a.x.min(b.x) - radius, a.y.min(b.y) - radius);
    let max = Point::new(a.x.max(b.x) + radius, a.y.max(b.y) + radius);
    PixelRect::covering(min, max, size)
}

/// Rasterizes stroke segments into a [`DisplayBitmap`].
///
/// Coverage is rendered with `vello_cpu` into a scratch pixmap, then composited with the
/// tool's [`CompositeMode`]. The render context and scratch pixmap are reused while the
/// bitmap size stays the same.
#[derive(Default)]
pub struct StrokeRasterizer {
    ctx: Option<vello_cpu::RenderContext>,
    scratch: Option<Scratch>,
}

struct Scratch {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
}

impl std::fmt::Debug for StrokeRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrokeRasterizer")
            .field("has_ctx", &self.ctx.is_some())
            .field("has_scratch", &self.scratch.is_some())
            .finish()
    }
}

impl StrokeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw one segment and return the display region it may have changed.
    ///
    /// A zero-length segment (`a == b`) stamps a single disc.
    pub fn draw_segment(
        &mut self,
        bitmap: &mut DisplayBitmap,
        a: Point,
        b: Point,
        radius: u32,
        mode: CompositeMode,
    ) -> MaskResult<PixelRect> {
        let size = bitmap.size();
        let radius = f64::from(radius.max(MIN_BRUSH_RADIUS));
        let region = segment_region(a, b, radius, size);
        if region.is_empty() {
            return Ok(region);
        }

        let width: u16 = size
            .width
            .try_into()
            .map_err(|_| MaskError::raster("display width exceeds u16"))?;
        let height: u16 = size
            .height
            .try_into()
            .map_err(|_| MaskError::raster("display height exceeds u16"))?;

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();

        let mut scratch = match self.scratch.take() {
            Some(s) if s.width == width && s.height == height => s,
            _ => Scratch {
                width,
                height,
                pixmap: vello_cpu::Pixmap::new(width, height),
            },
        };
        scratch.pixmap.data_as_u8_slice_mut().fill(0);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
        for shape in segment_shapes(a, b, radius) {
            ctx.fill_path(&bezpath_to_cpu(&shape));
        }
        ctx.flush();
        ctx.render_to_pixmap(&mut scratch.pixmap);

        let out = composite_coverage_in_place(
            bitmap.data_mut(),
            scratch.pixmap.data_as_u8_slice(),
            size,
            region,
            mode,
        );

        self.ctx = Some(ctx);
        self.scratch = Some(scratch);
        out.map(|()| region)
    }
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/raster/stroke.rs"]
mod tests;
