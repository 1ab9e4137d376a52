use crate::foundation::error::{MaskError, MaskResult};

pub use kurbo::Point;

/// Pixel dimensions of a bitmap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> MaskResult<Self> {
        if width == 0 || height == 0 {
            return Err(MaskError::validation(format!(
                "size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn area(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        self.area() * 4
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn longest_side(self) -> u32 {
        self.width.max(self.height)
    }

    /// Aspect-preserving size whose longest side is at most `max_side`.
    pub fn fit_within(self, max_side: u32) -> Size {
        let longest = self.longest_side();
        if longest <= max_side || longest == 0 {
            return self;
        }
        let scale = |v: u32| -> u32 {
            let scaled = (u64::from(v) * u64::from(max_side) + u64::from(longest) / 2)
                / u64::from(longest);
            (scaled as u32).max(1)
        };
        if self.width >= self.height {
            Size {
                width: max_side,
                height: scale(self.height),
            }
        } else {
            Size {
                width: scale(self.width),
                height: max_side,
            }
        }
    }

    pub fn full_rect(self) -> PixelRect {
        PixelRect {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        }
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Integer pixel coordinate. Signed because mapped pointer positions may fall off-canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

/// Half-open pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl PixelRect {
    pub fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    pub fn width(self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    pub fn height(self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    pub fn union(self, other: PixelRect) -> PixelRect {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        PixelRect {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Smallest pixel rectangle covering the float bounds, clipped to `size`.
    pub fn covering(min: Point, max: Point, size: Size) -> PixelRect {
        let clamp = |v: f64, hi: u32| -> u32 {
            if !v.is_finite() || v <= 0.0 {
                0
            } else {
                (v as u64).min(u64::from(hi)) as u32
            }
        };
        let rect = PixelRect {
            x0: clamp(min.x.floor(), size.width),
            y0: clamp(min.y.floor(), size.height),
            x1: clamp(max.x.ceil() + 1.0, size.width),
            y1: clamp(max.y.ceil() + 1.0, size.height),
        };
        if rect.is_empty() {
            PixelRect::default()
        } else {
            rect
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
