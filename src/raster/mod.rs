//! Display-resolution stroke rasterization.

/// The drawing surface.
pub mod bitmap;
/// Coverage compositing (paint over, punch through).
pub mod composite;
/// Brush state and segment rendering.
pub mod stroke;
