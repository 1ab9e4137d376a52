/// Tunables loaded from JSON and the environment.
pub mod config;
/// Sizes, points and pixel rectangles.
pub mod core;
/// Error taxonomy.
pub mod error;
pub(crate) mod math;
