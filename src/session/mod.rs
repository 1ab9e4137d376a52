//! Interactive editing: one session per source image.

/// The stateful editor.
pub mod editor;
/// Headless replay of recorded input.
pub mod script;
/// Keyboard shortcut resolution.
pub mod shortcuts;
