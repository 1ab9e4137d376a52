use std::path::Path;

use anyhow::Context as _;
use kurbo::Point;

use crate::foundation::core::Size;
use crate::foundation::error::{MaskError, MaskResult};
use crate::raster::stroke::Tool;
use crate::session::editor::EditSession;
use crate::session::shortcuts::{InputContext, Key, KeyInput, resolve_shortcut};

/// Recorded editor input, replayable without a UI.
///
/// ```json
/// { "display": { "width": 500, "height": 400 },
///   "ops": [ { "op": "stroke", "tool": "brush", "radius": 30, "points": [[100, 100], [150, 150]] },
///            { "op": "undo" }, { "op": "redo" }, { "op": "clear" },
///            { "op": "key", "key": "e" } ] }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StrokeScript {
    pub display: Size,
    #[serde(default)]
    pub ops: Vec<ScriptOp>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    /// One pointer gesture. `tool` and `radius` change the brush before drawing and stay set.
    Stroke {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool: Option<Tool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        radius: Option<i64>,
        points: Vec<[f64; 2]>,
    },
    Undo,
    Redo,
    Clear,
    /// A key press routed through the shortcut table.
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        meta: bool,
        #[serde(default)]
        shift: bool,
    },
}

/// What a replay did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub strokes: usize,
    pub undos: usize,
    pub redos: usize,
    pub clears: usize,
    pub shortcuts: usize,
}

impl StrokeScript {
    pub fn from_json(text: &str) -> MaskResult<Self> {
        let script: Self = serde_json::from_str(text)
            .map_err(|e| MaskError::validation(format!("invalid stroke script: {e}")))?;
        Size::new(script.display.width, script.display.height)?;
        Ok(script)
    }

    pub fn from_path(path: &Path) -> MaskResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read stroke script '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Apply every op in order. A display size that differs from the session's reinitializes
    /// the session first.
    pub fn replay(&self, session: &mut EditSession) -> MaskResult<ReplayStats> {
        let display = Size::new(self.display.width, self.display.height)?;
        if session.display_size() != display {
            session.resize_display(display);
        }

        let mut stats = ReplayStats::default();
        for (i, op) in self.ops.iter().enumerate() {
            match op {
                ScriptOp::Stroke {
                    tool,
                    radius,
                    points,
                } => {
                    let Some((first, rest)) = points.split_first() else {
                        return Err(MaskError::validation(format!("op {i}: stroke has no points")));
                    };
                    if let Some(tool) = tool {
                        session.set_tool(*tool);
                    }
                    if let Some(radius) = radius {
                        session.set_radius(*radius);
                    }
                    session.begin_stroke(to_point(first))?;
                    for p in rest {
                        session.continue_stroke(to_point(p))?;
                    }
                    session.end_stroke()?;
                    stats.strokes += 1;
                }
                ScriptOp::Undo => {
                    session.undo()?;
                    stats.undos += 1;
                }
                ScriptOp::Redo => {
                    session.redo()?;
                    stats.redos += 1;
                }
                ScriptOp::Clear => {
                    session.clear()?;
                    stats.clears += 1;
                }
                ScriptOp::Key {
                    key,
                    ctrl,
                    meta,
                    shift,
                } => {
                    let key = Key::from_name(key).ok_or_else(|| {
                        MaskError::validation(format!("op {i}: unknown key '{key}'"))
                    })?;
                    let input = KeyInput {
                        key,
                        ctrl: *ctrl,
                        meta: *meta,
                        shift: *shift,
                    };
                    if let Some(action) = resolve_shortcut(&input, InputContext::default()) {
                        session.apply(action)?;
                        stats.shortcuts += 1;
                    }
                }
            }
        }
        tracing::debug!(?stats, "stroke script replayed");
        Ok(stats)
    }
}

fn to_point(p: &[f64; 2]) -> Point {
    Point::new(p[0], p[1])
}

#[cfg(test)]
#[path = "../../tests/unit/session/script.rs"]
mod tests;
