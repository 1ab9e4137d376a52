use crate::raster::stroke::Tool;

/// Radius step for the digit shortcuts: `1` is 5 px, `9` is 45 px.
pub const RADIUS_STEP: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Delete,
    Backspace,
    Escape,
}

impl Key {
    /// Parse a DOM-style key name (`"z"`, `"Delete"`, `"Backspace"`, `"Escape"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Delete" | "Del" => Some(Self::Delete),
            "Backspace" => Some(Self::Backspace),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(Self::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// A key press with its modifier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyInput {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

impl KeyInput {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            meta: false,
            shift: false,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.meta = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Ctrl on most platforms, Cmd on macOS.
    fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Where keyboard focus currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputContext {
    pub text_input_focused: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorAction {
    SelectTool(Tool),
    SetRadius(u32),
    Undo,
    Redo,
    ClearMask,
}

/// Map a key press to an editor action.
///
/// Nothing resolves while a text field has focus, so typing a prompt never paints or clears.
pub fn resolve_shortcut(input: &KeyInput, context: InputContext) -> Option<EditorAction> {
    if context.text_input_focused {
        return None;
    }

    if input.command() {
        return match input.key {
            Key::Char(c) => match c.to_ascii_lowercase() {
                'z' if input.shift => Some(EditorAction::Redo),
                'z' => Some(EditorAction::Undo),
                'y' => Some(EditorAction::Redo),
                _ => None,
            },
            _ => None,
        };
    }

    match input.key {
        Key::Char(c) => match c.to_ascii_lowercase() {
            'b' => Some(EditorAction::SelectTool(Tool::Brush)),
            'e' => Some(EditorAction::SelectTool(Tool::Eraser)),
            d @ '1'..='9' => d
                .to_digit(10)
                .map(|n| EditorAction::SetRadius(n * RADIUS_STEP)),
            _ => None,
        },
        Key::Delete | Key::Backspace => Some(EditorAction::ClearMask),
        Key::Escape => None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/shortcuts.rs"]
mod tests;
