//! The narrow surface the crate needs from the editor it runs inside.

mod options;

pub use options::{EditorOption, LineNumbers, OptionKind};

use crate::dispose::Disposer;
use crate::motion::{Direction, Motion};
use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: Position,
    pub active: Position,
}

impl Selection {
    pub fn caret(position: Position) -> Self {
        Self {
            anchor: position,
            active: position,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.active
    }
}

/// Snapshot of the focused editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    pub cursor: Position,
    pub selection: Selection,
    pub line_count: usize,
}

/// Arguments of the host cursor-move command, mirroring [`Motion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub to: Direction,
    pub value: u32,
}

impl From<&Motion> for CursorMove {
    fn from(motion: &Motion) -> Self {
        Self {
            to: motion.direction(),
            value: motion.lines().get(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecorationId(pub u64);

#[async_trait(?Send)]
pub trait Editor {
    fn active_editor(&self) -> Option<EditorState>;
    async fn move_cursor(&self, movement: CursorMove) -> Result<()>;
}

pub trait Decorations {
    fn highlight_line(&self, line: usize) -> Result<DecorationId>;
    fn remove_highlight(&self, id: DecorationId) -> Result<()>;
}

pub struct InputBoxOptions<'a> {
    pub prompt: &'a str,
    pub placeholder: &'a str,
    /// Called on every edit. `None` means the text is valid.
    pub validate: &'a dyn Fn(&str) -> Option<String>,
}

#[async_trait(?Send)]
pub trait Window {
    /// Resolves to `None` when the user dismisses the box.
    async fn show_input_box(&self, options: InputBoxOptions<'_>) -> Option<String>;
    fn show_error_message(&self, message: &str);
}

pub trait Settings {
    fn option(&self, kind: OptionKind) -> EditorOption;
    fn set_option(&self, option: EditorOption) -> Result<()>;
}

pub trait Lifecycle {
    /// Everything in here is disposed when the host shuts the extension down.
    fn subscriptions(&self) -> &Disposer;
}

pub trait Host: Editor + Decorations + Window + Settings + Lifecycle {}

impl<T> Host for T where T: Editor + Decorations + Window + Settings + Lifecycle {}
