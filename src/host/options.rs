use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineNumbers {
    Off,
    #[default]
    Absolute,
    Relative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    LineNumbers,
    CursorSurroundingLines,
}

/// An editor option together with its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOption {
    LineNumbers(LineNumbers),
    CursorSurroundingLines(u32),
}

impl EditorOption {
    pub fn kind(&self) -> OptionKind {
        match self {
            EditorOption::LineNumbers(_) => OptionKind::LineNumbers,
            EditorOption::CursorSurroundingLines(_) => OptionKind::CursorSurroundingLines,
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::LineNumbers => f.write_str("line numbers"),
            OptionKind::CursorSurroundingLines => f.write_str("cursor surrounding lines"),
        }
    }
}

impl fmt::Display for EditorOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorOption::LineNumbers(mode) => write!(f, "line numbers = {mode:?}"),
            EditorOption::CursorSurroundingLines(lines) => {
                write!(f, "cursor surrounding lines = {lines}")
            }
        }
    }
}
