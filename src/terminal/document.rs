use crate::host::{CursorMove, Position};
use crate::motion::Direction;
use anyhow::{Context, Result};
use std::path::Path;

/// Lines of text plus a cursor. Columns count chars.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<String>,
    cursor: Position,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_text("")
    }
}

impl Document {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            cursor: Position::default(),
        }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |text| text.chars().count())
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let value = movement.value as usize;
        let Position { line, column } = self.cursor;
        self.cursor = match movement.to {
            Direction::Up => Position::new(line.saturating_sub(value), column),
            Direction::Down => Position::new(
                line.saturating_add(value)
                    .min(self.line_count().saturating_sub(1)),
                column,
            ),
            Direction::Left => Position::new(line, column.saturating_sub(value)),
            Direction::Right => Position::new(line, column.saturating_add(value)),
        };

        let max_column = self.line_len(self.cursor.line).saturating_sub(1);
        self.cursor.column = self.cursor.column.min(max_column);
    }
}
