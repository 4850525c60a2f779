mod direction;
mod grammar;

pub use direction::{Direction, DirectionKeys, DirectionKeysError};
pub use grammar::{MotionGrammar, MotionParseError, parse};

use std::fmt;
use std::num::NonZeroU32;

/// How many times a motion repeats. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RepeatCount(NonZeroU32);

impl RepeatCount {
    pub const ONE: RepeatCount = RepeatCount(NonZeroU32::MIN);

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl Default for RepeatCount {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for RepeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated `(direction, count)` pair.
///
/// Only the grammar builds these, so holding a `Motion` means the text it came
/// from was valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Motion {
    direction: Direction,
    lines: RepeatCount,
}

impl Motion {
    fn new(direction: Direction, lines: RepeatCount) -> Self {
        Self { direction, lines }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn lines(&self) -> RepeatCount {
        self.lines
    }

    /// Canonical text for this motion, count omitted when it is one.
    pub fn format(&self, keys: &DirectionKeys) -> String {
        let key = keys.key(self.direction);
        if self.lines == RepeatCount::ONE {
            key.to_string()
        } else {
            format!("{}{}", self.lines, key)
        }
    }

    /// Line the cursor lands on when starting from `line` in a document of
    /// `line_count` lines. Horizontal motions stay on the same line.
    pub fn destination_line(&self, line: usize, line_count: usize) -> usize {
        let last = line_count.saturating_sub(1);
        let lines = self.lines.get() as usize;
        match self.direction {
            Direction::Down => line.saturating_add(lines).min(last),
            Direction::Up => line.saturating_sub(lines),
            Direction::Left | Direction::Right => line.min(last),
        }
    }
}

impl fmt::Display for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.direction, self.lines)
    }
}
