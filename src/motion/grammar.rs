use crate::motion::{Direction, DirectionKeys, Motion, RepeatCount};
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::{IntErrorKind, NonZeroU32};
use thiserror::Error;

// ASCII digits only, `\d` would also accept other Unicode digits.
static MOTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]*)([a-zA-Z])$").expect("motion pattern is a valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MotionParseError {
    #[error("Enter a motion, for example 10j")]
    Empty,
    #[error("Motion needs a direction, one of {keys}")]
    MissingDirection { keys: String },
    #[error("Unknown direction '{key}', expected one of {keys}")]
    UnknownDirection { key: char, keys: String },
    #[error("Count must be at least 1")]
    ZeroCount,
    #[error("Count {digits} is too large")]
    CountOverflow { digits: String },
    #[error("Unexpected '{found}' at position {position}")]
    UnexpectedCharacter { found: char, position: usize },
    #[error("Unexpected input after direction: '{0}'")]
    TrailingInput(String),
}

/// Parses motions against a direction alphabet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionGrammar {
    keys: DirectionKeys,
}

impl MotionGrammar {
    pub fn new(keys: DirectionKeys) -> Self {
        Self { keys }
    }

    pub fn keys(&self) -> &DirectionKeys {
        &self.keys
    }

    pub fn parse(&self, input: &str) -> Result<Motion, MotionParseError> {
        let Some(captures) = MOTION_PATTERN.captures(input) else {
            return Err(self.diagnose(input));
        };

        let digits = &captures[1];
        let key = captures[2]
            .chars()
            .next()
            .ok_or_else(|| self.missing_direction())?;

        let lines = parse_count(digits)?;
        let direction = self.direction(key)?;
        Ok(Motion::new(direction, lines))
    }

    fn direction(&self, key: char) -> Result<Direction, MotionParseError> {
        self.keys
            .direction(key)
            .ok_or_else(|| MotionParseError::UnknownDirection {
                key,
                keys: self.keys.letters(),
            })
    }

    fn missing_direction(&self) -> MotionParseError {
        MotionParseError::MissingDirection {
            keys: self.keys.letters(),
        }
    }

    /// Explains why `input` does not have the `<digits><letter>` shape.
    fn diagnose(&self, input: &str) -> MotionParseError {
        if input.is_empty() {
            return MotionParseError::Empty;
        }

        let digits_end = input
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(input.len());
        let rest = &input[digits_end..];

        let mut chars = rest.chars();
        match chars.next() {
            None => self.missing_direction(),
            // digits are ASCII, so the byte offset is also the char position
            Some(found) if !found.is_ascii_alphabetic() => MotionParseError::UnexpectedCharacter {
                found,
                position: digits_end,
            },
            Some(_) => MotionParseError::TrailingInput(chars.as_str().to_string()),
        }
    }
}

fn parse_count(digits: &str) -> Result<RepeatCount, MotionParseError> {
    if digits.is_empty() {
        return Ok(RepeatCount::ONE);
    }

    let count = digits.parse::<u32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => MotionParseError::CountOverflow {
            digits: digits.to_string(),
        },
        _ => MotionParseError::UnexpectedCharacter {
            found: digits.chars().next().unwrap_or_default(),
            position: 0,
        },
    })?;

    NonZeroU32::new(count)
        .map(RepeatCount)
        .ok_or(MotionParseError::ZeroCount)
}

/// Parses a motion using the default `hjkl` alphabet.
pub fn parse(input: &str) -> Result<Motion, MotionParseError> {
    MotionGrammar::default().parse(input)
}
