use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Direction a motion moves the cursor in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Down,
    Up,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Down,
        Direction::Up,
        Direction::Right,
    ];

    /// Name the host cursor-move command understands.
    pub fn to_name(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Down => "down",
            Direction::Up => "up",
            Direction::Right => "right",
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Direction::Down | Direction::Up)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionKeysError {
    #[error("Direction key for {direction} must be a single ASCII letter, got '{key}'")]
    NotALetter { direction: Direction, key: String },
    #[error("Direction key '{key}' is bound to both {first} and {second}")]
    Duplicate {
        key: char,
        first: Direction,
        second: Direction,
    },
}

/// The alphabet of direction letters, one distinct ASCII letter per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionKeys {
    left: char,
    down: char,
    up: char,
    right: char,
}

impl Default for DirectionKeys {
    fn default() -> Self {
        Self {
            left: 'h',
            down: 'j',
            up: 'k',
            right: 'l',
        }
    }
}

impl DirectionKeys {
    pub fn new(left: char, down: char, up: char, right: char) -> Result<Self, DirectionKeysError> {
        let keys = Self {
            left,
            down,
            up,
            right,
        };

        for (index, direction) in Direction::ALL.iter().enumerate() {
            let key = keys.key(*direction);
            if !key.is_ascii_alphabetic() {
                return Err(DirectionKeysError::NotALetter {
                    direction: *direction,
                    key: key.to_string(),
                });
            }
            if let Some(second) = Direction::ALL[index + 1..]
                .iter()
                .find(|other| keys.key(**other) == key)
            {
                return Err(DirectionKeysError::Duplicate {
                    key,
                    first: *direction,
                    second: *second,
                });
            }
        }

        Ok(keys)
    }

    pub fn key(&self, direction: Direction) -> char {
        match direction {
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Up => self.up,
            Direction::Right => self.right,
        }
    }

    pub fn direction(&self, key: char) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.key(*direction) == key)
    }

    /// The letters in `left, down, up, right` order, e.g. `hjkl`.
    pub fn letters(&self) -> String {
        Direction::ALL.iter().map(|d| self.key(*d)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_are_hjkl() {
        let keys = DirectionKeys::default();
        assert_eq!(keys.letters(), "hjkl");
        assert_eq!(keys.direction('j'), Some(Direction::Down));
        assert_eq!(keys.direction('k'), Some(Direction::Up));
        assert_eq!(keys.direction('J'), None);
    }

    #[test]
    fn test_custom_keys() {
        let keys = DirectionKeys::new('a', 's', 'w', 'd').unwrap();
        assert_eq!(keys.direction('w'), Some(Direction::Up));
        assert_eq!(keys.key(Direction::Right), 'd');
        assert_eq!(keys.direction('j'), None);
    }

    #[test]
    fn test_rejects_duplicate_keys() {
        let err = DirectionKeys::new('h', 'j', 'j', 'l').unwrap_err();
        assert_eq!(
            err,
            DirectionKeysError::Duplicate {
                key: 'j',
                first: Direction::Down,
                second: Direction::Up,
            }
        );
    }

    #[test]
    fn test_rejects_non_letters() {
        assert!(matches!(
            DirectionKeys::new('1', 'j', 'k', 'l'),
            Err(DirectionKeysError::NotALetter { direction: Direction::Left, .. })
        ));
    }
}
