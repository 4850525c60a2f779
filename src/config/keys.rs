use crate::motion::{Direction, DirectionKeys, DirectionKeysError};
use serde::{Deserialize, Serialize};

/// `[keys]` table, one single-letter string per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeysConfig {
    #[serde(default = "KeysConfig::default_left")]
    pub left: String,
    #[serde(default = "KeysConfig::default_down")]
    pub down: String,
    #[serde(default = "KeysConfig::default_up")]
    pub up: String,
    #[serde(default = "KeysConfig::default_right")]
    pub right: String,
}

impl KeysConfig {
    fn default_left() -> String {
        "h".to_string()
    }

    fn default_down() -> String {
        "j".to_string()
    }

    fn default_up() -> String {
        "k".to_string()
    }

    fn default_right() -> String {
        "l".to_string()
    }
}

impl Default for KeysConfig {
    fn default() -> Self {
        Self {
            left: Self::default_left(),
            down: Self::default_down(),
            up: Self::default_up(),
            right: Self::default_right(),
        }
    }
}

fn single_char(direction: Direction, key: &str) -> Result<char, DirectionKeysError> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(DirectionKeysError::NotALetter {
            direction,
            key: key.to_string(),
        }),
    }
}

impl TryFrom<&KeysConfig> for DirectionKeys {
    type Error = DirectionKeysError;

    fn try_from(config: &KeysConfig) -> Result<Self, Self::Error> {
        DirectionKeys::new(
            single_char(Direction::Left, &config.left)?,
            single_char(Direction::Down, &config.down)?,
            single_char(Direction::Up, &config.up)?,
            single_char(Direction::Right, &config.right)?,
        )
    }
}
