mod keys;

pub use keys::KeysConfig;

use crate::constants::DEFAULT_COMMAND_PREFIX;
use crate::motion::{DirectionKeys, MotionGrammar};
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_command_prefix")]
    pub command_prefix: String,
    #[serde(default = "enabled")]
    pub relative_line_numbers: bool,
    #[serde(default, deserialize_with = "lenient_line_count")]
    pub scroll_padding: Option<u32>,
    #[serde(default = "enabled")]
    pub highlight_destination: bool,
    #[serde(default)]
    pub keys: KeysConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            relative_line_numbers: true,
            scroll_padding: None,
            highlight_destination: true,
            keys: KeysConfig::default(),
        }
    }
}

impl FileConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let string = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&string)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Like [`FileConfig::load_from_file`], but a missing file means defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

fn default_command_prefix() -> String {
    DEFAULT_COMMAND_PREFIX.to_string()
}

fn enabled() -> bool {
    true
}

// anything that is not a non-negative integer turns the padding off
fn lenient_line_count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<toml::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| value.as_integer())
        .and_then(|lines| u32::try_from(lines).ok()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub command_prefix: String,
    pub relative_line_numbers: bool,
    pub scroll_padding: Option<u32>,
    pub highlight_destination: bool,
    pub keys: DirectionKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command_prefix: default_command_prefix(),
            relative_line_numbers: true,
            scroll_padding: None,
            highlight_destination: true,
            keys: DirectionKeys::default(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Self::try_from(FileConfig::load_or_default(path)?)
    }

    pub fn command_id(&self) -> String {
        format!("{}.execute", self.command_prefix)
    }

    pub fn grammar(&self) -> MotionGrammar {
        MotionGrammar::new(self.keys)
    }
}

impl TryFrom<FileConfig> for Config {
    type Error = anyhow::Error;

    fn try_from(file_config: FileConfig) -> Result<Self, Self::Error> {
        if file_config.command_prefix.trim().is_empty() {
            anyhow::bail!("command_prefix must not be empty");
        }
        let keys = DirectionKeys::try_from(&file_config.keys)?;
        Ok(Self {
            command_prefix: file_config.command_prefix,
            relative_line_numbers: file_config.relative_line_numbers,
            scroll_padding: file_config.scroll_padding,
            highlight_destination: file_config.highlight_destination,
            keys,
        })
    }
}
