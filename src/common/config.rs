use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::info;

pub fn config_dir() -> Option<PathBuf> { dirs::config_dir().map(|dir| dir.join("pip-on-top")) }

pub fn config_file() -> Option<PathBuf> { config_dir().map(|dir| dir.join("config.toml")) }

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse {}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub settings: Settings,
    pub titles: TitleSettings,
}

/// The user-facing switches. Changes to these are observed while running.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct Settings {
    /// Pin PiP windows to every workspace.
    pub stick: bool,
    /// Remember where the last PiP window was and move new ones there.
    pub remember_position: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default, deny_unknown_fields)]
pub struct TitleSettings {
    /// Localized "Picture-in-Picture" title to match in addition to the
    /// English ones.
    pub translated: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr
)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingKey {
    Stick,
    RememberPosition,
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::Stick => self.stick,
            SettingKey::RememberPosition => self.remember_position,
        }
    }

    /// Keys whose value differs from `previous`, in declaration order.
    pub fn changed_keys(&self, previous: &Settings) -> Vec<SettingKey> {
        SettingKey::iter().filter(|&key| self.get(key) != previous.get(key)).collect()
    }
}

impl Config {
    pub fn parse(text: &str) -> Result<Config, toml::de::Error> { toml::from_str(text) }

    /// Reads `path`, falling back to the defaults when it does not exist.
    pub fn read(path: &Path) -> Result<Config, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => return Err(ConfigError::Io { path: path.to_owned(), source }),
        };
        Config::parse(&text).map_err(|source| ConfigError::Parse { path: path.to_owned(), source })
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> { toml::to_string_pretty(self) }
}
