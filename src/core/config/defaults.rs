use std::fmt;
use std::str::FromStr;

use crate::core::config::data::Config;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Keys accepted by `matetutor set` / `matetutor unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    Model,
    BaseUrl,
    Theme,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [ConfigKey::Model, ConfigKey::BaseUrl, ConfigKey::Theme];

    pub fn as_str(self) -> &'static str {
        match self {
            ConfigKey::Model => "model",
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::Theme => "theme",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown config key: {value} (expected one of: {})", known.join(", "))
            })
    }
}

impl Config {
    /// CLI value first, then the config file, then the built-in default.
    pub fn resolve_model(&self, cli_model: Option<&str>) -> String {
        cli_model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .or(self.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
            .to_string()
    }

    pub fn resolve_base_url(&self) -> String {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .to_string()
    }

    pub fn set_value(&mut self, key: ConfigKey, value: String) {
        let slot = self.slot_mut(key);
        *slot = Some(value);
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        let slot = self.slot_mut(key);
        *slot = None;
    }

    pub fn value(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::Model => self.model.as_deref(),
            ConfigKey::BaseUrl => self.base_url.as_deref(),
            ConfigKey::Theme => self.theme.as_deref(),
        }
    }

    fn slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::Model => &mut self.model,
            ConfigKey::BaseUrl => &mut self.base_url,
            ConfigKey::Theme => &mut self.theme,
        }
    }
}
