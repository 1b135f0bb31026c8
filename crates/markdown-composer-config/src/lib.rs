use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Composer settings read from `config.toml`. Every field is optional in the
/// file and falls back to the composer defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_blank_lines: usize,
    pub max_trailing_blank_lines: usize,
    pub indent_prefix: String,
    pub format: FormatSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_blank_lines: 1,
            max_trailing_blank_lines: 0,
            indent_prefix: "    ".to_string(),
            format: FormatSettings::default(),
        }
    }
}

/// Whitespace handling switches, one per composer option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub convert_tabs: bool,
    pub collapse_whitespace: bool,
    pub trim_trailing_whitespace: bool,
    pub trim_leading_whitespace: bool,
    pub allow_leading_eol: bool,
}

impl Default for FormatSettings {
    fn default() -> Self {
        Self {
            convert_tabs: true,
            collapse_whitespace: true,
            trim_trailing_whitespace: true,
            trim_leading_whitespace: true,
            allow_leading_eol: false,
        }
    }
}

impl Settings {
    /// Loads settings from `config_path`, after expanding `~` and environment
    /// variables in it. A missing file is not an error.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        let config_path = Self::expand_path(config_path).unwrap_or_else(|| config_path.to_owned());
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.clone(),
                source,
            }
        })?;

        let settings = toml::from_str(&content)
            .map_err(|source| ConfigError::ConfigParseError { config_path, source })?;

        Ok(Some(settings))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-composer");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        shellexpand::full(&path_str)
            .ok()
            .map(|expanded| PathBuf::from(expanded.as_ref()))
    }
}
