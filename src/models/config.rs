//! Configuration types.
//!
//! Configuration is layered: system file, then user file, then environment
//! overrides. Invalid values are corrected to defaults with a warning unless
//! strict mode is enabled.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::color::{HexColor, DEFAULT_PALETTE};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Invalid(String),
}

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,

    pub display: DisplayConfig,

    pub behavior: BehaviorConfig,

    /// Message catalogue overrides, keyed by message name (e.g. `addNewJobs`)
    pub strings: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON job store. Defaults to the user data directory.
    pub path: Option<PathBuf>,

    /// Team name shown in the header
    pub team_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            team_name: "My Team".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Theme name
    pub theme: String,

    /// Color picker swatches (6 hex digits each, `#` optional)
    pub palette: Vec<String>,

    /// Maximum length for job names before truncation in tables
    pub name_max_length: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            name_max_length: 40,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Ask before archiving a job
    pub confirm_archive: bool,

    /// How long the "saved" confirmation stays visible, in milliseconds
    pub success_flash_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            confirm_archive: true,
            success_flash_ms: 1500,
        }
    }
}

/// Shortest success flash that is still readable
const MIN_SUCCESS_FLASH_MS: u64 = 100;

/// Shortest name column that still fits an ellipsis
const MIN_NAME_LENGTH: usize = 8;

/// Correct a value below `min` to `default`, or fail in strict mode.
fn validate_min<T>(
    value: &mut T,
    field: &str,
    min: T,
    default: T,
    strict: bool,
    warnings: &mut Vec<String>,
) -> Result<(), ConfigError>
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    if *value < min {
        let msg = format!("{field} must be at least {min}, got {value}");
        if strict {
            return Err(ConfigError::Invalid(msg));
        }
        warnings.push(format!("{msg} - using default ({default})"));
        *value = default;
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values.
    /// Returns warnings for invalid values that were corrected to defaults.
    /// If `strict` is true, returns Err instead of correcting values.
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();

        validate_min(
            &mut self.behavior.success_flash_ms,
            "behavior.success_flash_ms",
            MIN_SUCCESS_FLASH_MS,
            BehaviorConfig::default().success_flash_ms,
            strict,
            &mut warnings,
        )?;

        validate_min(
            &mut self.display.name_max_length,
            "display.name_max_length",
            MIN_NAME_LENGTH,
            DisplayConfig::default().name_max_length,
            strict,
            &mut warnings,
        )?;

        let mut valid = Vec::with_capacity(self.display.palette.len());
        for entry in &self.display.palette {
            match HexColor::parse(entry) {
                Ok(color) => valid.push(color.to_string()),
                Err(e) if strict => return Err(ConfigError::Invalid(format!("display.palette: {e}"))),
                Err(e) => warnings.push(format!("display.palette: {e} - skipped")),
            }
        }
        if valid.is_empty() {
            if strict {
                return Err(ConfigError::Invalid("display.palette must not be empty".to_string()));
            }
            warnings.push("display.palette is empty - using default palette".to_string());
            valid = DisplayConfig::default().palette;
        }
        self.display.palette = valid;

        Ok(warnings)
    }

    /// Parsed palette colors (call after `validate`)
    #[must_use]
    pub fn palette(&self) -> Vec<HexColor> {
        self.display
            .palette
            .iter()
            .filter_map(|entry| HexColor::parse(entry).ok())
            .collect()
    }

    /// Resolved store path: configured path, or `<data dir>/teamjobs/jobs.json`
    #[must_use]
    pub fn store_path(&self) -> PathBuf {
        if let Some(path) = &self.store.path {
            return path.clone();
        }
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("teamjobs/jobs.json")
    }

    /// Get the user config file path, respecting XDG_CONFIG_HOME
    ///
    /// Resolution order:
    /// 1. $XDG_CONFIG_HOME/teamjobs/config.toml (if XDG_CONFIG_HOME is set)
    /// 2. $HOME/.config/teamjobs/config.toml (if HOME is set)
    /// 3. dirs::config_dir()/teamjobs/config.toml
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME")
            && !xdg_config.is_empty()
        {
            return Some(PathBuf::from(xdg_config).join("teamjobs/config.toml"));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config/teamjobs/config.toml"));
        }

        dirs::config_dir().map(|dir| dir.join("teamjobs/config.toml"))
    }

    /// Load configuration from files and environment.
    /// Returns the config and any warnings encountered during loading.
    pub fn load() -> Result<(Self, Vec<String>), ConfigError> {
        let mut config = Self::default();
        let mut warnings = Vec::new();
        let strict = Self::is_strict_mode();

        Self::load_config_file(&mut config, Path::new("/etc/teamjobs/config.toml"), strict, &mut warnings)?;

        if let Some(user_path) = Self::user_config_path() {
            Self::load_config_file(&mut config, &user_path, strict, &mut warnings)?;
        }

        config.apply_env_overrides(strict, &mut warnings)?;
        warnings.extend(config.validate(strict)?);

        Ok((config, warnings))
    }

    /// Check if strict config mode is enabled via TEAMJOBS_STRICT_CONFIG
    fn is_strict_mode() -> bool {
        std::env::var("TEAMJOBS_STRICT_CONFIG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Load a config file, collecting warnings on parse errors but not on missing files.
    fn load_config_file(
        config: &mut Self,
        path: &Path,
        strict: bool,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::parse_str(&content) {
                Ok(parsed) => config.merge(parsed),
                Err(source) => {
                    let err = ConfigError::Parse {
                        path: path.display().to_string(),
                        source,
                    };
                    if strict {
                        return Err(err);
                    }
                    warnings.push(err.to_string());
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => {
                let err = ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                };
                if strict {
                    return Err(err);
                }
                warnings.push(err.to_string());
            }
        }
        Ok(())
    }

    /// Parse a TOML document into a config
    pub fn parse_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn merge(&mut self, other: AppConfig) {
        self.store.path = other.store.path.or(self.store.path.take());
        self.store.team_name = other.store.team_name;
        self.display = other.display;
        self.behavior = other.behavior;
        self.strings.extend(other.strings);
    }

    fn apply_env_overrides(&mut self, strict: bool, warnings: &mut Vec<String>) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("TEAMJOBS_STORE")
            && !val.is_empty()
        {
            let path = PathBuf::from(&val);
            if path.is_dir() {
                let err = ConfigError::Env {
                    var: "TEAMJOBS_STORE",
                    value: val,
                    reason: "expected a file path, got a directory".to_string(),
                };
                if strict {
                    return Err(err);
                }
                warnings.push(format!("{err} - using default"));
            } else {
                self.store.path = Some(path);
            }
        }

        if let Ok(val) = std::env::var("TEAMJOBS_TEAM")
            && !val.is_empty()
        {
            self.store.team_name = val;
        }
        if let Ok(val) = std::env::var("TEAMJOBS_THEME") {
            self.display.theme = val;
        }
        Ok(())
    }
}
