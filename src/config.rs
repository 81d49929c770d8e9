//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
//! 3. Explicit config file passed on the command line (`--config`)
//! 4. Environment variables: `CATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::FieldLimits;

/// Raw field limits for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLimits {
    pub name_max: Option<usize>,
    pub code_max: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub snapshot_file: Option<PathBuf>,
    #[serde(default)]
    pub limits: RawLimits,
}

/// Unified configuration for cattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Snapshot file the CLI loads and saves (default: ~/.cattree/categories.toml)
    pub snapshot_file: PathBuf,
    /// Field length limits enforced on create/update
    pub limits: FieldLimits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snapshot_file: default_snapshot_file(),
            limits: FieldLimits::default(),
        }
    }
}

/// Get the default snapshot file (~/.cattree/categories.toml).
fn default_snapshot_file() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".cattree"))
        .unwrap_or_else(|| PathBuf::from("~/.cattree"))
        .join("categories.toml")
}

/// Get the XDG config directory for cattree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cattree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("cattree.toml"))
}

/// Expand environment variables and `~` in a path string.
///
/// Supports `$VAR`, `${VAR}` and `~`. Unresolvable input is returned as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.snapshot_file.to_string_lossy().as_ref());
        self.snapshot_file = PathBuf::from(expanded);
    }

    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            snapshot_file: overlay
                .snapshot_file
                .clone()
                .unwrap_or_else(|| self.snapshot_file.clone()),
            limits: FieldLimits {
                name_max: overlay.limits.name_max.unwrap_or(self.limits.name_max),
                code_max: overlay.limits.code_max.unwrap_or(self.limits.code_max),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file, layered over the global one
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/cattree/cattree.toml`
    /// 3. Explicit config file (must exist when given)
    /// 4. Environment variables: `CATTREE_*` prefix
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        current.validate()?;

        Ok(current)
    }

    /// Apply CATTREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use a double underscore: `CATTREE_LIMITS__NAME_MAX=80`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CATTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("snapshot_file") {
            settings.snapshot_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_int("limits.name_max") {
            settings.limits.name_max = to_limit("limits.name_max", val)?;
        }
        if let Ok(val) = config.get_int("limits.code_max") {
            settings.limits.code_max = to_limit("limits.code_max", val)?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.limits.name_max == 0 || self.limits.code_max == 0 {
            return Err(ApplicationError::Config {
                message: "field limits must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# cattree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/cattree/cattree.toml
#   File:   --config <FILE>
#   Env:    CATTREE_* environment variables (CATTREE_LIMITS__NAME_MAX=80)

# Snapshot file loaded at startup and written by --write
# snapshot_file = "~/.cattree/categories.toml"

[limits]
# Maximum category name length in characters
# name_max = 50

# Maximum category code length in characters
# code_max = 20
"#
        .to_string()
    }
}

fn to_limit(key: &str, val: i64) -> Result<usize, ApplicationError> {
    usize::try_from(val).map_err(|_| ApplicationError::Config {
        message: format!("{key} must be a positive integer, got {val}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(settings
            .snapshot_file
            .to_string_lossy()
            .ends_with("categories.toml"));
        assert_eq!(settings.limits, FieldLimits::default());
    }

    #[test]
    fn given_tilde_in_snapshot_file_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            snapshot_file: PathBuf::from("~/.cattree/categories.toml"),
            limits: FieldLimits::default(),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        let path = settings.snapshot_file.to_string_lossy();
        assert!(path.starts_with(&home), "should start with home: {}", path);
        assert!(!path.contains('~'), "should not contain tilde: {}", path);
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_inherit() {
        let base = Settings {
            snapshot_file: PathBuf::from("/srv/base.toml"),
            limits: FieldLimits::default(),
        };
        let overlay = RawSettings {
            snapshot_file: None,
            limits: RawLimits {
                name_max: Some(80),
                code_max: None,
            },
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.snapshot_file, PathBuf::from("/srv/base.toml"));
        assert_eq!(merged.limits.name_max, 80);
        assert_eq!(merged.limits.code_max, 20);
    }

    #[test]
    fn given_zero_limit_when_validating_then_config_error() {
        let settings = Settings {
            snapshot_file: PathBuf::from("/tmp/x.toml"),
            limits: FieldLimits {
                name_max: 0,
                code_max: 20,
            },
        };
        assert!(matches!(
            settings.validate(),
            Err(ApplicationError::Config { .. })
        ));
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.snapshot_file.is_none());
        assert!(raw.limits.name_max.is_none());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips_through_raw() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        let raw: RawSettings = toml::from_str(&text).unwrap();
        assert_eq!(Settings::default().merge_with(&raw), settings);
    }
}
