// modorder-common/src/config.rs
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{ModOrderError, Result};

const CONFIG_FILENAME: &str = "config.toml";
const CONFIG_PATH_ENV: &str = "MODORDER_CONFIG";
const DUPLICATE_KEYS_ENV: &str = "MODORDER_DUPLICATE_KEYS";
const UNKNOWN_DEPENDENCIES_ENV: &str = "MODORDER_UNKNOWN_DEPENDENCIES";

/// What to do when a manifest lists two modules with the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// Fail validation.
    #[default]
    Reject,
    /// Keep both in the list; the later module shadows the earlier one in key lookups.
    Shadow,
}

/// What to do when a module depends on a key that is not in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDependencyPolicy {
    /// Emit a placeholder module for the unknown key, in place.
    #[default]
    Placeholder,
    /// Treat the dependency as absent.
    Skip,
    /// Fail validation.
    Reject,
}

impl FromStr for DuplicateKeyPolicy {
    type Err = ModOrderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "shadow" => Ok(Self::Shadow),
            other => Err(ModOrderError::Config(format!(
                "invalid duplicate key policy '{other}' (expected 'reject' or 'shadow')"
            ))),
        }
    }
}

impl FromStr for UnknownDependencyPolicy {
    type Err = ModOrderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "skip" => Ok(Self::Skip),
            "reject" => Ok(Self::Reject),
            other => Err(ModOrderError::Config(format!(
                "invalid unknown dependency policy '{other}' (expected 'placeholder', 'skip' or 'reject')"
            ))),
        }
    }
}

impl fmt::Display for DuplicateKeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Shadow => f.write_str("shadow"),
        }
    }
}

impl fmt::Display for UnknownDependencyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placeholder => f.write_str("placeholder"),
            Self::Skip => f.write_str("skip"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// On-disk shape of `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    duplicate_keys: Option<DuplicateKeyPolicy>,
    unknown_dependencies: Option<UnknownDependencyPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub duplicate_keys: DuplicateKeyPolicy,
    pub unknown_dependencies: UnknownDependencyPolicy,
    /// The file the settings were read from, if any.
    pub source: Option<PathBuf>,
}

impl Config {
    /// Defaults, then the config file (if present), then environment overrides.
    pub fn load() -> Result<Self> {
        debug!("Loading modorder configuration");

        let explicit = env::var_os(CONFIG_PATH_ENV)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);
        let mut config = Self::load_file(explicit, Self::default_config_path())?;

        config.apply_overrides(|name| env::var(name).ok())?;

        debug!(
            "Configuration loaded: duplicate_keys={}, unknown_dependencies={}",
            config.duplicate_keys, config.unknown_dependencies
        );
        Ok(config)
    }

    /// `config.toml` in the user config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "modorder").map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
    }

    /// Reads the explicitly named file if there is one, otherwise the default
    /// file if it exists. Only the default file may be missing.
    fn load_file(explicit: Option<PathBuf>, default: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ModOrderError::Config(format!(
                    "{CONFIG_PATH_ENV} points to {}, which is not a file",
                    path.display()
                )));
            }
            return Self::from_file(&path);
        }

        match default {
            Some(path) if path.is_file() => Self::from_file(&path),
            Some(path) => {
                debug!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            None => {
                debug!("Could not determine a config directory, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading config file {}", path.display());
        let raw = fs::read_to_string(path).map_err(|e| {
            ModOrderError::Config(format!("could not read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(raw)?;
        Ok(Self {
            duplicate_keys: file.duplicate_keys.unwrap_or_default(),
            unknown_dependencies: file.unknown_dependencies.unwrap_or_default(),
            source: None,
        })
    }

    /// Applies `MODORDER_*` overrides. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(value) = get(DUPLICATE_KEYS_ENV) {
            self.duplicate_keys = value.parse()?;
            debug!("{DUPLICATE_KEYS_ENV} overrides duplicate_keys = {}", self.duplicate_keys);
        }
        if let Some(value) = get(UNKNOWN_DEPENDENCIES_ENV) {
            self.unknown_dependencies = value.parse()?;
            debug!(
                "{UNKNOWN_DEPENDENCIES_ENV} overrides unknown_dependencies = {}",
                self.unknown_dependencies
            );
        }
        Ok(())
    }
}
