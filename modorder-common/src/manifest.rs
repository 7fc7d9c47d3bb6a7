// modorder-common/src/manifest.rs
//! Module manifests: the list of modules to order, as read from disk.
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::{Config, DuplicateKeyPolicy, UnknownDependencyPolicy};
use super::error::{ModOrderError, Result};
use super::model::ModuleSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Toml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ModOrderError::Manifest(format!(
                "unsupported manifest extension {:?} for {} (expected .json or .toml)",
                other.unwrap_or(""),
                path.display()
            ))),
        }
    }
}

/// An ordered list of module definitions.
///
/// JSON manifests are `{"modules": [{"key": ..., "dependencies": [...]}]}`;
/// TOML manifests use `[[modules]]` tables with the same fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
}

/// Findings of [`Manifest::validate`] that did not cause a rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Keys defined more than once, in order of first repetition.
    pub duplicate_keys: Vec<String>,
    /// `(module, dependency)` pairs whose dependency key is not defined.
    pub unknown_dependencies: Vec<(String, String)>,
    /// Modules that list themselves as a dependency.
    pub self_dependencies: Vec<String>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.duplicate_keys.is_empty()
            && self.unknown_dependencies.is_empty()
            && self.self_dependencies.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        for key in &self.duplicate_keys {
            warnings.push(format!(
                "module '{key}' is defined more than once; the last definition wins"
            ));
        }
        for (module, dependency) in &self.unknown_dependencies {
            warnings.push(format!(
                "module '{module}' depends on undefined module '{dependency}'"
            ));
        }
        for key in &self.self_dependencies {
            warnings.push(format!("module '{key}' depends on itself"));
        }
        warnings
    }
}

impl Manifest {
    pub fn new(modules: Vec<ModuleSpec>) -> Self {
        Self { modules }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let format = ManifestFormat::from_path(path)?;
        debug!("Loading {:?} manifest from {}", format, path.display());
        let raw = fs::read_to_string(path)?;
        let manifest = Self::parse(&raw, format)?;
        debug!(
            "Loaded {} module definitions from {}",
            manifest.modules.len(),
            path.display()
        );
        Ok(manifest)
    }

    pub fn parse(raw: &str, format: ManifestFormat) -> Result<Self> {
        match format {
            ManifestFormat::Json => Ok(serde_json::from_str(raw)?),
            ManifestFormat::Toml => Ok(toml::from_str(raw)?),
        }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(|m| m.key.as_str())
    }

    /// Checks keys and dependency references against the configured policies.
    ///
    /// Cycles are not looked for; the traversal breaks them on its own.
    pub fn validate(&self, config: &Config) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(self.modules.len());

        for (position, module) in self.modules.iter().enumerate() {
            if module.key.trim().is_empty() {
                return Err(ModOrderError::Manifest(format!(
                    "module at position {position} has an empty key"
                )));
            }
            if !seen.insert(module.key.as_str())
                && !report.duplicate_keys.contains(&module.key)
            {
                report.duplicate_keys.push(module.key.clone());
            }
        }

        for module in &self.modules {
            for dependency in &module.dependencies {
                if *dependency == module.key {
                    if !report.self_dependencies.contains(&module.key) {
                        report.self_dependencies.push(module.key.clone());
                    }
                } else if !seen.contains(dependency.as_str()) {
                    report
                        .unknown_dependencies
                        .push((module.key.clone(), dependency.clone()));
                }
            }
        }

        if let Some(key) = report.duplicate_keys.first() {
            match config.duplicate_keys {
                DuplicateKeyPolicy::Reject => {
                    return Err(ModOrderError::DuplicateKey(key.clone()));
                }
                DuplicateKeyPolicy::Shadow => {
                    warn!(
                        "Duplicate module keys {:?}; later definitions shadow earlier ones",
                        report.duplicate_keys
                    );
                }
            }
        }

        if let Some((module, dependency)) = report.unknown_dependencies.first() {
            match config.unknown_dependencies {
                UnknownDependencyPolicy::Reject => {
                    return Err(ModOrderError::UnknownDependency {
                        module: module.clone(),
                        dependency: dependency.clone(),
                    });
                }
                UnknownDependencyPolicy::Placeholder => {
                    debug!(
                        "{} unknown dependencies will be served as placeholders",
                        report.unknown_dependencies.len()
                    );
                }
                UnknownDependencyPolicy::Skip => {
                    warn!(
                        "Skipping {} unknown dependencies: {:?}",
                        report.unknown_dependencies.len(),
                        report.unknown_dependencies
                    );
                }
            }
        }

        Ok(report)
    }

    pub fn into_modules(self) -> Vec<Arc<ModuleSpec>> {
        self.modules.into_iter().map(Arc::new).collect()
    }
}
