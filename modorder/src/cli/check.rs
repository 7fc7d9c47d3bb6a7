use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use modorder_common::config::Config;
use modorder_common::error::Result;
use modorder_common::manifest::Manifest;

#[derive(Args, Debug)]
pub struct Check {
    /// Manifest to read (.json or .toml)
    pub manifest: PathBuf,
}

impl Check {
    pub fn run(&self, config: &Config) -> Result<()> {
        let manifest = Manifest::load(&self.manifest)?;
        let report = manifest.validate(config)?;

        let warnings = report.warnings();
        for warning in &warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }

        println!(
            "{} {}: {} modules, {} warnings (duplicate keys: {}, unknown dependencies: {})",
            "==>".bold().blue(),
            self.manifest.display().to_string().bold(),
            manifest.len(),
            warnings.len(),
            config.duplicate_keys,
            config.unknown_dependencies
        );
        Ok(())
    }
}
