use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use colored::Colorize;
use modorder_common::config::Config;
use modorder_common::error::Result;
use modorder_common::manifest::Manifest;
use modorder_common::ModuleSpec;
use modorder_core::{load_order, DeclaredDependencies};
use prettytable::{format, Cell, Row, Table};
use tracing::{debug, warn};

#[derive(Args, Debug)]
pub struct Order {
    /// Manifest to read (.json or .toml)
    pub manifest: PathBuf,

    /// Print the order as a JSON array of module keys
    #[arg(long)]
    pub json: bool,
}

impl Order {
    pub fn run(&self, config: &Config) -> Result<()> {
        let manifest = Manifest::load(&self.manifest)?;
        let report = manifest.validate(config)?;
        for warning in report.warnings() {
            warn!("{}", warning);
        }

        let modules = manifest.into_modules();
        let provider =
            DeclaredDependencies::new(&modules).with_policy(config.unknown_dependencies);
        let order = load_order(modules, provider);
        debug!("Resolved {} modules from {}", order.len(), self.manifest.display());

        if self.json {
            let keys: Vec<&str> = order.iter().map(|m| m.key.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&keys)?);
            return Ok(());
        }

        if order.is_empty() {
            println!("{}", "No modules to order".yellow());
            return Ok(());
        }

        print_table(&order);
        println!(
            "{} {} modules in load order",
            "==>".bold().blue(),
            order.len().to_string().bold()
        );
        Ok(())
    }
}

fn print_table(order: &[Arc<ModuleSpec>]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.add_row(Row::new(vec![
        Cell::new("#").style_spec("b"),
        Cell::new("Module").style_spec("b"),
        Cell::new("Depends on").style_spec("b"),
    ]));
    for (position, module) in order.iter().enumerate() {
        let name = if module.is_placeholder() {
            Cell::new(&format!("{} (undefined)", module.key)).style_spec("Fy")
        } else {
            Cell::new(&module.key)
        };
        table.add_row(Row::new(vec![
            Cell::new(&(position + 1).to_string()).style_spec("r"),
            name,
            Cell::new(&module.dependencies.join(", ")),
        ]));
    }
    table.printstd();
}
