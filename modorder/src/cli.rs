// modorder/src/cli.rs
//! Defines the command-line argument structure using clap.
use clap::{ArgAction, Parser, Subcommand};
use modorder_common::error::Result;
use modorder_common::Config;

pub mod check;
pub mod order;

use crate::cli::check::Check;
use crate::cli::order::Order;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "modorder", bin_name = "modorder")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve and print the load order of a manifest
    Order(Order),
    /// Validate a manifest without ordering it
    Check(Check),
}

impl Command {
    pub fn run(&self, config: &Config) -> Result<()> {
        match self {
            Self::Order(command) => command.run(config),
            Self::Check(command) => command.run(config),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn parses_order_with_json_and_verbosity() {
        let args = CliArgs::try_parse_from(["modorder", "-vv", "order", "mods.toml", "--json"])
            .unwrap();
        assert_eq!(args.verbose, 2);
        match args.command {
            Command::Order(order) => {
                assert!(order.json);
                assert_eq!(order.manifest.to_str(), Some("mods.toml"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn check_requires_a_manifest() {
        assert!(CliArgs::try_parse_from(["modorder", "check"]).is_err());
    }
}
