//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

pub use crate::commands::generate::GenerateArgs;

/// Packwright - assemble on-premise deployment packages
#[derive(Parser, Debug)]
#[command(name = "packwright")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to packwright.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the component catalog
    List(ListArgs),

    /// Estimate the download size of a selection
    Estimate(SelectionArgs),

    /// Generate a deployment package
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Optional components to add to or drop from the default selection
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Include an optional component (repeatable)
    #[arg(long = "with", value_name = "ID")]
    pub with: Vec<String>,

    /// Exclude an optional component (repeatable)
    #[arg(long = "without", value_name = "ID")]
    pub without: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::parse_from([
            "packwright",
            "-v",
            "generate",
            "--company",
            "Acme",
            "--with",
            "docs",
            "--with",
            "security",
            "--deployment-type",
            "hybrid",
            "--accept-terms",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.company, "Acme");
                assert_eq!(args.selection.with, vec!["docs", "security"]);
                assert_eq!(args.deployment_type, packwright_core::DeploymentType::Hybrid);
                assert!(args.accept_terms);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_deployment_type_rejected() {
        let result = Cli::try_parse_from([
            "packwright",
            "generate",
            "--company",
            "Acme",
            "--deployment-type",
            "mainframe",
        ]);
        assert!(result.is_err());
    }
}
