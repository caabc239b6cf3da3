use crate::core::ExportId;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "metafield-transfer")]
#[command(about = "Copy product metafields from one Shopify store to another")]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "transfer.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read all products of the source store and save their metafields
    Export,

    /// Create the exported metafields on the destination store
    Import {
        /// Export to import (defaults to the latest one)
        #[arg(long)]
        export: Option<String>,

        /// Abort when destination products share a handle
        #[arg(long)]
        strict_handles: bool,
    },

    /// Show what an export contains without touching any store
    Inspect {
        /// Export to inspect (defaults to the latest one)
        #[arg(long)]
        export: Option<String>,
    },
}

impl Command {
    pub fn export_id(&self) -> Option<ExportId> {
        match self {
            Command::Import { export, .. } | Command::Inspect { export } => {
                export.as_deref().map(ExportId::from)
            }
            Command::Export => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_with_options() {
        let cli = Cli::parse_from([
            "metafield-transfer",
            "--config",
            "stores.toml",
            "import",
            "--export",
            "metafields-export-20240101T000000.000Z.csv",
            "--strict-handles",
            "-v",
        ]);

        assert_eq!(cli.config, "stores.toml");
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Command::Import {
                strict_handles: true,
                ..
            }
        ));
        assert_eq!(
            cli.command.export_id(),
            Some(ExportId::from("metafields-export-20240101T000000.000Z.csv"))
        );
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["metafield-transfer", "export"]);

        assert_eq!(cli.config, "transfer.toml");
        assert!(!cli.json_logs);
        assert!(cli.command.export_id().is_none());
    }
}
