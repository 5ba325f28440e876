//! Command line and logging
//!
//! Logs always go to stderr so that stdout stays a clean JSON-lines stream.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// CConnect conversation decorator command-line interface
#[derive(Parser, Debug)]
#[command(name = "cconnect-decorator")]
#[command(
    about = "Reconstruct chat conversations from mirrored notifications (JSON lines in, JSON lines out)",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/cosmic/cosmic-connect/decorator.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Read events from this file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Installed source app version code (overrides the configuration)
    #[arg(long, value_name = "N")]
    pub source_version: Option<u32>,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON structured logging
    #[arg(long)]
    pub json_logs: bool,

    /// Show timestamps in logs
    #[arg(long, default_value = "true")]
    pub timestamps: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// One-shot commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the effective configuration
    DumpConfig,

    /// Translate emoji markers in TEXT
    Translate {
        /// Text to translate
        text: String,
    },
}

/// Initialize logging based on CLI configuration
pub fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = cli.log_level.parse::<Level>().with_context(|| {
        format!(
            "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
            cli.log_level
        )
    })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level.as_str()))
        .context("Failed to create log filter")?;

    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    match (cli.json_logs, cli.timestamps) {
        (true, true) => subscriber.json().init(),
        (true, false) => subscriber.without_time().json().init(),
        (false, true) => subscriber.init(),
        (false, false) => subscriber.without_time().init(),
    }

    info!(
        "Logging initialized: level={}, json={}, timestamps={}",
        log_level, cli.json_logs, cli.timestamps
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_arguments() {
        let cli = Cli::try_parse_from(["cconnect-decorator"]).unwrap();
        assert_eq!(cli.log_level, "info");
        assert!(cli.timestamps);
        assert!(!cli.json_logs);
        assert!(cli.config.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_subcommands() {
        let cli = Cli::try_parse_from(["cconnect-decorator", "translate", "[Smile]"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Translate {
                text: "[Smile]".to_string()
            })
        );

        let cli = Cli::try_parse_from([
            "cconnect-decorator",
            "--source-version",
            "1360",
            "dump-config",
        ])
        .unwrap();
        assert_eq!(cli.source_version, Some(1360));
        assert_eq!(cli.command, Some(Command::DumpConfig));
    }

    #[test]
    fn test_invalid_source_version_rejected() {
        assert!(Cli::try_parse_from(["cconnect-decorator", "--source-version", "new"]).is_err());
    }
}
