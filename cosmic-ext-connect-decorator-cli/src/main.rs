mod config;
mod diagnostics;
mod events;
mod worker;

use anyhow::{Context, Result};
use clap::Parser;
use cosmic_ext_connect_decorator::{emoji, Decorator, StaticSourceApp};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};

use config::Config;
use diagnostics::{Cli, Command};
use events::parse_event_line;
use worker::{Worker, EVENT_QUEUE_SIZE};

/// Handle one-shot commands
fn handle_command(cli: &Cli, command: &Command) -> Result<()> {
    match command {
        Command::DumpConfig => {
            let mut config = Config::load(cli.config.as_deref())?;
            if let Some(version) = cli.source_version {
                config.source.version_code = Some(version);
            }
            print!("{}", config.to_toml()?);
        }
        Command::Translate { text } => {
            println!("{}", emoji::translate(text));
        }
    }
    Ok(())
}

async fn open_input(cli: &Cli) -> Result<Box<dyn AsyncRead + Unpin + Send>> {
    match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(tokio::io::stdin())),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return handle_command(&cli, command);
    }

    diagnostics::init_logging(&cli).context("Failed to initialize logging")?;

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let version_code = cli.source_version.or(config.source.version_code);
    info!("Source app version: {:?}", version_code);

    let decorator = Decorator::new(config.decorator, StaticSourceApp::new(version_code))
        .context("Failed to create decorator")?;

    let (tx, rx) = mpsc::channel(EVENT_QUEUE_SIZE);
    let worker = tokio::spawn(Worker::new(decorator, tokio::io::stdout()).run(rx));

    let mut lines = BufReader::new(open_input(&cli).await?).lines();
    let mut line_number = 0u64;
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_number += 1;
        match parse_event_line(&line) {
            Ok(Some(event)) => {
                if tx.send(event).await.is_err() {
                    warn!("Worker stopped, discarding remaining input");
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => warn!("Line {}: {:#}", line_number, e),
        }
    }
    drop(tx);

    let worker = worker.await.context("Worker task panicked")??;
    info!("Done: {:?}", worker.stats());

    Ok(())
}
