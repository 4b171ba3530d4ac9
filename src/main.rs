//! Operator CLI for the protection gems store.
//!
//! Commands:
//! - `init` - write a default `config.toml`
//! - `status` - list escrow records still waiting for a respawn, as JSON
//! - `purge <uuid>` - delete a stuck escrow record
//!
//! See the library crate docs for module-level details: `protection_gems::`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use uuid::Uuid;

use protection_gems::config::Config;
use protection_gems::gems::{EscrowStore, SledEscrowStore};

#[derive(Parser)]
#[command(name = "protection-gems")]
#[command(about = "Inspect and maintain protection gem escrow records")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Show escrow records awaiting respawn
    Status,
    /// Delete the escrow record of one player
    Purge {
        /// Player UUID
        player: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            if tokio::fs::try_exists(&cli.config).await.unwrap_or(false) {
                warn!("{} already exists, leaving it untouched", cli.config);
                return Ok(());
            }
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Status => {
            let (config, store) = open_store(&cli.config, cli.verbose).await?;
            let records = store.list()?;
            let payload: Vec<_> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "player": r.player_id.to_string(),
                        "stacks": r.items.len(),
                        "items": r.item_count(),
                        "stored_at": r.stored_at.to_rfc3339(),
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.storage.data_dir,
                    "pending": payload.len(),
                    "records": payload,
                })
            );
        }
        Commands::Purge { player } => {
            let (_, store) = open_store(&cli.config, cli.verbose).await?;
            let id = Uuid::parse_str(&player).map_err(|e| anyhow!("invalid player UUID {}: {}", player, e))?;
            if store.delete(&id)? {
                info!(target: "security", "purged escrow record for {}", id);
                println!("Purged escrow record for {}", id);
            } else {
                println!("No escrow record for {}", id);
            }
        }
    }

    Ok(())
}

/// Load config, start logging from it, and open the escrow store it names.
async fn open_store(path: &str, verbosity: u8) -> Result<(Config, SledEscrowStore)> {
    let config = Config::load(path).await?;
    init_logging(&Some(config.clone()), verbosity);
    let store = SledEscrowStore::open(&config.storage.data_dir)?;
    Ok((config, store))
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let security_path = config.as_ref().and_then(|c| c.logging.security_file.clone());
    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|file| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(file)
                .ok()
        });
    let write_mutex = log_file.map(|f| std::sync::Arc::new(std::sync::Mutex::new(f)));
    // With a log file, mirror to the console only when attached to a terminal.
    let to_console = write_mutex.is_none() || atty::is(atty::Stream::Stdout);

    builder.format(move |fmt, record| {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
        let line = format!("{} [{}] {}", ts, record.level(), record.args());

        if let Some(ref mutex) = write_mutex {
            if let Ok(mut guard) = mutex.lock() {
                let _ = writeln!(guard, "{}", line);
            }
        }

        if record.target() == "security" {
            if let Some(ref sec_path) = security_path {
                if let Ok(mut sf) = std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(sec_path)
                {
                    let _ = writeln!(sf, "{}", line);
                }
            }
        }

        if to_console {
            writeln!(fmt, "{}", line)
        } else {
            Ok(())
        }
    });
    let _ = builder.try_init();
}
