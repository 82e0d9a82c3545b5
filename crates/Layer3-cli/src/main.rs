//! EasyAudit CLI - Main entry point

mod commands;

use clap::{Parser, Subcommand};
use easyaudit_foundation::AuditConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// EasyAudit - audit trail for entity and authentication events
#[derive(Parser, Debug)]
#[command(name = "easyaudit")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: global + ./.easyaudit/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Audit database path (overrides config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Read events as JSON lines and record them
    Ingest {
        /// Input file (stdin if omitted)
        file: Option<PathBuf>,
    },
    /// Show recorded audit entries, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Only show these audit types
        #[arg(short = 't', long = "type")]
        types: Vec<String>,

        /// Only show entries by this user
        #[arg(long)]
        actor: Option<String>,

        /// Minimum level (debug .. emergency)
        #[arg(long)]
        min_level: Option<String>,
    },
    /// Show totals by type and level
    Stats,
    /// Delete entries older than the retention period
    Cleanup {
        /// Retention in days (default: storage.retention_days)
        #[arg(long)]
        days: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Load configuration
    let mut config = match args.config {
        Some(ref path) => AuditConfig::from_file(path)?,
        None => AuditConfig::load()?,
    };
    if let Some(db) = args.db {
        config.storage.path = Some(db);
    }

    match args.command {
        Command::Ingest { file } => commands::ingest(&config, file.as_deref()),
        Command::List {
            limit,
            types,
            actor,
            min_level,
        } => commands::list(&config, limit, types, actor, min_level.as_deref()),
        Command::Stats => commands::stats(&config),
        Command::Cleanup { days } => commands::cleanup(&config, days),
    }
}
