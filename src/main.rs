//! # LexDesk — Court Session & Task Reminders
//!
//! Usage:
//!   lexdesk init                             # Write demo office data
//!   lexdesk check --user admin@example.com   # One reminder cycle, then exit
//!   lexdesk watch --user admin@example.com   # Keep polling until Ctrl-C

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexdesk_core::LexDeskConfig;
use lexdesk_scheduler::{CaseStore, NotificationEngine, NotificationRecord};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "lexdesk",
    version,
    about = "⚖️ LexDesk — court session and task deadline reminders"
)]
struct Cli {
    /// Config file (default: ~/.lexdesk/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Data file, overrides `data_path` from the config
    #[arg(short, long)]
    data: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the demo office data file
    Init {
        /// Overwrite an existing data file
        #[arg(long)]
        force: bool,
    },
    /// Run one reminder cycle and print the result
    Check {
        /// Email of the viewing user
        #[arg(short, long)]
        user: String,

        /// Print records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Poll continuously and print every change
    Watch {
        /// Email of the viewing user
        #[arg(short, long)]
        user: String,
    },
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "lexdesk=debug,lexdesk_scheduler=debug"
    } else {
        "lexdesk=info,lexdesk_scheduler=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config = match &cli.config {
        Some(path) => LexDeskConfig::load_from(&expand_path(path))?,
        None => LexDeskConfig::load()?,
    };
    let data_path = expand_path(cli.data.as_deref().unwrap_or(&config.data_path));

    match cli.command {
        Command::Init { force } => {
            if data_path.exists() && !force {
                println!("⚠️  {} already exists (use --force to overwrite).", data_path.display());
                return Ok(());
            }
            CaseStore::demo(chrono::Utc::now()).save(&data_path)?;
            println!("✅ Demo data written to {}", data_path.display());
            println!("   Try: lexdesk check --user admin@example.com");
        }
        Command::Check { user, json } => {
            let store = Arc::new(open_store(&data_path)?);
            let user = store.find_user_by_email(&user)?;
            let engine = NotificationEngine::new(store, config.notifications.clone());
            let records = engine.poll_once(&user).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }
        Command::Watch { user } => {
            let store = Arc::new(open_store(&data_path)?);
            let user = store.find_user_by_email(&user)?;
            let mut engine = NotificationEngine::new(store, config.notifications.clone());
            let mut rx = engine.subscribe();

            println!("⚖️  LexDesk v{}", env!("CARGO_PKG_VERSION"));
            println!("   👤 User:     {} ({})", user.email, user.role);
            println!("   🗄️  Data:     {}", data_path.display());
            println!("   ⏱️  Interval: {}s", config.notifications.poll_interval_secs);
            println!();

            if !user.role.receives_reminders() {
                println!("🔕 Client accounts do not receive reminders.");
                return Ok(());
            }

            engine.set_user(Some(user)).await;
            println!("👀 Watching for reminders (Ctrl-C to stop)...");
            loop {
                tokio::select! {
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let records = rx.borrow_and_update().clone();
                        print_records(&records);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        println!();
                        break;
                    }
                }
            }
            engine.stop().await;
        }
    }

    Ok(())
}

fn open_store(path: &std::path::Path) -> Result<CaseStore> {
    CaseStore::open(path)
        .with_context(|| format!("cannot open {} (run `lexdesk init` first?)", path.display()))
}

fn print_records(records: &[NotificationRecord]) {
    let stamp = chrono::Local::now().format("%H:%M:%S");
    if records.is_empty() {
        println!("[{stamp}] 🔔 No upcoming reminders.");
        return;
    }
    println!("[{stamp}] 🔔 {} reminder(s):", records.len());
    for record in records {
        println!("   • [{}] {}", record.time_until, record.message);
    }
}
