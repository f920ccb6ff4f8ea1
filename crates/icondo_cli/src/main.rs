//! `icondo` entry point.
//!
//! # Responsibility
//! - Parse flags, initialize logging, and run one subcommand.
//! - `serve` hosts the HTTP surface; `list`/`export` drive the list view
//!   against a running server.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use icondo_cli::{format_display, ConsoleNotifier, DirectoryDownloader, HttpFetchAdapter};
use icondo_core::{
    default_log_level, init_logging, init_stderr_logging, CondoListView, EMPTY_LIST_MESSAGE,
};
use icondo_server::{serve_until_ctrl_c, AppState};
use log::info;
use std::net::SocketAddr;
use std::path::PathBuf;

/// iCondo condominium registry.
#[derive(Parser)]
#[command(name = "icondo")]
#[command(version)]
#[command(about = "Register, list and export condominiums")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Write rolling log files into this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// SQLite database file
        #[arg(long, env = "ICONDO_DB", default_value = "icondo.sqlite3")]
        db: PathBuf,

        /// Listen address
        #[arg(long, env = "ICONDO_BIND", default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },

    /// Print the condominium table of a running server
    List {
        #[command(flatten)]
        remote: Remote,

        /// Only show records whose name contains this text
        #[arg(long)]
        search: Option<String>,
    },

    /// Download condominios.csv from a running server
    Export {
        #[command(flatten)]
        remote: Remote,

        /// Directory that receives the file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Check core linkage
    Ping,
}

#[derive(Args)]
struct Remote {
    /// Server base URL
    #[arg(long, env = "ICONDO_BASE_URL", default_value = "http://127.0.0.1:3000/")]
    base_url: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = cli
        .log_level
        .unwrap_or_else(|| default_log_level().to_string());
    match &cli.log_dir {
        Some(dir) => {
            let dir = std::env::current_dir()
                .context("failed to resolve working directory")?
                .join(dir);
            init_logging(&level, &dir.to_string_lossy()).map_err(anyhow::Error::msg)?
        }
        None => init_stderr_logging(&level).map_err(anyhow::Error::msg)?,
    }

    match cli.command {
        Commands::Serve { db, bind } => serve(db, bind),
        Commands::List { remote, search } => list(&remote, search),
        Commands::Export { remote, out_dir } => export(&remote, out_dir),
        Commands::Ping => {
            println!("icondo_core ping={}", icondo_core::ping());
            println!("icondo_core version={}", icondo_core::core_version());
            Ok(())
        }
    }
}

fn serve(db: PathBuf, bind: SocketAddr) -> Result<()> {
    info!(
        "event=cli_serve module=cli status=start db={} bind={bind}",
        db.display()
    );
    let state = AppState::open(&db)
        .with_context(|| format!("failed to open database {}", db.display()))?;
    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime
        .block_on(serve_until_ctrl_c(bind, state))
        .with_context(|| format!("server on {bind} failed"))
}

fn list(remote: &Remote, search: Option<String>) -> Result<()> {
    let adapter = HttpFetchAdapter::new(&remote.base_url)?;
    let mut view = CondoListView::new();
    view.load(&adapter, &ConsoleNotifier);
    if let Some(search) = search {
        view.set_search(search);
    }

    for line in format_display(&view.display(), EMPTY_LIST_MESSAGE) {
        println!("{line}");
    }
    Ok(())
}

fn export(remote: &Remote, out_dir: PathBuf) -> Result<()> {
    let adapter = HttpFetchAdapter::new(&remote.base_url)?;
    let downloader = DirectoryDownloader::new(out_dir);
    let mut view = CondoListView::new();

    if !view.export_csv(&adapter, &downloader, &ConsoleNotifier) {
        bail!("export from {} failed", adapter.base_url());
    }
    Ok(())
}
