//! mockserve
//!
//! Serves fake HTTP endpoints described in an INI-style behavior file.
//!
//! # Architecture Overview
//!
//! ```text
//!   behavior.ini ──poll──▶ config::watcher ──▶ config::reload
//!                                                 │ parse → compile
//!                                                 ▼
//!   Client ──▶ http::server ──match──▶ routing::Registry (ArcSwap, repeat budgets)
//!     ▲             │
//!     │             ▼ delay
//!     └──── http::response (status, headers, cookies, redirect / SSE / body)
//! ```

use std::path::PathBuf;

use clap::Parser;

use mockserve::lifecycle::{self, StartupOptions};

#[derive(Parser)]
#[command(name = "mockserve", version)]
#[command(about = "Serve fake HTTP endpoints from an INI behavior file", long_about = None)]
struct Cli {
    /// Path to the behavior file (*.ini)
    #[arg(value_parser = behavior_path)]
    path: PathBuf,

    /// Address to listen on: `:PORT`, `localhost:PORT` or `IP:PORT`
    /// [default: :3000, or the settings file's listener.bind_address]
    #[arg(short, long)]
    listen: Option<String>,

    /// Server settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// How often to check the behavior file for changes
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Merge repeated section headers into the first occurrence
    #[arg(long)]
    merge_duplicate_sections: bool,
}

fn behavior_path(value: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(value);
    lifecycle::startup::check_behavior_path(&path).map_err(|e| e.to_string())?;
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    lifecycle::run(StartupOptions {
        behavior_path: cli.path,
        config_path: cli.config,
        listen: cli.listen,
        poll_interval_ms: cli.poll_interval_ms,
        merge_duplicate_sections: cli.merge_duplicate_sections,
    })
    .await?;

    Ok(())
}
