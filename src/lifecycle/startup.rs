//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate server settings, apply command-line overrides
//! - Initialize logging and metrics
//! - Load the behavior file and start watching it
//! - Bind listeners and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast on bad settings; a bad behavior file is not fatal
//! - Subsystems initialize in order, not concurrently
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::PollWatcher;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::admin::{setup_admin_router, AdminState};
use crate::config::validation::ValidationError;
use crate::config::{load_config, parse_listen_address, BehaviorWatcher, ConfigError, Reloader, ServerConfig};
use crate::http::MockServer;
use crate::lifecycle::signals::shutdown_signal;
use crate::lifecycle::Shutdown;
use crate::observability::{logging, metrics};
use crate::routing::Registry;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid or missing path: {}", .0.display())]
    BehaviorPath(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to start behavior watcher: {0}")]
    Watch(#[from] notify::Error),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("startup task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Everything the command line can decide.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub behavior_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub listen: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub merge_duplicate_sections: bool,
}

/// The behavior file must exist and carry an `.ini` extension.
pub fn check_behavior_path(path: &Path) -> Result<(), StartupError> {
    let is_ini = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.len() > ".ini".len() && name.ends_with(".ini"));

    if is_ini && path.is_file() {
        Ok(())
    } else {
        Err(StartupError::BehaviorPath(path.to_path_buf()))
    }
}

/// Settings from the optional file with command-line overrides applied.
pub fn resolve_settings(options: &StartupOptions) -> Result<(ServerConfig, SocketAddr), StartupError> {
    let mut config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    if let Some(listen) = &options.listen {
        config.listener.bind_address = listen.clone();
    }
    if let Some(ms) = options.poll_interval_ms {
        if ms == 0 {
            let zero = ValidationError::Zero {
                field: "behaviors.poll_interval_ms",
            };
            return Err(ConfigError::Validation(vec![zero]).into());
        }
        config.behaviors.poll_interval_ms = ms;
    }
    if options.merge_duplicate_sections {
        config.behaviors.allow_duplicate_sections = false;
    }

    let address = parse_listen_address(&config.listener.bind_address)?;
    Ok((config, address))
}

/// Run the server until a termination signal arrives.
pub async fn run(options: StartupOptions) -> Result<(), StartupError> {
    check_behavior_path(&options.behavior_path)?;
    let (config, address) = resolve_settings(&options)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mockserve starting");
    tracing::info!(
        listen = %address,
        path = %options.behavior_path.display(),
        poll_interval_ms = config.behaviors.poll_interval_ms,
        allow_duplicate_sections = config.behaviors.allow_duplicate_sections,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(Registry::new());
    let reloader = Arc::new(Reloader::new(
        registry.clone(),
        config.behaviors.allow_duplicate_sections,
    ));
    let watcher = start_watcher(
        &options.behavior_path,
        Duration::from_millis(config.behaviors.poll_interval_ms),
        reloader.clone(),
    )
    .await?;

    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal.trigger();
    });

    if config.admin.enabled {
        spawn_admin(&config.admin.bind_address, reloader.clone(), &shutdown).await?;
    }

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    MockServer::new(&config, registry)
        .run(listener, shutdown.subscribe())
        .await?;

    // Stops polling.
    drop(watcher);
    tracing::info!("Shutdown complete");
    Ok(())
}

/// Initial load plus polling; the first read and compile run on the
/// blocking pool.
async fn start_watcher(path: &Path, poll_interval: Duration, reloader: Arc<Reloader>) -> Result<PollWatcher, StartupError> {
    let watcher = BehaviorWatcher::new(path, poll_interval, reloader);
    Ok(tokio::task::spawn_blocking(move || watcher.run()).await??)
}

async fn spawn_admin(bind_address: &str, reloader: Arc<Reloader>, shutdown: &Shutdown) -> Result<(), StartupError> {
    let address: SocketAddr = bind_address
        .parse()
        .map_err(|_| ConfigError::ListenAddress(bind_address.to_string()))?;
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind { address, source })?;

    tracing::info!(address = %address, "Admin API listening");

    let router = setup_admin_router(AdminState { reloader });
    let mut stop = shutdown.subscribe();
    tokio::spawn(async move {
        let result = axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = stop.recv().await;
            })
            .await;
        if let Err(e) = result {
            tracing::error!(error = %e, "Admin API failed");
        }
    });
    Ok(())
}
