//! Shared utilities for integration tests.

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use mockserve::config::{BehaviorWatcher, Reloader, ServerConfig};
use mockserve::{MockServer, Registry, Shutdown};
use notify::PollWatcher;
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// A full server stack: watched behavior file, registry and listener.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub path: PathBuf,
    pub registry: Arc<Registry>,
    pub reloader: Arc<Reloader>,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<Result<(), std::io::Error>>,
    _watcher: PollWatcher,
    _dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Rewrite the behavior file so the poller sees a new modification time.
    pub async fn rewrite(&self, content: &str) {
        // Some filesystems only keep whole-second mtimes.
        tokio::time::sleep(Duration::from_millis(1100)).await;
        fs::write(&self.path, content).unwrap();
    }

    /// Poll until `check` holds or five seconds pass.
    pub async fn wait_for(&self, check: impl Fn(&TestServer) -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if check(self) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }
}

/// Start a server answering from `content`.
pub async fn start_server(content: &str) -> TestServer {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("behaviors.ini");
    fs::write(&path, content).unwrap();

    let registry = Arc::new(Registry::new());
    let reloader = Arc::new(Reloader::new(registry.clone(), true));
    let watcher = BehaviorWatcher::new(&path, POLL_INTERVAL, reloader.clone())
        .run()
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let mut config = ServerConfig::default();
    config.timeouts.shutdown_grace_secs = 2;
    let server = MockServer::new(&config, registry.clone());
    let handle = tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer {
        addr,
        path,
        registry,
        reloader,
        shutdown,
        handle,
        _watcher: watcher,
        _dir: dir,
    }
}
