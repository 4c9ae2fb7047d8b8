//! Configuration and behavior reload subsystem.
//!
//! # Data Flow
//! ```text
//! settings file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (immutable for the life of the process)
//!
//! behavior file (INI)
//!     watcher.rs polls modification time
//!     → reload.rs: parse → compile → Registry::replace
//!     → failure leaves the active set as it was
//! ```
//!
//! # Design Decisions
//! - Server settings are read once; only behaviors hot reload
//! - All settings have defaults so the file can be omitted entirely
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod reload;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_listen_address, ConfigError};
pub use reload::{ReloadError, ReloadOutcome, ReloadStatus, Reloader};
pub use schema::{AdminConfig, BehaviorsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TimeoutConfig};
pub use watcher::BehaviorWatcher;
