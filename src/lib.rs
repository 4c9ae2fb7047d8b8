//! mockserve: an HTTP mock server driven by an INI-style behavior file.
//!
//! Each `[METHOD /path]` section describes one canned response; the file is
//! polled and hot swapped on every edit, while bad edits keep the previous
//! set serving.

pub mod admin;
pub mod behavior;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use behavior::{compile, parse, BehaviorSet};
pub use config::schema::ServerConfig;
pub use http::MockServer;
pub use lifecycle::Shutdown;
pub use routing::Registry;
