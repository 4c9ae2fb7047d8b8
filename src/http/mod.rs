//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all handler)
//!     → request.rs (request ID assigned and echoed)
//!     → routing::Registry::match_request (method + exact path)
//!     → delay (tokio sleep, no lock held)
//!     → response.rs (status, headers, cookies, redirect / SSE / body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::render;
pub use server::{AppState, MockServer};
