//! Operator status API.
//!
//! Served on its own listener so no mock path can shadow it. Read-only and
//! unauthenticated; bind it to loopback.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};

use self::handlers::*;
use crate::config::Reloader;

#[derive(Clone)]
pub struct AdminState {
    pub reloader: Arc<Reloader>,
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/behaviors", get(get_behaviors))
        .with_state(state)
}
