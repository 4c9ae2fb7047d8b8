use axum::{extract::State, Json};
use serde::Serialize;

use crate::admin::AdminState;
use crate::config::ReloadStatus;
use crate::routing::RegistrySnapshot;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub generation: u64,
    pub active_behaviors: usize,
    pub has_default: bool,
    pub last_reload: ReloadStatus,
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let snapshot = state.reloader.registry().snapshot();
    let last_reload = state.reloader.status();

    // A failed reload keeps serving the previous set, so say so.
    let status = if last_reload.success { "operational" } else { "degraded" };

    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status,
        generation: snapshot.generation,
        active_behaviors: snapshot.behaviors.len(),
        has_default: snapshot.has_default,
        last_reload,
    })
}

pub async fn get_behaviors(State(state): State<AdminState>) -> Json<RegistrySnapshot> {
    Json(state.reloader.registry().snapshot())
}
