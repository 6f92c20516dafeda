//! Roster endpoint
//!
//! `GET /api/v1/roster` returns the resolved roster and its tier.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::{roster::Resolution, AppState};

pub async fn get_roster(State(state): State<Arc<AppState>>) -> Json<Resolution> {
    Json(
        state
            .roster_source
            .resolve_within(state.config.roster_deadline())
            .await,
    )
}
