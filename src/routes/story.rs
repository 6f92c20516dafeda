//! Story endpoint
//!
//! `GET /api/v1/story/doctors?doctors=doc-0,doc-3` lists doctors currently on
//! leave, joined with the roster. With `doctors` set, only those ids are
//! returned, in the order given.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::{
    error::{AppError, AppResult},
    leave::{doctors_on_leave, select_by_ids, DoctorOnLeave},
    roster::Tier,
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct StoryQuery {
    /// Comma-separated doctor ids
    pub doctors: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoryDoctorsResponse {
    /// Tier that served the roster used for the join
    pub roster_tier: Tier,
    pub doctors: Vec<DoctorOnLeave>,
}

#[instrument(skip(state))]
pub async fn story_doctors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StoryQuery>,
) -> AppResult<Json<StoryDoctorsResponse>> {
    let (leaves, resolution) = tokio::join!(
        state.upstream.fetch_leave(),
        state
            .roster_source
            .resolve_within(state.config.roster_deadline()),
    );
    let leaves = leaves
        .map_err(|e| {
            warn!(error = %e, "Leave fetch failed");
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::ServiceUnavailable("Leave feed is not configured".to_string()))?;

    let today = Local::now().date_naive();
    let mut doctors = doctors_on_leave(&resolution.groups, leaves, today);

    if let Some(selection) = query.doctors.as_deref().filter(|s| !s.trim().is_empty()) {
        let ids: Vec<&str> = selection.split(',').collect();
        doctors = select_by_ids(&doctors, &ids);
        if doctors.is_empty() {
            return Err(AppError::NotFound("No matching doctors on leave".to_string()));
        }
    }

    Ok(Json(StoryDoctorsResponse {
        roster_tier: resolution.tier,
        doctors,
    }))
}
