//! Brochure column endpoint
//!
//! `GET /api/v1/brochure/columns?columns=N` resolves the roster and balances
//! it over N columns (the configured default when omitted). The renderer
//! fills one template slot per returned column.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::{
    error::AppResult,
    layout::ColumnAssignment,
    roster::{total_doctors, Tier},
    AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct ColumnsQuery {
    pub columns: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct BrochureColumnsResponse {
    pub tier: Tier,
    pub generated_at: String,
    pub doctor_count: usize,
    pub columns: Vec<ColumnAssignment>,
}

#[instrument(skip(state))]
pub async fn brochure_columns(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ColumnsQuery>,
) -> AppResult<Json<BrochureColumnsResponse>> {
    let column_count = query.columns.unwrap_or(state.config.brochure_columns);

    let resolution = state
        .roster_source
        .resolve_within(state.config.roster_deadline())
        .await;
    let doctor_count = total_doctors(&resolution.groups);
    let columns = state.balancer.distribute(resolution.groups, column_count)?;

    debug!(
        tier = resolution.tier.as_str(),
        column_count,
        doctor_count,
        "Brochure columns balanced"
    );

    Ok(Json(BrochureColumnsResponse {
        tier: resolution.tier,
        generated_at: chrono::Utc::now().to_rfc3339(),
        doctor_count,
        columns,
    }))
}
