// src/handlers/bonus_report.rs

use crate::{
    errors::AppResult,
    models::{BonusReportRequest, BonusReportRow},
    services::bonus_report::generate_bonus_report,
    state::AppState,
};
use axum::{Json, extract::State};
use chrono::Utc;

/// Per-salesperson period metrics, growth and tiered bonus projection.
/// Salespeople without a user record are left out.
#[utoipa::path(
    post,
    path = "/api/v1/bonus-report",
    request_body = BonusReportRequest,
    responses(
        (status = 200, description = "One row per known salesperson", body = Vec<BonusReportRow>),
        (status = 400, description = "Invalid period window"),
        (status = 500, description = "Malformed invoice data or database failure"),
    ),
    tag = "Bonus Report"
)]
pub async fn bonus_report(
    State(state): State<AppState>,
    Json(body): Json<BonusReportRequest>,
) -> AppResult<Json<Vec<BonusReportRow>>> {
    let rows = generate_bonus_report(&state, &body, Utc::now()).await?;
    Ok(Json(rows))
}
