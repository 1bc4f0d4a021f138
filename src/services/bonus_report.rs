// src/services/bonus_report.rs

use crate::{
    engine::{self, InvoiceLine, PeriodWindow},
    errors::{AppError, AppResult},
    models::{BonusReportRequest, BonusReportRow, SalespersonProfile},
    services::invoices::InvoiceQuery,
    state::AppState,
};
use chrono::{DateTime, Utc};
use tracing::info;

/// Fetch invoices for the requested window, run the engine and join the result
/// against the identity directory.
pub async fn generate_bonus_report(
    state: &AppState,
    request: &BonusReportRequest,
    now: DateTime<Utc>,
) -> AppResult<Vec<BonusReportRow>> {
    let window = match request.window {
        Some(window) => window,
        None => PeriodWindow::resolve(request.period, now, state.config.report_offset()),
    };
    window.validate()?;

    let raw = state
        .invoices
        .fetch_lines(&InvoiceQuery {
            range: window.fetch_range(),
            sale_modes: state.config.sale_modes.clone(),
            salesperson_id: request.user_id,
        })
        .await?;

    let lines = raw
        .into_iter()
        .map(InvoiceLine::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let aggregated = engine::aggregate(&lines, &window)?;

    let ids: Vec<String> = aggregated.keys().cloned().collect();
    let mut profiles = state.directory.lookup(&ids).await?;
    if let Some(pattern) = state.config.excluded_name.as_deref() {
        retain_not_matching(&mut profiles, pattern);
    }

    // Projection and assembly fan out across threads; keep them off the async workers.
    let rows = tokio::task::spawn_blocking(move || engine::build_report(&aggregated, &profiles))
        .await
        .map_err(|e| AppError::Internal(format!("Report assembly failed: {}", e)))?;

    info!(
        "Bonus report for {} to {}: {} lines, {} rows",
        window.current.start,
        window.current.end,
        lines.len(),
        rows.len()
    );

    Ok(rows)
}

fn retain_not_matching(profiles: &mut Vec<SalespersonProfile>, pattern: &str) {
    let pattern = pattern.to_lowercase();
    profiles.retain(|p| !p.name.to_lowercase().contains(&pattern));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excluded_name_is_case_insensitive() {
        let mut profiles = vec![
            SalespersonProfile { id: "1".into(), name: "Bee Store".into(), tiers: vec![] },
            SalespersonProfile { id: "2".into(), name: "Minh".into(), tiers: vec![] },
            SalespersonProfile { id: "3".into(), name: "honeybee".into(), tiers: vec![] },
        ];

        retain_not_matching(&mut profiles, "BEE");

        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].id, "2");
    }
}
