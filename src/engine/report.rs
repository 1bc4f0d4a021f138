// src/engine/report.rs

use super::{BonusProjection, GrowthSet, PeriodMetrics, project};
use crate::models::{BonusReportRow, SalespersonProfile};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Merge one salesperson's computed pieces into a report row.
pub fn assemble(
    profile: &SalespersonProfile,
    metrics: &PeriodMetrics,
    growth: &GrowthSet,
    projection: &BonusProjection,
) -> BonusReportRow {
    let (current, previous) = (&metrics.current, &metrics.previous);

    BonusReportRow {
        sale_id: profile.id.clone(),
        name: profile.name.clone(),

        current_total_invoices: current.invoice_count,
        last_total_invoices: previous.invoice_count,
        current_valid_invoices: current.valid_invoice_count,
        last_valid_invoices: previous.valid_invoice_count,
        current_total_products: current.total_products,
        last_total_products: previous.total_products,
        current_total_revenues: current.total_revenue,
        last_total_revenues: previous.total_revenue,

        growth_invoices_percent: growth.invoices,
        growth_valid_invoices_percent: growth.valid_invoices,
        growth_products_percent: growth.products,
        growth_revenues_percent: growth.revenue,

        min_target_amount: projection.min_target,
        target_percent: projection.target_percent,
        current_target_amount: projection.achieved.map(|tier| tier.threshold),
        current_bonus: projection.achieved.map(|tier| tier.bonus),
        next_target_shortfall: projection.next.map(|tier| tier.shortfall),
        next_bonus: projection.next.map(|tier| tier.bonus),
    }
}

/// Build one row per salesperson that has both aggregated activity and a profile.
///
/// `aggregated` must be fully built before this is called; it is only read here,
/// so the per-salesperson work runs in parallel. Rows come back ordered by
/// salesperson id.
pub fn build_report(
    aggregated: &BTreeMap<String, PeriodMetrics>,
    profiles: &[SalespersonProfile],
) -> Vec<BonusReportRow> {
    let known: HashSet<&str> = profiles.iter().map(|p| p.id.as_str()).collect();
    let dropped = aggregated
        .keys()
        .filter(|id| !known.contains(id.as_str()))
        .count();
    if dropped > 0 {
        warn!("{} salespeople with invoice activity have no user record", dropped);
    }

    let mut rows: Vec<BonusReportRow> = profiles
        .par_iter()
        .filter_map(|profile| {
            let metrics = aggregated.get(&profile.id)?;
            let growth = GrowthSet::from_metrics(metrics);
            let projection = project(metrics.current.total_revenue, &profile.tiers);
            Some(assemble(profile, metrics, &growth, &projection))
        })
        .collect();

    rows.sort_by(|a, b| a.sale_id.cmp(&b.sale_id));
    rows.dedup_by(|a, b| a.sale_id == b.sale_id);
    rows
}
