// src/models/mod.rs

use crate::engine::{Period, PeriodWindow};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// ─── Invoices ─────────────────────────────────────────────────────────────────

/// Invoice-detail row as read from the sales database, before validation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RawInvoiceLine {
    pub invoice_id: i64,
    pub sale_id: Option<i32>,
    pub date: Option<DateTime<Utc>>,
    pub invoice_type: i32,
    pub quantity: Option<Decimal>,
    pub money: Option<Decimal>,
}

// ─── Pay-rate templates ───────────────────────────────────────────────────────

/// One step of a cumulative-revenue commission schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionTier {
    /// Cumulative revenue floor
    pub threshold_amount: Decimal,
    /// Percent of revenue paid once the floor is reached, e.g. 5 means 5%
    pub bonus_rate: Decimal,
}

/// Bonus template modes stored on `bonus_templates`. Only the tiered
/// cumulative-revenue mode feeds the report.
pub const CUMULATIVE_REVENUE_MODE: i32 = 1;
pub const CUMULATIVE_REVENUE_TYPE: i32 = 1;
pub const PERCENT_UNIT: &str = "PERCENT";

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: Option<String>,
    pub pay_rate_id: Option<Uuid>,
}

#[derive(Debug, Clone, FromRow)]
pub struct TemplateTierRow {
    pub template_id: Uuid,
    pub threshold_amount: Decimal,
    pub bonus_rate: Decimal,
}

/// A known salesperson together with the tiers of their pay-rate template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalespersonProfile {
    pub id: String,
    pub name: String,
    pub tiers: Vec<CommissionTier>,
}

// ─── Bonus report ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BonusReportRequest {
    #[serde(default)]
    pub period: Period,
    /// Restrict the report to one salesperson
    pub user_id: Option<i32>,
    /// Explicit comparison window; overrides `period` when present
    pub window: Option<PeriodWindow>,
}

/// One report row per known salesperson. Percentages are raw numbers; display
/// formatting is left to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BonusReportRow {
    pub sale_id: String,
    pub name: String,

    pub current_total_invoices: u32,
    pub last_total_invoices: u32,
    pub current_valid_invoices: u32,
    pub last_valid_invoices: u32,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub current_total_products: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub last_total_products: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub current_total_revenues: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub last_total_revenues: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub growth_invoices_percent: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub growth_valid_invoices_percent: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub growth_products_percent: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub growth_revenues_percent: Option<Decimal>,

    /// Lowest tier threshold, 0 when no template is assigned
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub min_target_amount: Decimal,
    /// Current revenue as a percentage of the lowest threshold
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub target_percent: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub current_target_amount: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub current_bonus: Option<Decimal>,
    /// Revenue still missing to reach the next tier
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub next_target_shortfall: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option")]
    #[schema(value_type = Option<f64>)]
    pub next_bonus: Option<Decimal>,
}
