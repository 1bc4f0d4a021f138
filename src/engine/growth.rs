// src/engine/growth.rs

use super::{PeriodMetrics, round2};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Percentage change from `previous` to `current`, rounded to two places.
/// Undefined (None) when there is nothing to compare against.
pub fn growth_percent(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(round2((current - previous) * dec!(100) / previous))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GrowthSet {
    pub invoices: Option<Decimal>,
    pub valid_invoices: Option<Decimal>,
    pub products: Option<Decimal>,
    pub revenue: Option<Decimal>,
}

impl GrowthSet {
    pub fn from_metrics(metrics: &PeriodMetrics) -> Self {
        let (current, previous) = (&metrics.current, &metrics.previous);
        Self {
            invoices: growth_percent(current.invoice_count.into(), previous.invoice_count.into()),
            valid_invoices: growth_percent(
                current.valid_invoice_count.into(),
                previous.valid_invoice_count.into(),
            ),
            products: growth_percent(current.total_products, previous.total_products),
            revenue: growth_percent(current.total_revenue, previous.total_revenue),
        }
    }
}
