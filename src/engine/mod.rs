//! Bonus computation engine.
//!
//! Folds a flat stream of invoice lines into per-salesperson metrics for a
//! current and previous period, derives period-over-period growth, and projects
//! the tiered commission bonus. Everything here is pure computation over data
//! already fetched by the caller; no I/O happens in this module.

pub mod aggregate;
pub mod growth;
pub mod projection;
pub mod report;
pub mod window;

use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

pub use aggregate::{InvoiceLine, PeriodMetrics, SalespersonMetrics, SALE_INVOICE_TYPE, aggregate};
pub use growth::{GrowthSet, growth_percent};
pub use projection::{AchievedTier, BonusProjection, NextTier, project};
pub use report::{assemble, build_report};
pub use window::{DateRange, Period, PeriodSide, PeriodWindow};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid period window: {0}")]
    InvalidWindow(String),

    #[error("Malformed invoice line in invoice {invoice_id}: {field} is missing or not a number")]
    MalformedInvoiceLine {
        invoice_id: String,
        field: &'static str,
    },
}

/// Two decimal places, half away from zero.
pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
