// src/engine/aggregate.rs

use super::{EngineError, PeriodSide, PeriodWindow};
use crate::models::RawInvoiceLine;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Invoice type of a sale; every other type reverses (returns) quantity and money.
pub const SALE_INVOICE_TYPE: i32 = 2;

/// Net quantity an invoice needs to count as a valid invoice.
const VALID_INVOICE_MIN_QUANTITY: Decimal = dec!(2);

/// Invoices with no salesperson are attributed to this id; it never matches a user.
pub const UNASSIGNED_SALESPERSON: &str = "0";

/// One validated invoice-detail row. Invoice-level fields are denormalized onto the line.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceLine {
    pub invoice_id: String,
    pub salesperson_id: String,
    pub date: DateTime<Utc>,
    pub invoice_type: i32,
    pub quantity: Decimal,
    pub line_amount: Decimal,
}

impl InvoiceLine {
    pub fn is_sale(&self) -> bool {
        self.invoice_type == SALE_INVOICE_TYPE
    }

    pub fn signed_quantity(&self) -> Decimal {
        if self.is_sale() { self.quantity } else { -self.quantity }
    }

    pub fn signed_amount(&self) -> Decimal {
        if self.is_sale() { self.line_amount } else { -self.line_amount }
    }
}

impl TryFrom<RawInvoiceLine> for InvoiceLine {
    type Error = EngineError;

    fn try_from(raw: RawInvoiceLine) -> Result<Self, Self::Error> {
        let invoice_id = raw.invoice_id.to_string();
        let malformed = |field| EngineError::MalformedInvoiceLine {
            invoice_id: invoice_id.clone(),
            field,
        };

        let quantity = raw.quantity.ok_or_else(|| malformed("quantity"))?;
        let line_amount = raw.money.ok_or_else(|| malformed("money"))?;
        let date = raw.date.ok_or_else(|| malformed("date"))?;

        Ok(InvoiceLine {
            salesperson_id: raw
                .sale_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| UNASSIGNED_SALESPERSON.to_string()),
            invoice_id,
            date,
            invoice_type: raw.invoice_type,
            quantity,
            line_amount,
        })
    }
}

/// Metrics of one salesperson over one period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalespersonMetrics {
    pub invoice_count: u32,
    pub valid_invoice_count: u32,
    pub total_products: Decimal,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodMetrics {
    pub current: SalespersonMetrics,
    pub previous: SalespersonMetrics,
}

#[derive(Default)]
struct Bucket<'a> {
    invoices: HashSet<&'a str>,
    products: Decimal,
    revenue: Decimal,
}

impl Bucket<'_> {
    fn finish(self, net_quantity: &HashMap<&str, Decimal>) -> SalespersonMetrics {
        let valid = self
            .invoices
            .iter()
            .filter(|id| {
                net_quantity
                    .get(*id)
                    .is_some_and(|qty| *qty >= VALID_INVOICE_MIN_QUANTITY)
            })
            .count();

        SalespersonMetrics {
            invoice_count: self.invoices.len() as u32,
            valid_invoice_count: valid as u32,
            total_products: self.products,
            total_revenue: self.revenue,
        }
    }
}

/// Fold invoice lines into current/previous metrics per salesperson.
///
/// An invoice is valid when its net signed quantity across all of its lines is
/// at least 2. That net quantity is computed once per invoice over the whole
/// input, not per period.
pub fn aggregate(
    lines: &[InvoiceLine],
    window: &PeriodWindow,
) -> Result<BTreeMap<String, PeriodMetrics>, EngineError> {
    window.validate()?;

    let mut net_quantity: HashMap<&str, Decimal> = HashMap::new();
    for line in lines {
        *net_quantity.entry(line.invoice_id.as_str()).or_default() += line.signed_quantity();
    }

    let mut buckets: BTreeMap<&str, (Bucket, Bucket)> = BTreeMap::new();
    for line in lines {
        let (current, previous) = buckets.entry(line.salesperson_id.as_str()).or_default();
        let bucket = match window.classify(line.date) {
            PeriodSide::Current => current,
            PeriodSide::Previous => previous,
        };
        bucket.invoices.insert(line.invoice_id.as_str());
        bucket.products += line.signed_quantity();
        bucket.revenue += line.signed_amount();
    }

    debug!(
        "Aggregated {} lines into {} invoices across {} salespeople",
        lines.len(),
        net_quantity.len(),
        buckets.len()
    );

    Ok(buckets
        .into_iter()
        .map(|(salesperson_id, (current, previous))| {
            (
                salesperson_id.to_string(),
                PeriodMetrics {
                    current: current.finish(&net_quantity),
                    previous: previous.finish(&net_quantity),
                },
            )
        })
        .collect())
}
