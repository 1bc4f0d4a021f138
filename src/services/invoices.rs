// src/services/invoices.rs

use crate::{engine::DateRange, errors::AppResult, models::RawInvoiceLine};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceQuery {
    pub range: DateRange,
    /// Allowed sale channels (`invoices.mode`)
    pub sale_modes: Vec<i32>,
    pub salesperson_id: Option<i32>,
}

/// Supplies invoice-detail rows for a time range.
#[async_trait]
pub trait InvoiceSource: Send + Sync {
    async fn fetch_lines(&self, query: &InvoiceQuery) -> AppResult<Vec<RawInvoiceLine>>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> AppResult<()>;
}

#[derive(Clone)]
pub struct PgInvoiceSource {
    db: PgPool,
}

impl PgInvoiceSource {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl InvoiceSource for PgInvoiceSource {
    async fn fetch_lines(&self, query: &InvoiceQuery) -> AppResult<Vec<RawInvoiceLine>> {
        let lines = sqlx::query_as::<_, RawInvoiceLine>(
            r#"SELECT
                i.id AS invoice_id,
                i.sale_id,
                i.date,
                i.type AS invoice_type,
                idt.quantity,
                idt.money
               FROM invoices i
               JOIN invoice_details idt ON idt.invoice_id = i.id
               WHERE i.date BETWEEN $1 AND $2
                 AND i.mode = ANY($3)
                 AND i.is_deleted = FALSE
                 AND ($4::int IS NULL OR i.sale_id = $4)
               ORDER BY i.id, idt.id"#,
        )
        .bind(query.range.start)
        .bind(query.range.end)
        .bind(&query.sale_modes)
        .bind(query.salesperson_id)
        .fetch_all(&self.db)
        .await?;

        debug!(
            "Fetched {} invoice lines between {} and {}",
            lines.len(),
            query.range.start,
            query.range.end
        );

        Ok(lines)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").fetch_one(&self.db).await?;
        Ok(())
    }
}
