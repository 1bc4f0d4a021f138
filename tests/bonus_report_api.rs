use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use bonus_report::{
    config::Config,
    errors::AppResult,
    models::{CommissionTier, RawInvoiceLine, SalespersonProfile},
    routes::app,
    services::{
        directory::IdentityDirectory,
        invoices::{InvoiceQuery, InvoiceSource},
    },
    state::AppState,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

struct StaticInvoices {
    lines: Vec<RawInvoiceLine>,
    queries: Mutex<Vec<InvoiceQuery>>,
}

#[async_trait]
impl InvoiceSource for StaticInvoices {
    async fn fetch_lines(&self, query: &InvoiceQuery) -> AppResult<Vec<RawInvoiceLine>> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(self
            .lines
            .iter()
            .filter(|l| query.salesperson_id.is_none() || l.sale_id == query.salesperson_id)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

struct StaticDirectory {
    profiles: Vec<SalespersonProfile>,
}

#[async_trait]
impl IdentityDirectory for StaticDirectory {
    async fn lookup(&self, salesperson_ids: &[String]) -> AppResult<Vec<SalespersonProfile>> {
        Ok(self
            .profiles
            .iter()
            .filter(|p| salesperson_ids.contains(&p.id))
            .cloned()
            .collect())
    }
}

fn config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        database_url: String::new(),
        database_max_connections: 1,
        sale_modes: vec![1, 2],
        utc_offset_hours: 7,
        excluded_name: Some("bee".to_string()),
    }
}

fn sale(invoice_id: i64, sale_id: i32, date: DateTime<Utc>, quantity: Decimal, money: Decimal) -> RawInvoiceLine {
    RawInvoiceLine {
        invoice_id,
        sale_id: Some(sale_id),
        date: Some(date),
        invoice_type: 2,
        quantity: Some(quantity),
        money: Some(money),
    }
}

fn ladder() -> Vec<CommissionTier> {
    vec![
        CommissionTier { threshold_amount: dec!(100000), bonus_rate: dec!(3) },
        CommissionTier { threshold_amount: dec!(500000), bonus_rate: dec!(5) },
    ]
}

fn profile(id: &str, name: &str) -> SalespersonProfile {
    SalespersonProfile {
        id: id.to_string(),
        name: name.to_string(),
        tiers: ladder(),
    }
}

fn setup(lines: Vec<RawInvoiceLine>) -> (AppState, Arc<StaticInvoices>) {
    let invoices = Arc::new(StaticInvoices {
        lines,
        queries: Mutex::new(Vec::new()),
    });
    let directory = Arc::new(StaticDirectory {
        profiles: vec![profile("42", "Nguyen Van A"), profile("8", "Bee Warehouse")],
    });
    let state = AppState::with_sources(config(), invoices.clone(), directory);
    (state, invoices)
}

async fn post_report(state: AppState, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/bonus-report")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn month_report_counts_current_invoices() {
    let now = Utc::now();
    let (state, invoices) = setup(vec![
        sale(1, 42, now, dec!(3), dec!(300000)),
        sale(2, 42, now, dec!(1), dec!(50000)),
    ]);

    let (status, body) = post_report(state, json!({ "period": "month" })).await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(row["saleId"], "42");
    assert_eq!(row["name"], "Nguyen Van A");
    assert_eq!(row["currentTotalInvoices"], 2);
    assert_eq!(row["currentValidInvoices"], 1);
    assert_eq!(row["currentTotalProducts"].as_f64(), Some(4.0));
    assert_eq!(row["currentTotalRevenues"].as_f64(), Some(350000.0));
    assert_eq!(row["lastTotalInvoices"], 0);
    assert!(row["growthRevenuesPercent"].is_null());
    assert_eq!(row["currentTargetAmount"].as_f64(), Some(100000.0));
    assert_eq!(row["currentBonus"].as_f64(), Some(10500.0));
    assert_eq!(row["nextTargetShortfall"].as_f64(), Some(150000.0));
    assert_eq!(row["nextBonus"].as_f64(), Some(25000.0));

    let queries = invoices.queries.lock().unwrap();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].sale_modes, vec![1, 2]);
    assert_eq!(queries[0].salesperson_id, None);
    assert!(queries[0].range.start < queries[0].range.end);
}

#[tokio::test]
async fn explicit_window_compares_periods() {
    let window = json!({
        "current": { "start": "2025-10-01T00:00:00Z", "end": "2025-10-16T23:59:59Z" },
        "previous": { "start": "2025-09-01T00:00:00Z", "end": "2025-09-16T23:59:59Z" }
    });
    let current: DateTime<Utc> = "2025-10-10T08:00:00Z".parse().unwrap();
    let previous: DateTime<Utc> = "2025-09-10T08:00:00Z".parse().unwrap();
    let (state, _) = setup(vec![
        sale(1, 42, current, dec!(2), dec!(110000)),
        sale(2, 42, previous, dec!(2), dec!(100000)),
    ]);

    let (status, body) = post_report(state, json!({ "window": window })).await;

    assert_eq!(status, StatusCode::OK);
    let row = &body[0];
    assert_eq!(row["currentValidInvoices"], 1);
    assert_eq!(row["lastValidInvoices"], 1);
    assert_eq!(row["growthRevenuesPercent"].as_f64(), Some(10.0));
    assert_eq!(row["growthInvoicesPercent"].as_f64(), Some(0.0));
    assert_eq!(row["targetPercent"].as_f64(), Some(110.0));
}

#[tokio::test]
async fn unknown_and_excluded_salespeople_are_left_out() {
    let now = Utc::now();
    let (state, _) = setup(vec![
        sale(1, 42, now, dec!(2), dec!(1000)),
        sale(2, 77, now, dec!(2), dec!(1000)),
        sale(3, 8, now, dec!(2), dec!(1000)),
    ]);

    let (status, body) = post_report(state, json!({})).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["saleId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["42"]);
}

#[tokio::test]
async fn user_filter_is_passed_to_the_source() {
    let now = Utc::now();
    let (state, invoices) = setup(vec![sale(1, 42, now, dec!(2), dec!(1000))]);

    let (status, body) = post_report(state, json!({ "period": "week", "userId": 42 })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(invoices.queries.lock().unwrap()[0].salesperson_id, Some(42));
}

#[tokio::test]
async fn inverted_window_is_a_bad_request() {
    let window = json!({
        "current": { "start": "2025-10-16T00:00:00Z", "end": "2025-10-01T00:00:00Z" },
        "previous": { "start": "2025-09-01T00:00:00Z", "end": "2025-09-16T23:59:59Z" }
    });
    let (state, invoices) = setup(vec![]);

    let (status, body) = post_report(state, json!({ "window": window })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], 400);
    assert!(invoices.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_line_fails_the_report() {
    let mut broken = sale(981, 42, Utc::now(), dec!(1), dec!(10));
    broken.quantity = None;
    let (state, _) = setup(vec![sale(1, 42, Utc::now(), dec!(2), dec!(10)), broken]);

    let (status, body) = post_report(state, json!({})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("981"));
    assert!(message.contains("quantity"));
}

#[tokio::test]
async fn health_reports_source_status() {
    let (state, _) = setup(vec![]);

    let response = app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
