// src/openapi.rs

use crate::{
    engine::{DateRange, Period, PeriodWindow},
    models::{BonusReportRequest, BonusReportRow},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bonus Report API",
        version = "0.1.0",
        description = "Sales bonus reporting. Aggregates invoices per salesperson for the \
            current and previous period, reports period-over-period growth, and projects \
            the tiered commission bonus from each salesperson's pay-rate template.",
        license(name = "MIT")
    ),
    paths(crate::handlers::bonus_report::bonus_report),
    components(schemas(BonusReportRequest, BonusReportRow, Period, PeriodWindow, DateRange)),
    tags((name = "Bonus Report", description = "Per-salesperson growth and bonus projection"))
)]
pub struct ApiDoc;
