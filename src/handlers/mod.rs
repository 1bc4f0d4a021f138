pub mod bonus_report;
pub mod general;
