pub mod bonus_report;
pub mod directory;
pub mod invoices;
