use crate::{
    config::Config,
    services::{
        directory::{IdentityDirectory, PgIdentityDirectory},
        invoices::{InvoiceSource, PgInvoiceSource},
    },
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub invoices: Arc<dyn InvoiceSource>,
    pub directory: Arc<dyn IdentityDirectory>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self::with_sources(
            config,
            Arc::new(PgInvoiceSource::new(db.clone())),
            Arc::new(PgIdentityDirectory::new(db)),
        )
    }

    pub fn with_sources(
        config: Config,
        invoices: Arc<dyn InvoiceSource>,
        directory: Arc<dyn IdentityDirectory>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            invoices,
            directory,
        }
    }
}
