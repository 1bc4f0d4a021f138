//! Sales bonus reporting service.
//!
//! The [`engine`] module holds the pure computation (aggregation, growth,
//! tiered bonus projection); everything else wires it to Postgres and HTTP.

pub mod config;
pub mod engine;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
