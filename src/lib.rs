//! Invoicer: invoice management service
//!
//! Validation, totals and persistence of invoices with line items and
//! per-item taxes, exposed as a JSON API over actix-web.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

use std::sync::Arc;

use actix_web::web;

use crate::config::{StorageBackend, StorageConfig};
use crate::core::{AppError, Result};
use crate::modules::invoices::{
    InMemoryInvoiceRepository, InvoiceRepository, InvoiceService, MySqlInvoiceRepository,
};

// Re-export commonly used types
pub use modules::invoices;

/// Largest JSON body accepted by the API
pub const JSON_BODY_LIMIT: usize = 1024 * 1024;

/// JSON extractor settings shared by every route
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(middleware::json_error_handler)
}

/// Register every route of the API
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    modules::health::controllers::configure(cfg);
    modules::invoices::controllers::configure(cfg);
}

/// Build the invoice service on top of the configured storage backend
///
/// For MySQL this opens the pool and, unless disabled, applies migrations.
pub async fn build_invoice_service(storage: &StorageConfig) -> Result<Arc<InvoiceService>> {
    let repository: Arc<dyn InvoiceRepository> = match storage.backend {
        StorageBackend::MySql => {
            let database = storage
                .database
                .as_ref()
                .ok_or_else(|| AppError::configuration("DATABASE_URL not set"))?;

            let pool = database.create_pool().await?;
            tracing::info!(
                min_connections = database.pool_size,
                max_connections = database.max_connections,
                "Database pool initialized"
            );

            if database.run_migrations {
                config::database::run_migrations(&pool).await?;
            }

            Arc::new(MySqlInvoiceRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; invoices are lost on restart");
            Arc::new(InMemoryInvoiceRepository::new())
        }
    };

    Ok(Arc::new(InvoiceService::new(
        repository,
        storage.operation_timeout,
    )))
}
