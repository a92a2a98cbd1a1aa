use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::core::error::{AppError, Result};
use crate::modules::invoices::models::{Invoice, InvoiceSubmission};
use crate::modules::invoices::repositories::InvoiceRepository;

/// Service for invoice business logic
///
/// Validates submissions, then hands validated data to the repository. Each
/// repository call runs under `operation_timeout` so a stalled database
/// surfaces as an error instead of a hung request.
pub struct InvoiceService {
    invoice_repo: Arc<dyn InvoiceRepository>,
    operation_timeout: Duration,
}

impl InvoiceService {
    pub fn new(invoice_repo: Arc<dyn InvoiceRepository>, operation_timeout: Duration) -> Self {
        Self {
            invoice_repo,
            operation_timeout,
        }
    }

    /// Validate and persist a new invoice
    #[tracing::instrument(skip_all)]
    pub async fn create_invoice(&self, submission: InvoiceSubmission) -> Result<Invoice> {
        let validated = submission.validate()?;

        let invoice = self
            .bounded("create", self.invoice_repo.create(&validated))
            .await?;

        tracing::info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            items = invoice.items.len(),
            "Invoice created"
        );

        Ok(invoice)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_invoice(&self, id: &str) -> Result<Invoice> {
        self.bounded("find", self.invoice_repo.find_by_id(id))
            .await?
            .ok_or_else(|| invoice_not_found(id))
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<Invoice>> {
        self.bounded("list", self.invoice_repo.list()).await
    }

    /// Replace an invoice's fields and items
    ///
    /// Validation runs first, so an invalid submission for an unknown id
    /// reports the validation errors.
    #[tracing::instrument(skip(self, submission))]
    pub async fn update_invoice(&self, id: &str, submission: InvoiceSubmission) -> Result<Invoice> {
        let validated = submission.validate()?;

        let invoice = self
            .bounded("replace", self.invoice_repo.replace(id, &validated))
            .await?
            .ok_or_else(|| invoice_not_found(id))?;

        tracing::info!(invoice_id = %invoice.id, items = invoice.items.len(), "Invoice updated");

        Ok(invoice)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_invoice(&self, id: &str) -> Result<()> {
        if !self.bounded("delete", self.invoice_repo.delete(id)).await? {
            return Err(invoice_not_found(id));
        }

        tracing::info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match tokio::time::timeout(self.operation_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "Invoice storage operation timed out"
                );
                Err(AppError::timeout(format!(
                    "Invoice {} exceeded {:?}",
                    operation, self.operation_timeout
                )))
            }
        }
    }
}

fn invoice_not_found(id: &str) -> AppError {
    AppError::not_found(format!("Invoice {} not found", id))
}
