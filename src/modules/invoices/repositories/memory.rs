// In-process invoice storage, used for local runs and the HTTP test suite

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::invoice_repository::InvoiceRepository;
use super::timestamp_now;
use crate::core::Result;
use crate::modules::invoices::models::{Invoice, ValidatedInvoice};

#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<String, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn create(&self, invoice: &ValidatedInvoice) -> Result<Invoice> {
        let now = timestamp_now();
        let created = Invoice::assemble(Uuid::new_v4().to_string(), invoice, now, now);

        self.invoices
            .write()
            .await
            .insert(created.id.clone(), created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        Ok(self.invoices.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self.invoices.read().await.values().cloned().collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn replace(&self, id: &str, invoice: &ValidatedInvoice) -> Result<Option<Invoice>> {
        let mut invoices = self.invoices.write().await;

        let Some(existing) = invoices.get_mut(id) else {
            return Ok(None);
        };

        let replaced =
            Invoice::assemble(id.to_string(), invoice, existing.created_at, timestamp_now());
        *existing = replaced.clone();

        Ok(Some(replaced))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.invoices.write().await.remove(id).is_some())
    }
}
