// InvoiceRepository: storage of the invoice aggregate
//
// Implements:
// - Create invoice with items and taxes (transactional)
// - Read invoice by ID with items and taxes
// - List every invoice with items and taxes
// - Replace an invoice's fields and whole item subtree (transactional)
// - Delete an invoice, cascading to items and taxes

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, MySql, MySqlPool, Transaction};
use uuid::Uuid;

use super::timestamp_now;
use crate::core::{AppError, CurrencyCode, Result};
use crate::modules::invoices::models::{Invoice, Item, Tax, ValidatedInvoice};

/// Storage for invoices and their owned items and taxes
///
/// Every method is one atomic unit: a failure leaves no partial aggregate
/// visible to readers.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Persist a new invoice, assigning ids to it and every item and tax
    async fn create(&self, invoice: &ValidatedInvoice) -> Result<Invoice>;

    /// Invoice with items and taxes, `None` if the id is unknown
    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>>;

    /// Every invoice, newest first
    async fn list(&self) -> Result<Vec<Invoice>>;

    /// Replace fields and the whole item subtree, keeping the invoice id
    ///
    /// Returns `None` without touching storage when the id is unknown.
    async fn replace(&self, id: &str, invoice: &ValidatedInvoice) -> Result<Option<Invoice>>;

    /// Remove the invoice and its subtree; `false` if the id is unknown
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// MySQL-backed repository
#[derive(Clone)]
pub struct MySqlInvoiceRepository {
    pool: MySqlPool,
}

impl MySqlInvoiceRepository {
    /// Create a new invoice repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Insert every item and tax of `invoice` within an existing transaction
    async fn insert_items(tx: &mut Transaction<'_, MySql>, invoice: &Invoice) -> Result<()> {
        for (item_order, item) in invoice.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO items (id, invoice_id, sort_order, name, price, quantity)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&item.id)
            .bind(&invoice.id)
            .bind(sort_order(item_order)?)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut **tx)
            .await?;

            for (tax_order, tax) in item.taxes.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO taxes (id, item_id, sort_order, title, rate)
                    VALUES (?, ?, ?, ?, ?)
                    "#,
                )
                .bind(&tax.id)
                .bind(&item.id)
                .bind(sort_order(tax_order)?)
                .bind(&tax.title)
                .bind(tax.rate)
                .execute(&mut **tx)
                .await?;
            }
        }

        Ok(())
    }
}

#[async_trait]
impl InvoiceRepository for MySqlInvoiceRepository {
    async fn create(&self, invoice: &ValidatedInvoice) -> Result<Invoice> {
        let now = timestamp_now();
        let created = Invoice::assemble(Uuid::new_v4().to_string(), invoice, now, now);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, invoice_date, invoice_number, currency, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created.id)
        .bind(created.date)
        .bind(&created.number)
        .bind(created.currency.as_str())
        .bind(created.created_at)
        .bind(created.updated_at)
        .execute(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, &created).await?;

        tx.commit().await?;

        tracing::debug!(
            invoice_id = %created.id,
            items = created.items.len(),
            "Invoice inserted"
        );

        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Invoice>> {
        // One snapshot for all three levels so a concurrent replace or
        // delete is seen entirely or not at all
        let mut tx = self.pool.begin().await?;

        let invoice_row = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_date, invoice_number, currency, created_at, updated_at
            FROM invoices
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(invoice_row) = invoice_row else {
            tx.rollback().await?;
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, invoice_id, name, price, quantity
            FROM items
            WHERE invoice_id = ?
            ORDER BY sort_order
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let tax_rows = sqlx::query_as::<_, TaxRow>(
            r#"
            SELECT t.id, t.item_id, t.title, t.rate
            FROM taxes t
            INNER JOIN items i ON i.id = t.item_id
            WHERE i.invoice_id = ?
            ORDER BY t.item_id, t.sort_order
            "#,
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut invoices = assemble_rows(vec![invoice_row], item_rows, tax_rows)?;
        Ok(invoices.pop())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let mut tx = self.pool.begin().await?;

        let invoice_rows = sqlx::query_as::<_, InvoiceRow>(
            r#"
            SELECT id, invoice_date, invoice_number, currency, created_at, updated_at
            FROM invoices
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT id, invoice_id, name, price, quantity
            FROM items
            ORDER BY invoice_id, sort_order
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        let tax_rows = sqlx::query_as::<_, TaxRow>(
            r#"
            SELECT id, item_id, title, rate
            FROM taxes
            ORDER BY item_id, sort_order
            "#,
        )
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        assemble_rows(invoice_rows, item_rows, tax_rows)
    }

    async fn replace(&self, id: &str, invoice: &ValidatedInvoice) -> Result<Option<Invoice>> {
        let mut tx = self.pool.begin().await?;

        // Lock the row so a concurrent delete cannot interleave
        let existing: Option<(DateTime<Utc>,)> =
            sqlx::query_as("SELECT created_at FROM invoices WHERE id = ? FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((created_at,)) = existing else {
            tx.rollback().await?;
            return Ok(None);
        };

        // Taxes go with their items through the foreign key cascade
        sqlx::query("DELETE FROM items WHERE invoice_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let replaced = Invoice::assemble(id.to_string(), invoice, created_at, timestamp_now());

        sqlx::query(
            r#"
            UPDATE invoices
            SET invoice_date = ?, invoice_number = ?, currency = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(replaced.date)
        .bind(&replaced.number)
        .bind(replaced.currency.as_str())
        .bind(replaced.updated_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        Self::insert_items(&mut tx, &replaced).await?;

        tx.commit().await?;

        Ok(Some(replaced))
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn sort_order(position: usize) -> Result<i32> {
    i32::try_from(position)
        .map_err(|_| AppError::internal(format!("Position {} exceeds column range", position)))
}

// Helper structs for database mapping

#[derive(Debug, FromRow)]
struct InvoiceRow {
    id: String,
    invoice_date: DateTime<Utc>,
    invoice_number: String,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    invoice_id: String,
    name: String,
    price: Decimal,
    quantity: i32,
}

#[derive(Debug, FromRow)]
struct TaxRow {
    id: String,
    item_id: String,
    title: String,
    rate: Decimal,
}

/// Stitch flat rows back into aggregates, keeping the row order of each level
fn assemble_rows(
    invoice_rows: Vec<InvoiceRow>,
    item_rows: Vec<ItemRow>,
    tax_rows: Vec<TaxRow>,
) -> Result<Vec<Invoice>> {
    let mut taxes_by_item: HashMap<String, Vec<Tax>> = HashMap::new();
    for row in tax_rows {
        taxes_by_item.entry(row.item_id).or_default().push(Tax {
            id: row.id,
            rate: row.rate.normalize(),
            title: row.title,
        });
    }

    let mut items_by_invoice: HashMap<String, Vec<Item>> = HashMap::new();
    for row in item_rows {
        let taxes = taxes_by_item.remove(&row.id).unwrap_or_default();
        items_by_invoice.entry(row.invoice_id).or_default().push(Item {
            id: row.id,
            name: row.name,
            price: row.price.normalize(),
            quantity: row.quantity,
            taxes,
        });
    }

    invoice_rows
        .into_iter()
        .map(|row| {
            let currency = CurrencyCode::try_from(row.currency).map_err(|e| {
                AppError::internal(format!("Invalid currency in database: {}", e))
            })?;

            Ok(Invoice {
                items: items_by_invoice.remove(&row.id).unwrap_or_default(),
                id: row.id,
                date: row.invoice_date,
                number: row.invoice_number,
                currency,
                created_at: row.created_at,
                updated_at: row.updated_at,
            })
        })
        .collect()
}
