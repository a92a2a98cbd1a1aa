// Invoice aggregate as stored, and the response shape returned to clients.
//
// An invoice owns its items, which own their taxes. Identifiers are assigned
// on persistence and never change; an update keeps the invoice id and
// `created_at` but replaces the whole item subtree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::item::Item;
use super::tax::Tax;
use super::validated::ValidatedInvoice;
use crate::core::CurrencyCode;
use crate::modules::invoices::services::totals::{self, InvoiceTotals, ItemTotals};

/// Persisted invoice with its items and taxes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique invoice ID (UUID)
    pub id: String,

    /// Billing date
    pub date: DateTime<Utc>,

    /// Caller-chosen invoice number
    pub number: String,

    pub currency: CurrencyCode,

    /// Items in submission order
    #[serde(default)]
    pub items: Vec<Item>,

    /// When invoice was created
    pub created_at: DateTime<Utc>,

    /// When invoice was last replaced
    pub updated_at: DateTime<Utc>,
}

impl Invoice {
    /// Build a new aggregate from validated data
    ///
    /// Every item and tax gets a fresh id; the invoice id and timestamps are
    /// supplied by the repository so an update can keep the original ones.
    pub fn assemble(
        id: String,
        invoice: &ValidatedInvoice,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            date: invoice.date(),
            number: invoice.number().to_string(),
            currency: invoice.currency().clone(),
            items: invoice.items().iter().map(Item::from_validated).collect(),
            created_at,
            updated_at,
        }
    }

    /// Subtotal, tax and grand total over all items
    pub fn totals(&self) -> InvoiceTotals {
        totals::invoice_totals(&self.items)
    }
}

/// Exact totals for one item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemTotalsResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub line_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

impl From<ItemTotals> for ItemTotalsResponse {
    fn from(totals: ItemTotals) -> Self {
        Self {
            line_total: totals.line_total,
            tax_total: totals.tax_total,
            total: totals.grand_total,
        }
    }
}

/// Exact totals for the whole invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalsResponse {
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Totals rounded for presentation, e.g. `"35.96 USD"`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayTotals {
    pub subtotal: String,
    pub tax_total: String,
    pub total: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemResponse {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
    pub taxes: Vec<Tax>,
    pub totals: ItemTotalsResponse,
}

/// Invoice as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    pub id: String,
    pub date: String,
    pub number: String,
    pub currency: String,
    pub items: Vec<ItemResponse>,
    pub totals: TotalsResponse,
    pub display: DisplayTotals,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        let invoice_totals = invoice.totals();
        let display = DisplayTotals {
            subtotal: invoice.currency.format_amount(invoice_totals.subtotal),
            tax_total: invoice.currency.format_amount(invoice_totals.tax_total),
            total: invoice.currency.format_amount(invoice_totals.grand_total),
        };

        Self {
            id: invoice.id,
            date: invoice.date.to_rfc3339(),
            number: invoice.number,
            currency: invoice.currency.to_string(),
            items: invoice
                .items
                .into_iter()
                .map(|item| {
                    let item_totals = totals::item_totals(&item);
                    ItemResponse {
                        id: item.id,
                        name: item.name,
                        price: item.price,
                        quantity: item.quantity,
                        taxes: item.taxes,
                        totals: item_totals.into(),
                    }
                })
                .collect(),
            totals: TotalsResponse {
                subtotal: invoice_totals.subtotal,
                tax_total: invoice_totals.tax_total,
                total: invoice_totals.grand_total,
            },
            display,
            created_at: invoice.created_at.to_rfc3339(),
            updated_at: invoice.updated_at.to_rfc3339(),
        }
    }
}
