// Editable, in-progress invoice held by an authoring client.
//
// Every operation takes `&self` and returns a new draft; nothing mutates a
// shared value. A draft may be invalid at any point; it only has to pass the
// submission rules once it is turned into an `InvoiceSubmission`.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::invoice::Invoice;
use super::submission::InvoiceSubmission;
use crate::modules::invoices::services::totals::{self, InvoiceTotals};

/// Currency preselected on a new draft
pub const DEFAULT_DRAFT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("No item at index {0}")]
    ItemOutOfRange(usize),

    #[error("Item {item} has no tax at index {tax}")]
    TaxOutOfRange { item: usize, tax: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxDraft {
    pub title: String,
    pub rate: Decimal,
}

impl Default for TaxDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            rate: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub taxes: Vec<TaxDraft>,
}

impl Default for ItemDraft {
    /// Blank line as added by "Add Item": quantity 1, nothing else filled in
    fn default() -> Self {
        Self {
            name: String::new(),
            price: Decimal::ZERO,
            quantity: 1,
            taxes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub date: String,
    pub number: String,
    pub currency: String,
    pub items: Vec<ItemDraft>,
}

impl InvoiceDraft {
    /// Empty draft dated `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            number: String::new(),
            currency: DEFAULT_DRAFT_CURRENCY.to_string(),
            items: Vec::new(),
        }
    }

    /// Draft for editing a persisted invoice
    pub fn from_invoice(invoice: &Invoice) -> Self {
        Self {
            date: invoice.date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            number: invoice.number.clone(),
            currency: invoice.currency.to_string(),
            items: invoice
                .items
                .iter()
                .map(|item| ItemDraft {
                    name: item.name.clone(),
                    price: item.price,
                    quantity: i64::from(item.quantity),
                    taxes: item
                        .taxes
                        .iter()
                        .map(|tax| TaxDraft {
                            title: tax.title.clone(),
                            rate: tax.rate,
                        })
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn with_date(&self, date: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            ..self.clone()
        }
    }

    pub fn with_number(&self, number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            ..self.clone()
        }
    }

    pub fn with_currency(&self, currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
            ..self.clone()
        }
    }

    /// Append a blank item
    pub fn add_item(&self) -> Self {
        let mut items = self.items.clone();
        items.push(ItemDraft::default());
        self.with_items(items)
    }

    /// Insert `item` before `index`; `index == len` appends
    pub fn insert_item(&self, index: usize, item: ItemDraft) -> Result<Self, DraftError> {
        if index > self.items.len() {
            return Err(DraftError::ItemOutOfRange(index));
        }
        let mut items = self.items.clone();
        items.insert(index, item);
        Ok(self.with_items(items))
    }

    pub fn replace_item(&self, index: usize, item: ItemDraft) -> Result<Self, DraftError> {
        self.check_item(index)?;
        let mut items = self.items.clone();
        items[index] = item;
        Ok(self.with_items(items))
    }

    pub fn remove_item(&self, index: usize) -> Result<Self, DraftError> {
        self.check_item(index)?;
        let mut items = self.items.clone();
        items.remove(index);
        Ok(self.with_items(items))
    }

    /// Append a blank tax to the item at `item_index`
    pub fn add_tax(&self, item_index: usize) -> Result<Self, DraftError> {
        self.check_item(item_index)?;
        let mut item = self.items[item_index].clone();
        item.taxes.push(TaxDraft::default());
        self.replace_item(item_index, item)
    }

    pub fn replace_tax(
        &self,
        item_index: usize,
        tax_index: usize,
        tax: TaxDraft,
    ) -> Result<Self, DraftError> {
        self.check_tax(item_index, tax_index)?;
        let mut item = self.items[item_index].clone();
        item.taxes[tax_index] = tax;
        self.replace_item(item_index, item)
    }

    pub fn remove_tax(&self, item_index: usize, tax_index: usize) -> Result<Self, DraftError> {
        self.check_tax(item_index, tax_index)?;
        let mut item = self.items[item_index].clone();
        item.taxes.remove(tax_index);
        self.replace_item(item_index, item)
    }

    /// Live preview of the invoice figures
    pub fn totals(&self) -> InvoiceTotals {
        totals::invoice_totals(&self.items)
    }

    /// Submission ready for validation
    pub fn to_submission(&self) -> InvoiceSubmission {
        InvoiceSubmission {
            date: Value::String(self.date.clone()),
            number: Value::String(self.number.clone()),
            currency: Value::String(self.currency.clone()),
            items: Value::Array(
                self.items
                    .iter()
                    .map(|item| {
                        json!({
                            "name": item.name,
                            "price": decimal_to_json(item.price),
                            "quantity": item.quantity,
                            "taxes": item
                                .taxes
                                .iter()
                                .map(|tax| json!({
                                    "title": tax.title,
                                    "rate": decimal_to_json(tax.rate),
                                }))
                                .collect::<Vec<_>>(),
                        })
                    })
                    .collect(),
            ),
        }
    }

    fn with_items(&self, items: Vec<ItemDraft>) -> Self {
        Self {
            items,
            ..self.clone()
        }
    }

    fn check_item(&self, index: usize) -> Result<(), DraftError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(DraftError::ItemOutOfRange(index))
        }
    }

    fn check_tax(&self, item_index: usize, tax_index: usize) -> Result<(), DraftError> {
        self.check_item(item_index)?;
        if tax_index < self.items[item_index].taxes.len() {
            Ok(())
        } else {
            Err(DraftError::TaxOutOfRange {
                item: item_index,
                tax: tax_index,
            })
        }
    }
}

/// JSON number with the same decimal digits as `value`
fn decimal_to_json(value: Decimal) -> Value {
    serde_json::from_str(&value.normalize().to_string()).unwrap_or(Value::Null)
}
