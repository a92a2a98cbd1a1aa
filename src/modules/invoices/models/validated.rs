// Normalized invoice data that passed every submission rule.
//
// Fields are only writable from the models module, where the submission
// rules live, so holding a `ValidatedInvoice` is proof the data is valid.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::core::CurrencyCode;

/// Invoice accepted for create or update
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedInvoice {
    pub(super) date: DateTime<Utc>,
    pub(super) number: String,
    pub(super) currency: CurrencyCode,
    pub(super) items: Vec<ValidatedItem>,
}

impl ValidatedInvoice {
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Never empty
    pub fn items(&self) -> &[ValidatedItem] {
        &self.items
    }
}

/// Line item accepted as part of a [`ValidatedInvoice`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedItem {
    pub(super) name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(super) price: Decimal,
    pub(super) quantity: i32,
    pub(super) taxes: Vec<ValidatedTax>,
}

impl ValidatedItem {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strictly positive
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Strictly positive
    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn taxes(&self) -> &[ValidatedTax] {
        &self.taxes
    }
}

/// Tax accepted as part of a [`ValidatedItem`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedTax {
    pub(super) title: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub(super) rate: Decimal,
}

impl ValidatedTax {
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Percentage in `[0, 100]`
    pub fn rate(&self) -> Decimal {
        self.rate
    }
}
