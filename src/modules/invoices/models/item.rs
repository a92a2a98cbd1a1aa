// A line item on an invoice: name, unit price, quantity and its taxes.
//
// Items are owned by one invoice and are never updated in place; an invoice
// update replaces the whole item list with freshly identified records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tax::Tax;
use super::validated::ValidatedItem;

/// Persisted line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Assigned when the owning invoice is persisted
    pub id: String,

    pub name: String,

    /// Price per unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    pub quantity: i32,

    /// Taxes in submission order
    #[serde(default)]
    pub taxes: Vec<Tax>,
}

impl Item {
    /// New item record, with fresh ids for the item and each of its taxes
    pub fn from_validated(item: &ValidatedItem) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: item.name().to_string(),
            price: item.price(),
            quantity: item.quantity(),
            taxes: item.taxes().iter().map(Tax::from_validated).collect(),
        }
    }
}
