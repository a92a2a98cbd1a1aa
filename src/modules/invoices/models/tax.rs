use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validated::ValidatedTax;

/// Percentage surcharge owned by exactly one item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    /// Assigned when the owning invoice is persisted
    pub id: String,

    /// Percentage in `[0, 100]`
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,

    pub title: String,
}

impl Tax {
    /// New tax record with a freshly assigned id
    pub fn from_validated(tax: &ValidatedTax) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            rate: tax.rate(),
            title: tax.title().to_string(),
        }
    }
}
