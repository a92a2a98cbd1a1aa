// Raw invoice submissions and the rules that promote them to `ValidatedInvoice`.
//
// A submission keeps every leaf as an untyped JSON value so that a wrong type
// in one field is reported next to that field instead of failing the whole
// body. Validation walks the entire structure and records every violation.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SubsecRound, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{Map, Number, Value};

use super::validated::{ValidatedInvoice, ValidatedItem, ValidatedTax};
use crate::core::{CurrencyCode, FieldPath, ValidationErrors};

/// Longest accepted text for names, titles and invoice numbers
pub const MAX_TEXT_LENGTH: usize = 255;

/// Digits after the decimal point kept by storage for prices and rates
pub const MAX_DECIMAL_PLACES: u32 = 10;

pub const MSG_BODY_NOT_OBJECT: &str = "Expected an invoice object";
pub const MSG_INVALID_DATE: &str = "Invalid date format";
pub const MSG_NUMBER_REQUIRED: &str = "Invoice number is required";
pub const MSG_CURRENCY_LENGTH: &str = "Currency must be a 3-letter code";
pub const MSG_ITEMS_REQUIRED: &str = "At least one item is required";
pub const MSG_ITEM_NOT_OBJECT: &str = "Expected an item object";
pub const MSG_NAME_REQUIRED: &str = "Item name is required";
pub const MSG_PRICE_POSITIVE: &str = "Price must be positive";
pub const MSG_QUANTITY_POSITIVE: &str = "Quantity must be a positive integer";
pub const MSG_TAXES_LIST: &str = "Taxes must be a list";
pub const MSG_TAX_NOT_OBJECT: &str = "Expected a tax object";
pub const MSG_TITLE_REQUIRED: &str = "Title is required";
pub const MSG_RATE_RANGE: &str = "Rate must be between 0 and 100";
pub const MSG_EXPECTED_TEXT: &str = "Expected text";
pub const MSG_EXPECTED_NUMBER: &str = "Expected a number";

/// Exclusive upper bound for prices, matching the storage column width
fn max_price() -> Decimal {
    Decimal::from_i128_with_scale(10_i128.pow(20), 0)
}

/// Invoice as submitted by a caller, before any rule has been checked
///
/// Unknown keys (such as ids echoed back by an edit form) are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceSubmission {
    pub date: Value,
    pub number: Value,
    pub currency: Value,
    pub items: Value,
}

impl InvoiceSubmission {
    /// Build a submission from an arbitrary JSON body
    ///
    /// Anything other than a JSON object is rejected before the business
    /// rules run.
    pub fn from_json(body: Value) -> Result<Self, ValidationErrors> {
        match body {
            Value::Object(mut fields) => Ok(Self {
                date: take(&mut fields, "date"),
                number: take(&mut fields, "number"),
                currency: take(&mut fields, "currency"),
                items: take(&mut fields, "items"),
            }),
            _ => Err(ValidationErrors::single(
                FieldPath::root().field("body"),
                MSG_BODY_NOT_OBJECT,
            )),
        }
    }

    /// Check every rule and return the normalized invoice, or all violations
    pub fn validate(&self) -> Result<ValidatedInvoice, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let root = FieldPath::root();

        let date = validate_date(&self.date, root.field("date"), &mut errors);
        let number = validate_text(
            &self.number,
            root.field("number"),
            MSG_NUMBER_REQUIRED,
            &mut errors,
        );
        let currency = validate_currency(&self.currency, root.field("currency"), &mut errors);
        let items = validate_items(&self.items, root.field("items"), &mut errors);

        match (date, number, currency, items) {
            (Some(date), Some(number), Some(currency), Some(items)) if errors.is_empty() => {
                Ok(ValidatedInvoice {
                    date,
                    number,
                    currency,
                    items,
                })
            }
            _ => Err(errors),
        }
    }
}

fn take(fields: &mut Map<String, Value>, key: &str) -> Value {
    fields.remove(key).unwrap_or(Value::Null)
}

/// Fractional-second digits kept, matching the `DATETIME(6)` columns
pub const DATE_PRECISION: u16 = 6;

/// Parse a date/time in any of the common textual forms
///
/// Offsets are honoured; values without one are taken as UTC. Sub-second
/// precision is cut to microseconds. Returns `None` rather than guessing
/// when no form matches.
pub fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    parse_with_offset(text)
        .or_else(|| parse_naive(text))
        .map(|parsed| parsed.trunc_subsecs(DATE_PRECISION))
}

fn parse_with_offset(text: &str) -> Option<DateTime<Utc>> {
    const OFFSET_FORMATS: [&str; 3] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%A %B %d %Y %H:%M:%S GMT%z",
    ];

    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .ok()
        .or_else(|| {
            OFFSET_FORMATS
                .iter()
                .find_map(|format| DateTime::parse_from_str(text, format).ok())
        })
        .map(|parsed| parsed.with_timezone(&Utc))
}

fn parse_naive(text: &str) -> Option<DateTime<Utc>> {
    // %B and %A also accept abbreviated month and weekday names
    const DATE_TIME_FORMATS: [&str; 14] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S%.f",
        "%Y/%m/%d %H:%M",
        "%m/%d/%Y %H:%M:%S%.f",
        "%m/%d/%Y %H:%M",
        "%B %d, %Y %H:%M:%S%.f",
        "%B %d, %Y %H:%M",
        "%B %d %Y %H:%M:%S%.f",
        "%B %d %Y %H:%M",
        "%d %B %Y %H:%M:%S%.f",
        "%A %B %d %Y %H:%M:%S%.f",
    ];
    const DATE_FORMATS: [&str; 7] = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%m/%d/%Y",
        "%B %d, %Y",
        "%B %d %Y",
        "%d %B %Y",
        "%A %B %d %Y",
    ];

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Exact decimal value of a JSON number
pub fn decimal_from_number(number: &Number) -> Option<Decimal> {
    if let Some(integer) = number.as_i64() {
        return Some(Decimal::from(integer));
    }
    if let Some(integer) = number.as_u64() {
        return Some(Decimal::from(integer));
    }
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

fn validate_date(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<DateTime<Utc>> {
    let parsed = value.as_str().and_then(parse_date);
    if parsed.is_none() {
        errors.push(path, MSG_INVALID_DATE);
    }
    parsed
}

fn validate_text(
    value: &Value,
    path: FieldPath,
    required_message: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        Value::String(text) if text.trim().is_empty() => {
            errors.push(path, required_message);
            None
        }
        Value::String(text) if text.chars().count() > MAX_TEXT_LENGTH => {
            errors.push(
                path,
                format!("Must be at most {} characters", MAX_TEXT_LENGTH),
            );
            None
        }
        Value::String(text) => Some(text.clone()),
        Value::Null => {
            errors.push(path, required_message);
            None
        }
        _ => {
            errors.push(path, MSG_EXPECTED_TEXT);
            None
        }
    }
}

fn validate_currency(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<CurrencyCode> {
    match value.as_str().map(CurrencyCode::from_str) {
        Some(Ok(code)) => Some(code),
        Some(Err(_)) | None => {
            errors.push(path, MSG_CURRENCY_LENGTH);
            None
        }
    }
}

/// Numeric value of a field, recording a type error when it is not a number
fn validate_number(
    value: &Value,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    match value {
        Value::Number(number) => {
            let decimal = decimal_from_number(number);
            if decimal.is_none() {
                errors.push(path.clone(), "Number is out of range");
            }
            decimal
        }
        _ => {
            errors.push(path.clone(), MSG_EXPECTED_NUMBER);
            None
        }
    }
}

fn validate_items(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Vec<ValidatedItem>> {
    let Some(entries) = value.as_array() else {
        errors.push(path, MSG_ITEMS_REQUIRED);
        return None;
    };

    if entries.is_empty() {
        errors.push(path, MSG_ITEMS_REQUIRED);
        return None;
    }

    // Validate every item even after a failure so all errors are reported
    let validated: Vec<Option<ValidatedItem>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_item(entry, path.index(index), errors))
        .collect();

    validated.into_iter().collect()
}

fn validate_item(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<ValidatedItem> {
    let Some(fields) = value.as_object() else {
        errors.push(path, MSG_ITEM_NOT_OBJECT);
        return None;
    };

    let name = validate_text(
        fields.get("name").unwrap_or(&Value::Null),
        path.field("name"),
        MSG_NAME_REQUIRED,
        errors,
    );
    let price = validate_price(
        fields.get("price").unwrap_or(&Value::Null),
        path.field("price"),
        errors,
    );
    let quantity = validate_quantity(
        fields.get("quantity").unwrap_or(&Value::Null),
        path.field("quantity"),
        errors,
    );
    let taxes = validate_taxes(
        fields.get("taxes").unwrap_or(&Value::Null),
        path.field("taxes"),
        errors,
    );

    Some(ValidatedItem {
        name: name?,
        price: price?,
        quantity: quantity?,
        taxes: taxes?,
    })
}

fn validate_price(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Decimal> {
    let price = validate_number(value, &path, errors)?;

    if price <= Decimal::ZERO {
        errors.push(path, MSG_PRICE_POSITIVE);
        return None;
    }
    if price >= max_price() {
        errors.push(path, "Price is too large");
        return None;
    }
    if price.normalize().scale() > MAX_DECIMAL_PLACES {
        errors.push(
            path,
            format!("Price must have at most {} decimal places", MAX_DECIMAL_PLACES),
        );
        return None;
    }

    Some(price.normalize())
}

fn validate_quantity(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<i32> {
    let quantity = validate_number(value, &path, errors)?;

    if quantity <= Decimal::ZERO || !quantity.fract().is_zero() {
        errors.push(path, MSG_QUANTITY_POSITIVE);
        return None;
    }

    match quantity.to_i32() {
        Some(quantity) => Some(quantity),
        None => {
            errors.push(path, "Quantity is too large");
            None
        }
    }
}

fn validate_taxes(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<Vec<ValidatedTax>> {
    let entries = match value {
        Value::Null => return Some(Vec::new()),
        Value::Array(entries) => entries,
        _ => {
            errors.push(path, MSG_TAXES_LIST);
            return None;
        }
    };

    let validated: Vec<Option<ValidatedTax>> = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| validate_tax(entry, path.index(index), errors))
        .collect();

    validated.into_iter().collect()
}

fn validate_tax(
    value: &Value,
    path: FieldPath,
    errors: &mut ValidationErrors,
) -> Option<ValidatedTax> {
    let Some(fields) = value.as_object() else {
        errors.push(path, MSG_TAX_NOT_OBJECT);
        return None;
    };

    let title = validate_text(
        fields.get("title").unwrap_or(&Value::Null),
        path.field("title"),
        MSG_TITLE_REQUIRED,
        errors,
    );
    let rate = validate_rate(
        fields.get("rate").unwrap_or(&Value::Null),
        path.field("rate"),
        errors,
    );

    Some(ValidatedTax {
        title: title?,
        rate: rate?,
    })
}

fn validate_rate(value: &Value, path: FieldPath, errors: &mut ValidationErrors) -> Option<Decimal> {
    let rate = validate_number(value, &path, errors)?;

    if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
        errors.push(path, MSG_RATE_RANGE);
        return None;
    }
    if rate.normalize().scale() > MAX_DECIMAL_PLACES {
        errors.push(
            path,
            format!("Rate must have at most {} decimal places", MAX_DECIMAL_PLACES),
        );
        return None;
    }

    Some(rate.normalize())
}
