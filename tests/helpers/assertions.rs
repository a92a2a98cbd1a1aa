// Assertions over JSON response bodies

use serde_json::Value;

/// Assert the standard error envelope with `status` as its code
pub fn assert_error_body(body: &Value, status: u16) {
    assert_eq!(
        body["error"]["code"].as_u64(),
        Some(u64::from(status)),
        "unexpected error body: {}",
        body
    );
    assert!(
        body["error"]["message"].is_string(),
        "error message missing: {}",
        body
    );
}

/// Messages reported for `field` (dotted path, e.g. `items[0].price`)
pub fn field_messages(body: &Value, field: &str) -> Vec<String> {
    body["error"]["fields"]
        .as_array()
        .map(|fields| {
            fields
                .iter()
                .filter(|f| f["field"] == field)
                .filter_map(|f| f["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Assert that validation reported `message` for `field`
pub fn assert_field_error(body: &Value, field: &str, message: &str) {
    let messages = field_messages(body, field);
    assert!(
        messages.iter().any(|m| m == message),
        "expected '{}' for {}, got {:?} in {}",
        message,
        field,
        messages,
        body
    );
}

/// Decimal-valued JSON number compared by its f64 value
pub fn assert_amount(value: &Value, expected: f64) {
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("expected a number, got {}", value));
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
