// Invoice lifecycle scenarios through InvoiceService
//
// Create, replace, delete and list against in-memory storage.

#[path = "../helpers/mod.rs"]
mod helpers;

use helpers::*;
use invoicer::core::AppError;
use invoicer::invoices::models::InvoiceSubmission;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

fn submission(body: Value) -> InvoiceSubmission {
    InvoiceSubmission::from_json(body).expect("test payload is an object")
}

#[tokio::test]
async fn test_create_assigns_ids_and_echoes_fields() {
    let service = memory_service();

    let invoice = service
        .create_invoice(submission(TestDataFactory::invoice_payload()))
        .await
        .unwrap();

    assert!(!invoice.id.is_empty());
    assert_eq!(invoice.date.to_rfc3339(), "2024-01-15T10:00:00+00:00");
    assert_eq!(invoice.number, "INV-001");
    assert_eq!(invoice.currency.as_str(), "USD");
    assert_eq!(invoice.created_at, invoice.updated_at);

    let item = &invoice.items[0];
    assert!(!item.id.is_empty());
    assert_eq!(item.name, "Widget");
    assert_eq!(item.price, dec!(9.99));
    assert_eq!(item.quantity, 3);

    let tax = &item.taxes[0];
    assert!(!tax.id.is_empty());
    assert_eq!(tax.title, "VAT");
    assert_eq!(tax.rate, dec!(20));

    let totals = invoice.totals();
    assert_eq!(totals.subtotal, dec!(29.97));
    assert_eq!(totals.tax_total, dec!(5.994));
    assert_eq!(totals.grand_total, dec!(35.964));
}

#[tokio::test]
async fn test_update_replaces_all_items() {
    let service = memory_service();

    let original = service
        .create_invoice(submission(TestDataFactory::invoice_payload_with(
            "INV-100",
            vec![
                TestDataFactory::item("Old A", json!(1), json!(1), vec![]),
                TestDataFactory::item(
                    "Old B",
                    json!(2),
                    json!(2),
                    vec![TestDataFactory::tax("GST", json!(5))],
                ),
            ],
        )))
        .await
        .unwrap();
    assert_eq!(original.items.len(), 2);

    let replacement = TestDataFactory::invoice_payload_with(
        "INV-100",
        vec![
            TestDataFactory::item("New A", json!(3.25), json!(4), vec![]),
            TestDataFactory::item(
                "New B",
                json!(10),
                json!(1),
                vec![
                    TestDataFactory::tax("VAT", json!(20)),
                    TestDataFactory::tax("Levy", json!(0.5)),
                ],
            ),
            TestDataFactory::item("New C", json!(0.01), json!(1), vec![]),
        ],
    );
    service
        .update_invoice(&original.id, submission(replacement))
        .await
        .unwrap();

    let fetched = service.get_invoice(&original.id).await.unwrap();
    let names: Vec<&str> = fetched.items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["New A", "New B", "New C"]);
    assert_eq!(fetched.items[1].taxes.len(), 2);
    assert_eq!(fetched.items[1].taxes[1].rate, dec!(0.5));
    assert_eq!(fetched.created_at, original.created_at);

    let old_ids: Vec<&str> = original.items.iter().map(|i| i.id.as_str()).collect();
    assert!(fetched
        .items
        .iter()
        .all(|item| !old_ids.contains(&item.id.as_str())));
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() {
    let service = memory_service();
    let invoice = service
        .create_invoice(submission(TestDataFactory::invoice_payload()))
        .await
        .unwrap();

    service.delete_invoice(&invoice.id).await.unwrap();

    let result = service.get_invoice(&invoice.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    let again = service.delete_invoice(&invoice.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_list_returns_every_invoice_with_children() {
    let service = memory_service();

    let mut numbers = Vec::new();
    for i in 0..3 {
        let number = TestDataFactory::random_number();
        let payload = TestDataFactory::invoice_payload_with(
            &number,
            vec![TestDataFactory::item(
                &format!("Item {}", i),
                json!(5),
                json!(i + 1),
                vec![TestDataFactory::tax("VAT", json!(10))],
            )],
        );
        service.create_invoice(submission(payload)).await.unwrap();
        numbers.push(number);
    }

    let listed = service.list_invoices().await.unwrap();
    assert_eq!(listed.len(), 3);

    for number in &numbers {
        let invoice = listed
            .iter()
            .find(|invoice| &invoice.number == number)
            .unwrap_or_else(|| panic!("{} missing from list", number));
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].taxes.len(), 1);
        assert!(!invoice.items[0].taxes[0].id.is_empty());
    }

    // Newest first
    assert!(listed
        .windows(2)
        .all(|pair| pair[0].created_at >= pair[1].created_at));
}

#[tokio::test]
async fn test_invalid_update_changes_nothing() {
    let service = memory_service();
    let invoice = service
        .create_invoice(submission(TestDataFactory::invoice_payload()))
        .await
        .unwrap();

    let invalid = TestDataFactory::with_value(
        &TestDataFactory::invoice_payload(),
        "/items/0/quantity",
        json!(0),
    );
    let result = service.update_invoice(&invoice.id, submission(invalid)).await;
    match result {
        Err(AppError::Validation(errors)) => assert!(errors.contains("items[0].quantity")),
        other => panic!("expected validation error, got {:?}", other),
    }

    assert_eq!(service.get_invoice(&invoice.id).await.unwrap(), invoice);
}
