// Contract tests for the invoice HTTP API
//
// Exercises every route with the production route table and error handling,
// backed by in-memory storage, and checks status codes and body shapes.

#[path = "../helpers/mod.rs"]
mod helpers;

use actix_web::test;
use helpers::*;
use invoicer::invoices::models::{
    MSG_CURRENCY_LENGTH, MSG_ITEMS_REQUIRED, MSG_PRICE_POSITIVE, MSG_RATE_RANGE,
};
use serde_json::{json, Value};

#[actix_web::test]
async fn test_health() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "healthy" }));
}

#[actix_web::test]
async fn test_create_invoice_returns_201_with_totals() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let body: Value = test::read_body_json(resp).await;
    assert!(!body["id"].as_str().unwrap().is_empty());
    assert_eq!(body["date"], "2024-01-15T10:00:00+00:00");
    assert_eq!(body["number"], "INV-001");
    assert_eq!(body["currency"], "USD");
    assert!(body["created_at"].is_string());
    assert!(body["updated_at"].is_string());

    let item = &body["items"][0];
    assert!(!item["id"].as_str().unwrap().is_empty());
    assert_eq!(item["name"], "Widget");
    assert_amount(&item["price"], 9.99);
    assert_eq!(item["quantity"], 3);
    assert!(!item["taxes"][0]["id"].as_str().unwrap().is_empty());
    assert_eq!(item["taxes"][0]["title"], "VAT");
    assert_amount(&item["taxes"][0]["rate"], 20.0);
    assert_amount(&item["totals"]["line_total"], 29.97);
    assert_amount(&item["totals"]["tax_total"], 5.994);
    assert_amount(&item["totals"]["total"], 35.964);

    assert_amount(&body["totals"]["subtotal"], 29.97);
    assert_amount(&body["totals"]["tax_total"], 5.994);
    assert_amount(&body["totals"]["total"], 35.964);
    assert_eq!(body["display"]["subtotal"], "29.97 USD");
    assert_eq!(body["display"]["tax_total"], "5.99 USD");
    assert_eq!(body["display"]["total"], "35.96 USD");
}

#[actix_web::test]
async fn test_create_invalid_invoice_returns_field_errors() {
    let app = init_test_app!(memory_service()).await;

    let payload = json!({
        "date": "2024-01-15",
        "number": "INV-002",
        "currency": "US",
        "items": [{
            "name": "Widget",
            "price": 0,
            "quantity": 1,
            "taxes": [{ "title": "VAT", "rate": 100.01 }]
        }]
    });
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, 400);
    assert_field_error(&body, "currency", MSG_CURRENCY_LENGTH);
    assert_field_error(&body, "items[0].price", MSG_PRICE_POSITIVE);
    assert_field_error(&body, "items[0].taxes[0].rate", MSG_RATE_RANGE);
    assert_eq!(body["error"]["fields"][0]["path"], json!(["currency"]));
}

#[actix_web::test]
async fn test_create_with_empty_items_is_rejected() {
    let app = init_test_app!(memory_service()).await;

    let payload =
        TestDataFactory::with_value(&TestDataFactory::invoice_payload(), "/items", json!([]));
    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_field_error(&body, "items", MSG_ITEMS_REQUIRED);
}

#[actix_web::test]
async fn test_malformed_and_non_object_bodies() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .insert_header(("content-type", "application/json"))
        .set_payload("{ not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(!field_messages(&body, "body").is_empty());

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(json!([1, 2, 3]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(!field_messages(&body, "body").is_empty());
}

#[actix_web::test]
async fn test_get_invoice() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let fetched: Value = test::read_body_json(resp).await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn test_get_unknown_invoice_returns_404() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::get()
        .uri("/invoices/00000000-0000-0000-0000-000000000000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, 404);
}

#[actix_web::test]
async fn test_list_invoices() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let empty: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(empty, json!([]));

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/invoices")
            .set_json(TestDataFactory::invoice_payload())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
    }

    let req = test::TestRequest::get().uri("/invoices").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let listed: Value = test::read_body_json(resp).await;
    assert_eq!(listed.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_update_invoice() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let replacement = TestDataFactory::invoice_payload_with(
        "INV-001-R",
        vec![TestDataFactory::item("Gadget", json!(12.5), json!(2), vec![])],
    );
    let req = test::TestRequest::put()
        .uri(&format!("/invoices/{}", id))
        .set_json(replacement)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["created_at"], created["created_at"]);
    assert_eq!(updated["number"], "INV-001-R");
    assert_eq!(updated["currency"], "EUR");
    assert_eq!(updated["items"].as_array().unwrap().len(), 1);
    assert_eq!(updated["items"][0]["name"], "Gadget");
    assert_amount(&updated["totals"]["total"], 25.0);
    assert_eq!(updated["display"]["total"], "25.00 EUR");
}

#[actix_web::test]
async fn test_update_unknown_or_invalid() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::put()
        .uri("/invoices/missing")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().unwrap();

    let invalid =
        TestDataFactory::with_value(&TestDataFactory::invoice_payload(), "/number", json!(""));
    let req = test::TestRequest::put()
        .uri(&format!("/invoices/{}", id))
        .set_json(invalid)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    // A rejected update leaves the stored invoice as it was
    let req = test::TestRequest::get()
        .uri(&format!("/invoices/{}", id))
        .to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn test_delete_invoice() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::post()
        .uri("/invoices")
        .set_json(TestDataFactory::invoice_payload())
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let uri = format!("/invoices/{}", created["id"].as_str().unwrap());

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "message": "Invoice deleted successfully" }));

    let req = test::TestRequest::get().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let req = test::TestRequest::delete().uri(&uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_unknown_route_returns_json_404() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::get().uri("/receipts").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = test::read_body_json(resp).await;
    assert_error_body(&body, 404);
}

#[actix_web::test]
async fn test_request_id_is_echoed() {
    let app = init_test_app!(memory_service()).await;

    let req = test::TestRequest::get()
        .uri("/health")
        .insert_header(("X-Request-ID", "contract-42"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.headers().get("x-request-id").unwrap(), "contract-42");
}
