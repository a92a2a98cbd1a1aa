use std::sync::Arc;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::error::AppError;
use crate::modules::invoices::models::{InvoiceResponse, InvoiceSubmission};
use crate::modules::invoices::services::invoice_service::InvoiceService;

/// Body returned after a successful delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteInvoiceResponse {
    pub message: String,
}

/// Create a new invoice
/// POST /invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let submission = InvoiceSubmission::from_json(body.into_inner())?;
    let invoice = service.create_invoice(submission).await?;

    Ok(HttpResponse::Created().json(InvoiceResponse::from(invoice)))
}

/// List every invoice
/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
) -> Result<HttpResponse, AppError> {
    let invoices: Vec<InvoiceResponse> = service
        .list_invoices()
        .await?
        .into_iter()
        .map(InvoiceResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(invoices))
}

/// Get invoice by ID
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service.get_invoice(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// Replace an invoice and all of its items
/// PUT /invoices/{id}
pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let submission = InvoiceSubmission::from_json(body.into_inner())?;
    let invoice = service
        .update_invoice(&path.into_inner(), submission)
        .await?;

    Ok(HttpResponse::Ok().json(InvoiceResponse::from(invoice)))
}

/// Delete an invoice with its items and taxes
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service.delete_invoice(&path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(DeleteInvoiceResponse {
        message: "Invoice deleted successfully".to_string(),
    }))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice)),
    );
}
