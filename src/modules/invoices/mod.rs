// Invoices module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{Invoice, InvoiceDraft, InvoiceResponse, InvoiceSubmission, ValidatedInvoice};
pub use repositories::{InMemoryInvoiceRepository, InvoiceRepository, MySqlInvoiceRepository};
pub use services::InvoiceService;
