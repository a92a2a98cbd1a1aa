pub mod invoice_service;
pub mod totals;

pub use invoice_service::InvoiceService;
pub use totals::{InvoiceTotals, ItemTotals, TaxableLine};
