mod invoice_repository;
mod memory;

use chrono::{DateTime, SubsecRound, Utc};

pub use invoice_repository::{InvoiceRepository, MySqlInvoiceRepository};
pub use memory::InMemoryInvoiceRepository;

/// Current time at the precision of a DATETIME(6) column, so a value read
/// back from storage equals the one handed out on write
pub(crate) fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
