mod draft;
mod invoice;
mod item;
mod submission;
mod tax;
mod validated;

pub use draft::{DraftError, InvoiceDraft, ItemDraft, TaxDraft, DEFAULT_DRAFT_CURRENCY};
pub use invoice::{
    DisplayTotals, Invoice, InvoiceResponse, ItemResponse, ItemTotalsResponse, TotalsResponse,
};
pub use item::Item;
pub use submission::{
    decimal_from_number, parse_date, InvoiceSubmission, MAX_DECIMAL_PLACES, MAX_TEXT_LENGTH,
    MSG_BODY_NOT_OBJECT, MSG_CURRENCY_LENGTH, MSG_EXPECTED_NUMBER, MSG_EXPECTED_TEXT,
    MSG_INVALID_DATE, MSG_ITEMS_REQUIRED, MSG_ITEM_NOT_OBJECT, MSG_NAME_REQUIRED,
    MSG_NUMBER_REQUIRED, MSG_PRICE_POSITIVE, MSG_QUANTITY_POSITIVE, MSG_RATE_RANGE,
    MSG_TAXES_LIST, MSG_TAX_NOT_OBJECT, MSG_TITLE_REQUIRED,
};
pub use tax::Tax;
pub use validated::{ValidatedInvoice, ValidatedItem, ValidatedTax};
