// Invoice arithmetic: line totals, per-item taxes and invoice totals.
//
// Everything here is pure. Amounts are accumulated exactly and never rounded;
// rounding belongs to presentation (`CurrencyCode::format_amount`).
// Arithmetic saturates instead of panicking, so in-progress drafts with
// absurd values still produce a preview.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::modules::invoices::models::{Item, ItemDraft, ValidatedItem};

/// A priced line that can carry percentage taxes
pub trait TaxableLine {
    fn unit_price(&self) -> Decimal;

    fn units(&self) -> Decimal;

    /// Tax rates as percentages
    fn tax_rates(&self) -> impl Iterator<Item = Decimal> + '_;
}

impl TaxableLine for Item {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn units(&self) -> Decimal {
        Decimal::from(self.quantity)
    }

    fn tax_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.taxes.iter().map(|tax| tax.rate)
    }
}

impl TaxableLine for ValidatedItem {
    fn unit_price(&self) -> Decimal {
        self.price()
    }

    fn units(&self) -> Decimal {
        Decimal::from(self.quantity())
    }

    fn tax_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.taxes().iter().map(|tax| tax.rate())
    }
}

impl TaxableLine for ItemDraft {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn units(&self) -> Decimal {
        Decimal::from(self.quantity)
    }

    fn tax_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.taxes.iter().map(|tax| tax.rate)
    }
}

/// Figures for one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemTotals {
    pub line_total: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
}

/// Figures for a whole invoice
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    pub subtotal: Decimal,
    pub tax_total: Decimal,
    pub grand_total: Decimal,
}

/// price × quantity
pub fn item_line_total<L: TaxableLine>(item: &L) -> Decimal {
    item.unit_price().saturating_mul(item.units())
}

/// Sum of line_total × rate / 100 over the item's taxes
pub fn item_tax_total<L: TaxableLine>(item: &L) -> Decimal {
    let line_total = item_line_total(item);
    item.tax_rates()
        .map(|rate| line_total.saturating_mul(rate) / Decimal::ONE_HUNDRED)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Line total plus its taxes
pub fn item_grand_total<L: TaxableLine>(item: &L) -> Decimal {
    item_line_total(item).saturating_add(item_tax_total(item))
}

pub fn item_totals<L: TaxableLine>(item: &L) -> ItemTotals {
    let line_total = item_line_total(item);
    let tax_total = item_tax_total(item);
    ItemTotals {
        line_total,
        tax_total,
        grand_total: line_total.saturating_add(tax_total),
    }
}

/// Sum of line totals; zero for an empty invoice
pub fn invoice_subtotal<L: TaxableLine>(items: &[L]) -> Decimal {
    items
        .iter()
        .map(item_line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of every item's taxes; zero for an empty invoice
pub fn invoice_tax_total<L: TaxableLine>(items: &[L]) -> Decimal {
    items
        .iter()
        .map(item_tax_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Subtotal plus all taxes
pub fn invoice_grand_total<L: TaxableLine>(items: &[L]) -> Decimal {
    invoice_subtotal(items).saturating_add(invoice_tax_total(items))
}

pub fn invoice_totals<L: TaxableLine>(items: &[L]) -> InvoiceTotals {
    let subtotal = invoice_subtotal(items);
    let tax_total = invoice_tax_total(items);
    InvoiceTotals {
        subtotal,
        tax_total,
        grand_total: subtotal.saturating_add(tax_total),
    }
}
