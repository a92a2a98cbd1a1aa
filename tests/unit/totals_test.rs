// Property-based tests for invoice totals
//
// grand total = line total + taxes, per item and per invoice, with no
// rounding anywhere in the chain.

use invoicer::invoices::models::{Item, Tax};
use invoicer::invoices::services::totals::{
    invoice_grand_total, invoice_subtotal, invoice_tax_total, invoice_totals, item_grand_total,
    item_line_total, item_tax_total, item_totals,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn item(price: Decimal, quantity: i32, rates: &[Decimal]) -> Item {
    Item {
        id: "item".to_string(),
        name: "Line".to_string(),
        price,
        quantity,
        taxes: rates
            .iter()
            .enumerate()
            .map(|(i, rate)| Tax {
                id: format!("tax-{}", i),
                rate: *rate,
                title: format!("Tax {}", i),
            })
            .collect(),
    }
}

/// Prices from 0.01 to 100000.00 in cents
fn price_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..=10_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0 to 100 with up to 3 decimal places
fn rate_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

fn item_strategy() -> impl Strategy<Value = Item> {
    (
        price_strategy(),
        1i32..=1_000,
        prop::collection::vec(rate_strategy(), 0..4),
    )
        .prop_map(|(price, quantity, rates)| item(price, quantity, &rates))
}

proptest! {
    /// Property: itemGrandTotal = itemLineTotal + itemTaxTotal
    #[test]
    fn test_item_grand_total_identity(line in item_strategy()) {
        prop_assert_eq!(item_grand_total(&line), item_line_total(&line) + item_tax_total(&line));
    }

    /// Property: invoice grand total = subtotal + tax = sum of item grand totals
    #[test]
    fn test_invoice_grand_total_identity(items in prop::collection::vec(item_strategy(), 0..8)) {
        let grand = invoice_grand_total(&items);
        let from_items: Decimal = items.iter().map(item_grand_total).sum();

        prop_assert_eq!(grand, invoice_subtotal(&items) + invoice_tax_total(&items));
        prop_assert_eq!(grand, from_items);
    }

    /// Property: totals are pure; repeated evaluation gives identical figures
    #[test]
    fn test_totals_are_idempotent(items in prop::collection::vec(item_strategy(), 0..8)) {
        let before = items.clone();
        let first = invoice_totals(&items);
        let second = invoice_totals(&items);

        prop_assert_eq!(first, second);
        prop_assert_eq!(items, before);
    }

    /// Property: a tax-free item's total equals its line total
    #[test]
    fn test_untaxed_item_total_is_line_total(price in price_strategy(), quantity in 1i32..=1_000) {
        let line = item(price, quantity, &[]);

        prop_assert_eq!(item_tax_total(&line), Decimal::ZERO);
        prop_assert_eq!(item_grand_total(&line), price * Decimal::from(quantity));
    }

    /// Property: a 100% tax exactly doubles the line
    #[test]
    fn test_full_rate_doubles_line(price in price_strategy(), quantity in 1i32..=1_000) {
        let line = item(price, quantity, &[dec!(100)]);

        prop_assert_eq!(item_grand_total(&line), item_line_total(&line) * dec!(2));
    }
}

#[test]
fn test_reference_example() {
    let widget = item(dec!(9.99), 3, &[dec!(20)]);
    let figures = item_totals(&widget);

    assert_eq!(figures.line_total, dec!(29.97));
    assert_eq!(figures.tax_total, dec!(5.994));
    assert_eq!(figures.grand_total, dec!(35.964));

    let invoice = invoice_totals(&[widget]);
    assert_eq!(invoice.subtotal, dec!(29.97));
    assert_eq!(invoice.tax_total, dec!(5.994));
    assert_eq!(invoice.grand_total, dec!(35.964));
}

#[test]
fn test_taxes_are_additive_not_compounded() {
    let line = item(dec!(50), 2, &[dec!(10), dec!(10)]);

    // 10% + 10% of 100, not 10% of 110
    assert_eq!(item_tax_total(&line), dec!(20));
}

#[test]
fn test_mixed_invoice() {
    let items = vec![
        item(dec!(9.99), 3, &[dec!(20)]),
        item(dec!(2.50), 4, &[]),
        item(dec!(100), 1, &[dec!(7.5), dec!(2.5)]),
    ];

    assert_eq!(invoice_subtotal(&items), dec!(139.97));
    assert_eq!(invoice_tax_total(&items), dec!(15.994));
    assert_eq!(invoice_grand_total(&items), dec!(155.964));
}
