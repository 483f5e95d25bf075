use serde::{Deserialize, Serialize};

use billcraft_core::{DomainResult, Money, ValueObject};

use crate::line_item::LineItem;

/// Computed money figures for one document.
///
/// `total = subtotal + tax_amount`, exactly (decimal equality, no rounding
/// drift): all three are accumulated at full precision and only rounded when
/// formatted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTotals {
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
}

impl DocumentTotals {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl ValueObject for DocumentTotals {}

/// Compute subtotal/tax/total for an ordered list of line items.
///
/// Header rows are skipped entirely. For every other row:
/// `row_amount = quantity × unit_rate`, `row_tax = row_amount × tax% / 100`.
/// An empty list yields all-zero totals; rejecting empty documents is the
/// caller's job (`validate_items`), not the calculator's.
///
/// The only failure mode is decimal overflow, which is an invariant error.
pub fn compute_totals(items: &[LineItem]) -> DomainResult<DocumentTotals> {
    let mut subtotal = Money::ZERO;
    let mut tax_amount = Money::ZERO;

    for item in items {
        if item.is_header() {
            continue;
        }
        let row_amount = item.raw_amount()?;
        let row_tax = row_amount.percent_of(item.tax_rate_percent)?;
        subtotal = subtotal.checked_add(row_amount)?;
        tax_amount = tax_amount.checked_add(row_tax)?;
    }

    let total = subtotal.checked_add(tax_amount)?;
    Ok(DocumentTotals {
        subtotal,
        tax_amount,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineItemKind;
    use rust_decimal::Decimal;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(qty: &str, rate: &str, tax: &str) -> LineItem {
        LineItem::item("row", dec(qty), rate.parse().unwrap(), dec(tax))
    }

    #[test]
    fn two_at_hundred_with_ten_percent_tax() {
        let totals = compute_totals(&[item("2", "100", "10")]).unwrap();
        assert_eq!(totals.subtotal, Money::from_major(200));
        assert_eq!(totals.tax_amount, Money::from_major(20));
        assert_eq!(totals.total, Money::from_major(220));
    }

    #[test]
    fn empty_list_yields_zero_totals() {
        let totals = compute_totals(&[]).unwrap();
        assert_eq!(totals, DocumentTotals::zero());
    }

    #[test]
    fn headers_do_not_contribute() {
        let items = vec![
            LineItem::header("Phase 1"),
            item("2", "100", "10"),
            LineItem::header("Phase 2"),
            item("1", "50", "0"),
        ];
        let without_headers: Vec<_> = items.iter().filter(|i| !i.is_header()).cloned().collect();
        assert_eq!(
            compute_totals(&items).unwrap(),
            compute_totals(&without_headers).unwrap()
        );
    }

    #[test]
    fn timesheet_entries_count_like_items() {
        let mut entry = item("3.5", "80", "0");
        entry.kind = LineItemKind::TimesheetEntry;
        let totals = compute_totals(&[entry]).unwrap();
        assert_eq!(totals.subtotal, "280".parse().unwrap());
        assert_eq!(totals.tax_amount, Money::ZERO);
    }

    #[test]
    fn fractional_rows_accumulate_without_drift() {
        // Three rows of 33.33 at 18% tax: sums stay exact decimals.
        let rows = vec![item("1", "33.33", "18"); 3];
        let totals = compute_totals(&rows).unwrap();
        assert_eq!(totals.subtotal, "99.99".parse().unwrap());
        assert_eq!(totals.tax_amount, "17.9982".parse().unwrap());
        assert_eq!(
            totals.total,
            totals.subtotal.checked_add(totals.tax_amount).unwrap()
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_item() -> impl Strategy<Value = LineItem> {
            (
                prop_oneof![
                    Just(LineItemKind::Item),
                    Just(LineItemKind::Header),
                    Just(LineItemKind::TimesheetEntry),
                ],
                0u32..10_000,
                0u32..1_000_000,
                0u32..4000,
            )
                .prop_map(|(kind, qty_centi, rate_cents, tax_centi)| {
                    if kind == LineItemKind::Header {
                        LineItem::header("section")
                    } else {
                        let mut row = LineItem::item(
                            "row",
                            Decimal::new(qty_centi as i64, 2),
                            Money::new(Decimal::new(rate_cents as i64, 2)),
                            Decimal::new(tax_centi as i64, 2),
                        );
                        row.kind = kind;
                        row
                    }
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: totals equal the totals of the same list with headers removed.
            #[test]
            fn header_exclusion(items in proptest::collection::vec(arb_item(), 0..12)) {
                let stripped: Vec<_> =
                    items.iter().filter(|i| !i.is_header()).cloned().collect();
                prop_assert_eq!(
                    compute_totals(&items).unwrap(),
                    compute_totals(&stripped).unwrap()
                );
            }

            /// Property: total == subtotal + tax_amount, exactly.
            #[test]
            fn total_identity(items in proptest::collection::vec(arb_item(), 0..12)) {
                let totals = compute_totals(&items).unwrap();
                prop_assert_eq!(
                    totals.total,
                    totals.subtotal.checked_add(totals.tax_amount).unwrap()
                );
            }
        }
    }
}
