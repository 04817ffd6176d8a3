//! Integration tests for the checkout cost summary

use storefront::{
    checkout::{
        CheckoutItem, CostSummary, PaymentBreakdown, SHIPPING_LABEL, SUBTOTAL_LABEL, SummaryRow,
    },
    money::format_currency,
};

fn shirts() -> Vec<CheckoutItem> {
    vec![CheckoutItem {
        product_name: "Shirt".to_string(),
        quantity: 2,
        unit_price: 1000,
    }]
}

fn line_labels(rows: &[SummaryRow]) -> Vec<&str> {
    rows.iter()
        .filter_map(|row| match row {
            SummaryRow::Line { label, .. } => Some(label.as_str()),
            _ => None,
        })
        .collect()
}

#[test]
fn shipping_adds_subtotal_and_shipping_rows() {
    let items = shirts();
    let payment = PaymentBreakdown {
        subtotal: 2000,
        shipping: Some(500),
        total: 2500,
    };

    let summary = CostSummary::new(&items, payment);
    let rows = summary.rows();

    assert_eq!(summary.total_display(), format_currency(2500));
    assert_eq!(line_labels(&rows), vec!["Shirt", SUBTOTAL_LABEL, SHIPPING_LABEL]);
    assert_eq!(rows.last(), Some(&SummaryRow::Total { amount: 2500 }));
}

#[test]
fn missing_or_zero_shipping_renders_items_and_total_only() {
    let items = shirts();

    for shipping in [None, Some(0)] {
        let payment = PaymentBreakdown {
            subtotal: 2000,
            shipping,
            total: 2000,
        };

        let rows = CostSummary::new(&items, payment).rows();

        assert_eq!(line_labels(&rows), vec!["Shirt"], "shipping {shipping:?}");
        assert_eq!(rows.last(), Some(&SummaryRow::Total { amount: 2000 }));
    }
}

#[test]
fn item_rows_cost_quantity_times_unit_price() {
    let items = shirts();
    let rows = CostSummary::new(&items, PaymentBreakdown::for_items(&items, None)).rows();

    assert!(rows.contains(&SummaryRow::Line {
        label: "Shirt".to_string(),
        amount: 2000,
    }));
}
