//! Admin reports
//!
//! Tabular views of products, orders, product demand and events for the
//! admin console.

use std::io;

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::{
    checkout::SummaryError,
    events::{Event, status_color},
    money::format_currency,
    orders::{Order, ProductDemand},
    products::{Product, ProductId},
};

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Write one row per product with its variant count.
///
/// # Errors
///
/// Returns [`SummaryError::Io`] if writing to `out` fails.
pub fn write_products_table(
    mut out: impl io::Write,
    products: &[Product],
    variant_counts: &FxHashMap<ProductId, usize>,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Name", "Price", "Sizes", "Images", "Variants"]);

    for product in products {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            format_currency(product.price),
            product.sizes.join(", "),
            product.product_images.len().to_string(),
            variant_counts
                .get(&product.id)
                .copied()
                .unwrap_or_default()
                .to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::one(2), Alignment::right());
    table.modify(Columns::new(4..6), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write one row per order.
///
/// # Errors
///
/// Returns [`SummaryError::Io`] if writing to `out` fails.
pub fn write_orders_table(mut out: impl io::Write, orders: &[Order]) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record([
        "Order",
        "Name",
        "Email",
        "Items",
        "Total",
        "Requested",
        "Paid",
        "Delivered",
        "Created",
    ]);

    for order in orders {
        let items: u64 = order.cart.iter().map(|item| u64::from(item.quantity)).sum();

        builder.push_record([
            order.id.to_string(),
            order.requester_name(),
            order.email.clone(),
            items.to_string(),
            format_currency(order.total_cost),
            yes_no(order.requested).to_string(),
            yes_no(order.paid).to_string(),
            yes_no(order.delivered).to_string(),
            order.date_created.strftime("%Y-%m-%d %H:%M").to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(3..5), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write one row per product and size with requested quantities.
///
/// # Errors
///
/// Returns [`SummaryError::Io`] if writing to `out` fails.
pub fn write_demand_table(
    mut out: impl io::Write,
    demand: &[ProductDemand],
    products: &FxHashMap<ProductId, Product>,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Product", "Size", "Quantity", "Orders"]);

    for entry in demand {
        let name = products
            .get(&entry.product_id)
            .map_or(entry.product_id.as_str(), |product| product.name.as_str());

        builder.push_record([
            name.to_string(),
            entry.size.clone().unwrap_or_else(|| "-".to_string()),
            entry.quantity.to_string(),
            entry.orders.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "{table}")?;

    Ok(())
}

/// Write one row per event product with its fulfilment status and color.
///
/// An event without products gets a single row.
///
/// # Errors
///
/// Returns [`SummaryError::Io`] if writing to `out` fails.
pub fn write_events_table(
    mut out: impl io::Write,
    events: &[Event],
    products: &FxHashMap<ProductId, Product>,
    now: Timestamp,
) -> Result<(), SummaryError> {
    let mut builder = Builder::default();

    builder.push_record(["Event", "Ends", "Open", "Product", "Status", "Color"]);

    for event in events {
        let ends = event.end_date.strftime("%Y-%m-%d %H:%M").to_string();
        let open = yes_no(event.is_active(now)).to_string();

        if event.product_ids.is_empty() {
            builder.push_record([
                event.name.clone(),
                ends,
                open,
                "-".to_string(),
                "-".to_string(),
                status_color(None).to_string(),
            ]);

            continue;
        }

        for product_id in &event.product_ids {
            let name = products
                .get(product_id)
                .map_or(product_id.as_str(), |product| product.name.as_str());

            let status = event.status_of(product_id);

            builder.push_record([
                event.name.clone(),
                ends.clone(),
                open.clone(),
                name.to_string(),
                status.map_or_else(|| "-".to_string(), |status| status.to_string()),
                status_color(status).to_string(),
            ]);
        }
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);

    writeln!(out, "{table}")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::{
        events::{EventId, EventProductStatus, ProductStatus},
        orders::{CartItem, OrderId, product_demand},
    };

    use super::*;

    fn order() -> Order {
        Order {
            id: OrderId::new("order-1"),
            uid: "u1".to_string(),
            email: "buyer@example.com".to_string(),
            phone_number: String::new(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            comments: String::new(),
            venmo: None,
            is_team: false,
            cart: vec![CartItem {
                product_id: ProductId::new("p1"),
                quantity: 2,
                unit_price: 1250,
                size: Some("S".to_string()),
                ..CartItem::default()
            }],
            total_cost: 2500,
            requested: true,
            paid: true,
            delivered: false,
            date_created: Timestamp::UNIX_EPOCH,
            date_updated: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn orders_table_shows_requester_and_total() -> TestResult {
        let mut out = Vec::new();

        write_orders_table(&mut out, &[order()])?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("order-1"), "order id missing");
        assert!(rendered.contains("Grace Hopper"), "requester missing");
        assert!(rendered.contains("$25.00"), "total missing");
        assert!(rendered.contains("1970-01-01 00:00"), "created date missing");

        Ok(())
    }

    #[test]
    fn demand_table_uses_product_names() -> TestResult {
        let products: FxHashMap<ProductId, Product> =
            [(ProductId::new("p1"), Product::new("p1", "Hoodie"))]
                .into_iter()
                .collect();

        let mut out = Vec::new();

        write_demand_table(&mut out, &product_demand(&[order()]), &products)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Hoodie"), "product name missing");
        assert!(rendered.contains('S'), "size missing");

        Ok(())
    }

    #[test]
    fn products_table_counts_variants() -> TestResult {
        let mut hoodie = Product::new("p1", "Hoodie");
        hoodie.price = 4500;
        hoodie.sizes = vec!["S".to_string(), "M".to_string()];

        let counts: FxHashMap<ProductId, usize> =
            [(ProductId::new("p1"), 3)].into_iter().collect();

        let mut out = Vec::new();

        write_products_table(&mut out, &[hoodie], &counts)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Hoodie"), "name missing");
        assert!(rendered.contains("$45.00"), "price missing");
        assert!(rendered.contains("S, M"), "sizes missing");
        assert!(rendered.contains('3'), "variant count missing");

        Ok(())
    }

    #[test]
    fn events_table_shows_status_colors() -> TestResult {
        let event = Event {
            id: EventId::new("e1"),
            name: "Spring Sale".to_string(),
            end_date: Timestamp::UNIX_EPOCH + 48.hours(),
            product_ids: vec![ProductId::new("p1"), ProductId::new("p2")],
            product_statuses: vec![ProductStatus {
                product_id: ProductId::new("p1"),
                status: EventProductStatus::Shipped,
            }],
            sizing_chart_count: 0,
        };

        let products: FxHashMap<ProductId, Product> =
            [(ProductId::new("p1"), Product::new("p1", "Hoodie"))]
                .into_iter()
                .collect();

        let mut out = Vec::new();

        write_events_table(&mut out, &[event], &products, Timestamp::UNIX_EPOCH)?;

        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Spring Sale"), "event missing");
        assert!(rendered.contains("Shipped"), "status missing");
        assert!(rendered.contains("green"), "status color missing");
        assert!(rendered.contains("#000000"), "unset color missing");
        assert!(rendered.contains("p2"), "unknown product id missing");

        Ok(())
    }
}
