//! Test Helpers

use jiff::Timestamp;

use storefront::{
    events::{Event, EventId},
    orders::{CartItem, Order, OrderId},
    products::ProductId,
};

pub(crate) fn order(id: &str, cart: Vec<CartItem>, total_cost: u64) -> Order {
    Order {
        id: OrderId::new(id),
        uid: format!("user-{id}"),
        email: format!("{id}@example.com"),
        phone_number: String::new(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        comments: String::new(),
        venmo: None,
        is_team: false,
        cart,
        total_cost,
        requested: false,
        paid: false,
        delivered: false,
        date_created: Timestamp::UNIX_EPOCH,
        date_updated: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn cart_item(
    product: &str,
    size: Option<&str>,
    quantity: u32,
    unit_price: u64,
) -> CartItem {
    CartItem {
        product_id: ProductId::new(product),
        quantity,
        unit_price,
        size: size.map(str::to_string),
        ..CartItem::default()
    }
}

pub(crate) fn event(id: &str, end_date: Timestamp) -> Event {
    Event {
        id: EventId::new(id),
        name: format!("Event {id}"),
        end_date,
        product_ids: Vec::new(),
        product_statuses: Vec::new(),
        sizing_chart_count: 0,
    }
}
