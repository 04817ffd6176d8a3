//! Orders

use std::fmt::{self, Write};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    ids::TypedId,
    money::format_currency,
    products::{Product, ProductId},
};

/// Order document id.
pub type OrderId = TypedId<Order>;

/// A checked-out order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Document id.
    pub id: OrderId,

    /// Id of the user who placed the order.
    pub uid: String,

    /// Contact email.
    pub email: String,

    /// Contact phone number.
    pub phone_number: String,

    /// Requester first name.
    pub first_name: String,

    /// Requester last name.
    pub last_name: String,

    /// Free-form notes from the requester.
    pub comments: String,

    /// Venmo handle used for payment, if any.
    pub venmo: Option<String>,

    /// Whether the order was placed on behalf of a team.
    pub is_team: bool,

    /// Items in checkout order.
    pub cart: Vec<CartItem>,

    /// Total charged, in minor units.
    pub total_cost: u64,

    /// Order has been submitted for fulfilment.
    pub requested: bool,

    /// Payment has been received.
    pub paid: bool,

    /// Goods have been handed over.
    pub delivered: bool,

    /// When the order was placed.
    pub date_created: Timestamp,

    /// When the order last changed.
    pub date_updated: Timestamp,
}

impl Order {
    /// Requester's full name.
    #[must_use]
    pub fn requester_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Current value of a lifecycle flag.
    #[must_use]
    pub fn flag(&self, flag: OrderStatusFlag) -> bool {
        match flag {
            OrderStatusFlag::Requested => self.requested,
            OrderStatusFlag::Paid => self.paid,
            OrderStatusFlag::Delivered => self.delivered,
        }
    }

    /// Set a lifecycle flag and stamp the update time.
    pub fn set_flag(&mut self, flag: OrderStatusFlag, value: bool, at: Timestamp) {
        match flag {
            OrderStatusFlag::Requested => self.requested = value,
            OrderStatusFlag::Paid => self.paid = value,
            OrderStatusFlag::Delivered => self.delivered = value,
        }

        self.date_updated = at;
    }
}

/// A line in an order's cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartItem {
    /// Product being bought.
    pub product_id: ProductId,

    /// Units bought.
    pub quantity: u32,

    /// Price per unit in minor units.
    pub unit_price: u64,

    /// Chosen size label.
    pub size: Option<String>,

    /// Requested number.
    pub number: Option<u32>,

    /// Requested custom name.
    pub name: Option<String>,
}

impl CartItem {
    /// Display attributes (size, number, custom name), in that order.
    pub fn attributes(&self) -> SmallVec<[String; 3]> {
        let mut attributes = SmallVec::new();

        if let Some(size) = self.size.as_deref().filter(|size| !size.is_empty()) {
            attributes.push(size.to_string());
        }

        if let Some(number) = self.number {
            attributes.push(format!("number {number}"));
        }

        if let Some(name) = self.name.as_deref().filter(|name| !name.is_empty()) {
            attributes.push(name.to_string());
        }

        attributes
    }
}

/// Order lifecycle flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderStatusFlag {
    /// Submitted for fulfilment.
    Requested,

    /// Payment received.
    Paid,

    /// Handed over to the buyer.
    Delivered,
}

impl OrderStatusFlag {
    /// Every flag, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Requested, Self::Paid, Self::Delivered];

    /// Lowercase name of the flag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Paid => "paid",
            Self::Delivered => "delivered",
        }
    }
}

impl fmt::Display for OrderStatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render an order as plain text for receipts and messages.
///
/// Each cart item becomes a block of its product name (or id when the product
/// is unknown), an optional attributes line, and `<qty> x <unit price>`. The
/// text ends with a `Total:` line.
#[must_use]
pub fn order_summary_text(order: &Order, products: &FxHashMap<ProductId, Product>) -> String {
    let mut summary = String::new();

    for item in &order.cart {
        let name = products
            .get(&item.product_id)
            .map_or(item.product_id.as_str(), |product| product.name.as_str());

        _ = writeln!(summary, "{name}");

        let attributes = item.attributes();

        if !attributes.is_empty() {
            _ = writeln!(summary, "{}", attributes.join(", "));
        }

        _ = writeln!(
            summary,
            "{} x {}\n",
            item.quantity,
            format_currency(item.unit_price)
        );
    }

    _ = write!(summary, "Total: {}", format_currency(order.total_cost));

    summary
}

/// Units of a product (and size) requested across orders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDemand {
    /// Product being counted.
    pub product_id: ProductId,

    /// Size label, when the cart items carried one.
    pub size: Option<String>,

    /// Total units across all counted orders.
    pub quantity: u64,

    /// Number of orders containing this product and size.
    pub orders: usize,
}

/// Aggregate cart quantities per product and size, in first-seen order.
#[must_use]
pub fn product_demand(orders: &[Order]) -> Vec<ProductDemand> {
    let mut index: FxHashMap<(ProductId, Option<String>), usize> = FxHashMap::default();
    let mut demand: Vec<ProductDemand> = Vec::new();

    for order in orders {
        let mut counted: SmallVec<[usize; 8]> = SmallVec::new();

        for item in &order.cart {
            let key = (item.product_id.clone(), item.size.clone());

            let slot = *index.entry(key).or_insert_with(|| {
                demand.push(ProductDemand {
                    product_id: item.product_id.clone(),
                    size: item.size.clone(),
                    quantity: 0,
                    orders: 0,
                });

                demand.len() - 1
            });

            if let Some(entry) = demand.get_mut(slot) {
                entry.quantity += u64::from(item.quantity);

                if !counted.contains(&slot) {
                    entry.orders += 1;
                    counted.push(slot);
                }
            }
        }
    }

    demand
}
