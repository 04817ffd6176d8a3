//! Catalog snapshots
//!
//! A YAML snapshot of store documents (products with their variants, orders
//! and events), used to seed the in-memory backends and the admin console.
//! Prices are written in major units, e.g. `"7.50"`.

use std::{fs, path::Path};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    events::{Event, EventId, EventProductStatus, ProductStatus, UnknownStatus},
    money::{PriceError, parse_price},
    orders::{CartItem, Order, OrderId},
    products::{Product, ProductId, ProductImage, ProductVariant},
    utils::extract_key,
};

/// Catalog loading errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// IO error reading the catalog file.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// A price could not be parsed.
    #[error(transparent)]
    Price(#[from] PriceError),

    /// An event product status label is not recognised.
    #[error(transparent)]
    Status(#[from] UnknownStatus),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PriceFixture {
    Text(String),
    Whole(u64),
    Fractional(f64),
}

impl PriceFixture {
    fn minor_units(&self) -> Result<u64, PriceError> {
        match self {
            Self::Text(text) => parse_price(text),
            Self::Whole(whole) => whole
                .checked_mul(100)
                .ok_or_else(|| PriceError::OutOfRange(whole.to_string())),
            Self::Fractional(value) => parse_price(&value.to_string()),
        }
    }
}

impl Default for PriceFixture {
    fn default() -> Self {
        Self::Whole(0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFixture {
    products: Vec<ProductFixture>,
    orders: Vec<OrderFixture>,
    events: Vec<EventFixture>,
}

#[derive(Debug, Deserialize)]
struct ProductFixture {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    price: PriceFixture,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    allow_number: bool,
    #[serde(default)]
    allow_custom_name: bool,
    #[serde(default)]
    images: Vec<ImageFixture>,
    #[serde(default)]
    variants: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ImageFixture {
    storage_path: String,
    #[serde(default)]
    alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderFixture {
    id: String,
    uid: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone_number: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    comments: String,
    #[serde(default)]
    venmo: Option<String>,
    #[serde(default)]
    is_team: bool,
    #[serde(default)]
    cart: Vec<CartItemFixture>,
    total_cost: PriceFixture,
    #[serde(default)]
    requested: bool,
    #[serde(default)]
    paid: bool,
    #[serde(default)]
    delivered: bool,
    date_created: Timestamp,
    #[serde(default)]
    date_updated: Option<Timestamp>,
}

#[derive(Debug, Deserialize)]
struct CartItemFixture {
    product_id: String,
    quantity: u32,
    unit_price: PriceFixture,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    number: Option<u32>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventFixture {
    id: String,
    name: String,
    end_date: Timestamp,
    #[serde(default)]
    product_ids: Vec<String>,
    #[serde(default)]
    product_statuses: Vec<ProductStatusFixture>,
    #[serde(default)]
    sizing_chart_count: u32,
}

#[derive(Debug, Deserialize)]
struct ProductStatusFixture {
    product_id: String,
    status: String,
}

/// Documents loaded from a catalog snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Product documents.
    pub products: Vec<Product>,

    /// Variant sub-collections keyed by parent product.
    pub variants: FxHashMap<ProductId, Vec<ProductVariant>>,

    /// Order documents.
    pub orders: Vec<Order>,

    /// Event documents.
    pub events: Vec<Event>,
}

impl Catalog {
    /// Load a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;

        Self::from_yaml_str(&contents)
    }

    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price is invalid or an
    /// event status is unknown.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_norway::from_str(yaml)?;
        let mut catalog = Self::default();

        for product in fixture.products {
            let id = ProductId::new(product.id);

            if !product.variants.is_empty() {
                let variants = product
                    .variants
                    .into_iter()
                    .enumerate()
                    .map(|(order, variant)| ProductVariant::new(variant, order))
                    .collect();

                catalog.variants.insert(id.clone(), variants);
            }

            catalog.products.push(Product {
                id,
                name: product.name,
                description: product.description,
                price: product.price.minor_units()?,
                sizes: product.sizes,
                allow_number: product.allow_number,
                allow_custom_name: product.allow_custom_name,
                product_images: product
                    .images
                    .into_iter()
                    .map(|image| ProductImage {
                        storage_path: image.storage_path,
                        alt_text: image.alt_text,
                    })
                    .collect(),
            });
        }

        for order in fixture.orders {
            let cart = order
                .cart
                .into_iter()
                .map(|item| {
                    Ok(CartItem {
                        product_id: ProductId::new(item.product_id),
                        quantity: item.quantity,
                        unit_price: item.unit_price.minor_units()?,
                        size: item.size,
                        number: item.number,
                        name: item.name,
                    })
                })
                .collect::<Result<Vec<_>, PriceError>>()?;

            catalog.orders.push(Order {
                id: OrderId::new(order.id),
                uid: order.uid,
                email: order.email,
                phone_number: order.phone_number,
                first_name: order.first_name,
                last_name: order.last_name,
                comments: order.comments,
                venmo: order.venmo,
                is_team: order.is_team,
                cart,
                total_cost: order.total_cost.minor_units()?,
                requested: order.requested,
                paid: order.paid,
                delivered: order.delivered,
                date_created: order.date_created,
                date_updated: order.date_updated.unwrap_or(order.date_created),
            });
        }

        for event in fixture.events {
            let product_statuses = event
                .product_statuses
                .into_iter()
                .map(|entry| {
                    Ok(ProductStatus {
                        product_id: ProductId::new(entry.product_id),
                        status: entry.status.parse::<EventProductStatus>()?,
                    })
                })
                .collect::<Result<Vec<_>, UnknownStatus>>()?;

            catalog.events.push(Event {
                id: EventId::new(event.id),
                name: event.name,
                end_date: event.end_date,
                product_ids: event.product_ids.into_iter().map(ProductId::new).collect(),
                product_statuses,
                sizing_chart_count: event.sizing_chart_count,
            });
        }

        Ok(catalog)
    }

    /// Products indexed by id.
    #[must_use]
    pub fn products_by_id(&self) -> FxHashMap<ProductId, Product> {
        extract_key(&self.products, |product| product.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    const CATALOG: &str = r#"
products:
  - id: p1
    name: Hat
    price: "7.50"
    sizes: [S, M]
    images:
      - storage_path: product-images/hat.png
    variants: [p2, p3]
  - id: p2
    name: Cap
    price: 12
orders:
  - id: o1
    uid: u1
    email: buyer@example.com
    cart:
      - product_id: p1
        quantity: 3
        unit_price: "7.50"
        size: M
    total_cost: "22.50"
    requested: true
    date_created: "2024-05-01T12:00:00Z"
events:
  - id: e1
    name: Spring Sale
    end_date: "2024-06-01T00:00:00Z"
    product_ids: [p1]
    product_statuses:
      - product_id: p1
        status: Ready for Pickup
"#;

    #[test]
    fn parses_products_with_variants() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;

        assert_eq!(catalog.products.len(), 2);

        let products = catalog.products_by_id();
        let hat = products.get(&ProductId::new("p1")).ok_or("missing hat")?;

        assert_eq!(hat.price, 750);
        assert_eq!(hat.product_images.len(), 1);
        assert_eq!(
            products.get(&ProductId::new("p2")).map(|p| p.price),
            Some(1200)
        );

        let variants = catalog
            .variants
            .get(&ProductId::new("p1"))
            .ok_or("missing variants")?;

        assert_eq!(
            variants,
            &vec![ProductVariant::new("p2", 0), ProductVariant::new("p3", 1)]
        );

        Ok(())
    }

    #[test]
    fn parses_orders_and_events() -> TestResult {
        let catalog = Catalog::from_yaml_str(CATALOG)?;
        let order = catalog.orders.first().ok_or("missing order")?;

        assert_eq!(order.total_cost, 2250);
        assert_eq!(order.date_updated, order.date_created);
        assert_eq!(order.cart.first().map(|item| item.unit_price), Some(750));

        let event = catalog.events.first().ok_or("missing event")?;

        assert_eq!(
            event.status_of(&ProductId::new("p1")),
            Some(EventProductStatus::ReadyForPickup)
        );

        Ok(())
    }

    #[test]
    fn rejects_unknown_status() {
        let yaml = r#"
events:
  - id: e1
    name: Sale
    end_date: "2024-06-01T00:00:00Z"
    product_statuses:
      - product_id: p1
        status: Lost
"#;

        assert!(matches!(
            Catalog::from_yaml_str(yaml),
            Err(CatalogError::Status(_))
        ));
    }

    #[test]
    fn loads_from_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;

        file.write_all(CATALOG.as_bytes())?;

        let catalog = Catalog::load(file.path())?;

        assert_eq!(catalog.orders.len(), 1);

        Ok(())
    }
}
