//! Collaborator traits for the hosted document store and object storage.

use std::fmt;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use storefront::{
    events::{Event, EventId},
    orders::{Order, OrderId, OrderStatusFlag},
    products::{Product, ProductChanges, ProductId, ProductVariant, VariantId},
};

use crate::store::StoreError;

/// Content type hint sent with an uploaded blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Jpeg,
    Png,
}

impl ContentType {
    /// Infer the image content type from a path's extension.
    ///
    /// `jpg` and `jpeg` are JPEG; everything else is treated as PNG.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let extension = path.rsplit_once('.').map_or(path, |(_, extension)| extension);

        if extension.eq_ignore_ascii_case("jpg") || extension.eq_ignore_ascii_case("jpeg") {
            Self::Jpeg
        } else {
            Self::Png
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `products` collection and each product's `variants` sub-collection.
#[automock]
#[async_trait]
pub trait ProductsStore: Send + Sync {
    /// Retrieves all products.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: &ProductId) -> Result<Product, StoreError>;

    /// Creates or replaces a product document.
    async fn set_product(&self, product: Product) -> Result<(), StoreError>;

    /// Applies a partial update to an existing product document.
    async fn update_product(
        &self,
        product: &ProductId,
        changes: &ProductChanges,
    ) -> Result<(), StoreError>;

    /// Deletes a product document. Its variants are not touched.
    async fn delete_product(&self, product: &ProductId) -> Result<(), StoreError>;

    /// Retrieves the variant sub-collection of a product.
    async fn list_variants(&self, product: &ProductId) -> Result<Vec<ProductVariant>, StoreError>;

    /// Creates or replaces a variant document.
    async fn set_variant(
        &self,
        product: &ProductId,
        variant: ProductVariant,
    ) -> Result<(), StoreError>;

    /// Deletes a variant document.
    async fn delete_variant(
        &self,
        product: &ProductId,
        variant: &VariantId,
    ) -> Result<(), StoreError>;
}

/// `orders` collection.
#[automock]
#[async_trait]
pub trait OrdersStore: Send + Sync {
    /// Retrieves all orders, oldest first.
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Retrieve a single order.
    async fn get_order(&self, order: &OrderId) -> Result<Order, StoreError>;

    /// Stores a newly checked-out order.
    async fn create_order(&self, order: Order) -> Result<Order, StoreError>;

    /// Sets a lifecycle flag and stamps the update time.
    async fn set_order_flag(
        &self,
        order: &OrderId,
        flag: OrderStatusFlag,
        value: bool,
        at: Timestamp,
    ) -> Result<Order, StoreError>;
}

/// `events` collection.
#[automock]
#[async_trait]
pub trait EventsStore: Send + Sync {
    /// Retrieves all events.
    async fn list_events(&self) -> Result<Vec<Event>, StoreError>;

    /// Retrieve a single event.
    async fn get_event(&self, event: &EventId) -> Result<Event, StoreError>;

    /// Events whose end date is after `now`.
    async fn list_active_events(&self, now: Timestamp) -> Result<Vec<Event>, StoreError>;
}

/// Path-addressed blob storage.
#[automock]
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Writes `payload` at `path`, replacing any existing blob.
    async fn upload(
        &self,
        path: &str,
        payload: &[u8],
        content_type: ContentType,
    ) -> Result<(), StoreError>;

    /// Removes the blob at `path`.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_follows_extension() {
        assert_eq!(ContentType::from_path("product-images/a.jpg"), ContentType::Jpeg);
        assert_eq!(ContentType::from_path("product-images/a.JPEG"), ContentType::Jpeg);
        assert_eq!(ContentType::from_path("product-images/a.png"), ContentType::Png);
        assert_eq!(ContentType::from_path("product-images/a.webp"), ContentType::Png);
        assert_eq!(ContentType::Jpeg.as_str(), "image/jpeg");
    }
}
