//! In-memory store and object storage backends.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use rustc_hash::FxHashMap;
use tokio::sync::RwLock;
use tracing::debug;

use storefront::{
    catalog::Catalog,
    events::{Event, EventId, active_events},
    orders::{Order, OrderId, OrderStatusFlag},
    overlay::Changes,
    products::{Product, ProductChanges, ProductId, ProductVariant, VariantId},
};

use crate::store::{
    ContentType, EventsStore, ObjectStorage, OrdersStore, ProductsStore, StoreError,
};

#[derive(Debug, Default)]
struct Documents {
    products: FxHashMap<ProductId, Product>,
    variants: FxHashMap<ProductId, FxHashMap<VariantId, ProductVariant>>,
    orders: FxHashMap<OrderId, Order>,
    events: FxHashMap<EventId, Event>,
}

/// Document store held in process memory.
///
/// Mirrors hosted document store semantics: partial updates require an
/// existing document, deletes are idempotent, and deleting a product leaves
/// its variant sub-collection in place.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<Documents>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with every document in a catalog snapshot.
    #[must_use]
    pub fn from_catalog(catalog: Catalog) -> Self {
        let Catalog {
            products,
            variants,
            orders,
            events,
        } = catalog;

        let documents = Documents {
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
            variants: variants
                .into_iter()
                .map(|(product, variants)| {
                    let variants = variants
                        .into_iter()
                        .map(|variant| (variant.id.clone(), variant))
                        .collect();

                    (product, variants)
                })
                .collect(),
            orders: orders
                .into_iter()
                .map(|order| (order.id.clone(), order))
                .collect(),
            events: events
                .into_iter()
                .map(|event| (event.id.clone(), event))
                .collect(),
        };

        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Store an event document.
    pub async fn set_event(&self, event: Event) {
        self.documents
            .write()
            .await
            .events
            .insert(event.id.clone(), event);
    }
}

#[async_trait]
impl ProductsStore for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let documents = self.documents.read().await;
        let mut products: Vec<Product> = documents.products.values().cloned().collect();

        products.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(products)
    }

    async fn get_product(&self, product: &ProductId) -> Result<Product, StoreError> {
        self.documents
            .read()
            .await
            .products
            .get(product)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn set_product(&self, product: Product) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .products
            .insert(product.id.clone(), product);

        Ok(())
    }

    async fn update_product(
        &self,
        product: &ProductId,
        changes: &ProductChanges,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;
        let stored = documents
            .products
            .get_mut(product)
            .ok_or(StoreError::NotFound)?;

        changes.apply_to(stored);

        Ok(())
    }

    async fn delete_product(&self, product: &ProductId) -> Result<(), StoreError> {
        let removed = self.documents.write().await.products.remove(product);

        debug!(product = %product, existed = removed.is_some(), "deleted product document");

        Ok(())
    }

    async fn list_variants(&self, product: &ProductId) -> Result<Vec<ProductVariant>, StoreError> {
        let documents = self.documents.read().await;
        let mut variants: Vec<ProductVariant> = documents
            .variants
            .get(product)
            .map(|variants| variants.values().cloned().collect())
            .unwrap_or_default();

        variants.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

        Ok(variants)
    }

    async fn set_variant(
        &self,
        product: &ProductId,
        variant: ProductVariant,
    ) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .variants
            .entry(product.clone())
            .or_default()
            .insert(variant.id.clone(), variant);

        Ok(())
    }

    async fn delete_variant(
        &self,
        product: &ProductId,
        variant: &VariantId,
    ) -> Result<(), StoreError> {
        let mut documents = self.documents.write().await;

        if let Some(variants) = documents.variants.get_mut(product) {
            variants.remove(variant);

            if variants.is_empty() {
                documents.variants.remove(product);
            }
        }

        Ok(())
    }
}

#[async_trait]
impl OrdersStore for MemoryStore {
    async fn list_orders(&self) -> Result<Vec<Order>, StoreError> {
        let documents = self.documents.read().await;
        let mut orders: Vec<Order> = documents.orders.values().cloned().collect();

        orders.sort_by(|a, b| {
            a.date_created
                .cmp(&b.date_created)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(orders)
    }

    async fn get_order(&self, order: &OrderId) -> Result<Order, StoreError> {
        self.documents
            .read()
            .await
            .orders
            .get(order)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_order(&self, order: Order) -> Result<Order, StoreError> {
        let mut documents = self.documents.write().await;

        if documents.orders.contains_key(&order.id) {
            return Err(StoreError::AlreadyExists);
        }

        documents.orders.insert(order.id.clone(), order.clone());

        Ok(order)
    }

    async fn set_order_flag(
        &self,
        order: &OrderId,
        flag: OrderStatusFlag,
        value: bool,
        at: Timestamp,
    ) -> Result<Order, StoreError> {
        let mut documents = self.documents.write().await;
        let stored = documents.orders.get_mut(order).ok_or(StoreError::NotFound)?;

        stored.set_flag(flag, value, at);

        Ok(stored.clone())
    }
}

#[async_trait]
impl EventsStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Event>, StoreError> {
        let documents = self.documents.read().await;
        let mut events: Vec<Event> = documents.events.values().cloned().collect();

        events.sort_by(|a, b| a.end_date.cmp(&b.end_date).then_with(|| a.id.cmp(&b.id)));

        Ok(events)
    }

    async fn get_event(&self, event: &EventId) -> Result<Event, StoreError> {
        self.documents
            .read()
            .await
            .events
            .get(event)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_active_events(&self, now: Timestamp) -> Result<Vec<Event>, StoreError> {
        let events = self.list_events().await?;

        Ok(active_events(&events, now).cloned().collect())
    }
}

/// A blob held by [`MemoryObjectStorage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub payload: Arc<[u8]>,
    pub content_type: ContentType,
}

/// Object storage held in process memory.
///
/// Deleting a missing blob fails with [`StoreError::NotFound`], as hosted
/// object storage does.
#[derive(Debug, Default)]
pub struct MemoryObjectStorage {
    objects: RwLock<FxHashMap<String, StoredObject>>,
}

impl MemoryObjectStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The blob stored at `path`, if any.
    pub async fn object(&self, path: &str) -> Option<StoredObject> {
        self.objects.read().await.get(path).cloned()
    }

    /// Every stored path, sorted.
    pub async fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.objects.read().await.keys().cloned().collect();

        paths.sort();

        paths
    }
}

#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(
        &self,
        path: &str,
        payload: &[u8],
        content_type: ContentType,
    ) -> Result<(), StoreError> {
        self.objects.write().await.insert(
            path.to_string(),
            StoredObject {
                payload: Arc::from(payload),
                content_type,
            },
        );

        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.objects
            .write()
            .await
            .remove(path)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::test::{event, order};

    use super::*;

    #[tokio::test]
    async fn update_requires_existing_product() {
        let store = MemoryStore::new();

        let result = store
            .update_product(&ProductId::new("missing"), &ProductChanges::name("x"))
            .await;

        assert_eq!(result, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn update_applies_partial_changes() -> TestResult {
        let store = MemoryStore::new();
        let mut product = Product::new("p1", "Shirt");
        product.price = 1500;

        store.set_product(product).await?;
        store
            .update_product(&ProductId::new("p1"), &ProductChanges::name("Tee"))
            .await?;

        let stored = store.get_product(&ProductId::new("p1")).await?;

        assert_eq!(stored.name, "Tee");
        assert_eq!(stored.price, 1500);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_product_keeps_variants() -> TestResult {
        let store = MemoryStore::new();
        let id = ProductId::new("p1");

        store.set_product(Product::new("p1", "Shirt")).await?;
        store.set_variant(&id, ProductVariant::new("v1", 0)).await?;
        store.delete_product(&id).await?;

        assert_eq!(store.list_variants(&id).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn variants_list_in_display_order() -> TestResult {
        let store = MemoryStore::new();
        let id = ProductId::new("p1");

        store.set_variant(&id, ProductVariant::new("b", 1)).await?;
        store.set_variant(&id, ProductVariant::new("a", 2)).await?;
        store.set_variant(&id, ProductVariant::new("c", 0)).await?;

        let ids: Vec<String> = store
            .list_variants(&id)
            .await?
            .into_iter()
            .map(|variant| variant.id.into_string())
            .collect();

        assert_eq!(ids, vec!["c", "b", "a"]);

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_order_is_rejected() -> TestResult {
        let store = MemoryStore::new();
        let order = order("o1", Vec::new(), 0);

        store.create_order(order.clone()).await?;

        assert_eq!(
            store.create_order(order).await,
            Err(StoreError::AlreadyExists)
        );

        Ok(())
    }

    #[tokio::test]
    async fn active_events_end_after_now() -> TestResult {
        let store = MemoryStore::new();
        let now = Timestamp::UNIX_EPOCH + 10.hours();

        store.set_event(event("past", now - 1.hours())).await;
        store.set_event(event("closing", now)).await;
        store.set_event(event("open", now + 1.hours())).await;

        let active: Vec<String> = store
            .list_active_events(now)
            .await?
            .into_iter()
            .map(|event| event.id.into_string())
            .collect();

        assert_eq!(active, vec!["open"]);
        assert_eq!(store.list_events().await?.len(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn object_storage_round_trips_and_rejects_missing_delete() -> TestResult {
        let storage = MemoryObjectStorage::new();

        storage
            .upload("product-images/a.png", b"png", ContentType::Png)
            .await?;

        let stored = storage.object("product-images/a.png").await.ok_or("missing")?;

        assert_eq!(&*stored.payload, b"png");
        assert_eq!(stored.content_type, ContentType::Png);

        storage.delete("product-images/a.png").await?;

        assert_eq!(
            storage.delete("product-images/a.png").await,
            Err(StoreError::NotFound)
        );

        Ok(())
    }
}
