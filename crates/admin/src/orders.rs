//! Admin order desk.

use std::{fmt, sync::Arc};

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::info;

use storefront::{
    orders::{Order, OrderId, OrderStatusFlag, ProductDemand, order_summary_text, product_demand},
    products::{Product, ProductId},
    utils::extract_key,
};

use crate::store::{OrdersStore, ProductsStore, StoreError};

#[derive(Debug, Error)]
pub enum OrderDeskError {
    #[error("order not found: {0}")]
    NotFound(OrderId),

    #[error("store request failed")]
    Store(#[source] StoreError),
}

impl From<StoreError> for OrderDeskError {
    fn from(error: StoreError) -> Self {
        Self::Store(error)
    }
}

/// Order listing, summaries and status transitions for the admin console.
#[derive(Clone)]
pub struct OrderDesk {
    orders: Arc<dyn OrdersStore>,
    products: Arc<dyn ProductsStore>,
}

impl fmt::Debug for OrderDesk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderDesk").finish_non_exhaustive()
    }
}

impl OrderDesk {
    #[must_use]
    pub fn new(orders: Arc<dyn OrdersStore>, products: Arc<dyn ProductsStore>) -> Self {
        Self { orders, products }
    }

    /// Every order, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn list(&self) -> Result<Vec<Order>, OrderDeskError> {
        Ok(self.orders.list_orders().await?)
    }

    /// Retrieve a single order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDeskError::NotFound`] for an unknown id.
    pub async fn get(&self, order: &OrderId) -> Result<Order, OrderDeskError> {
        self.orders.get_order(order).await.map_err(|error| match error {
            StoreError::NotFound => OrderDeskError::NotFound(order.clone()),
            error => OrderDeskError::Store(error),
        })
    }

    /// Plain text summary of an order with product names resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the order or the product list cannot be read.
    pub async fn summary(&self, order: &OrderId) -> Result<String, OrderDeskError> {
        let order = self.get(order).await?;
        let products = self.products_by_id().await?;

        Ok(order_summary_text(&order, &products))
    }

    /// Requested units per product and size across every order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn demand(&self) -> Result<Vec<ProductDemand>, OrderDeskError> {
        let orders = self.list().await?;

        Ok(product_demand(&orders))
    }

    /// Products indexed by id, for resolving cart item names.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn products_by_id(
        &self,
    ) -> Result<FxHashMap<ProductId, Product>, OrderDeskError> {
        let products = self.products.list_products().await?;

        Ok(extract_key(&products, |product| product.id.clone()))
    }

    /// Store a checked-out order.
    ///
    /// # Errors
    ///
    /// Returns an error if an order with the same id exists.
    #[tracing::instrument(name = "orders.desk.place", skip_all, fields(order = %order.id), err)]
    pub async fn place(&self, order: Order) -> Result<Order, OrderDeskError> {
        let order = self.orders.create_order(order).await?;

        info!(total = order.total_cost, items = order.cart.len(), "placed order");

        Ok(order)
    }

    /// Set a lifecycle flag, stamping the update time with `at`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDeskError::NotFound`] for an unknown id.
    #[tracing::instrument(
        name = "orders.desk.set_flag",
        skip_all,
        fields(order = %order, %flag, value),
        err
    )]
    pub async fn set_flag(
        &self,
        order: &OrderId,
        flag: OrderStatusFlag,
        value: bool,
        at: Timestamp,
    ) -> Result<Order, OrderDeskError> {
        let updated = self
            .orders
            .set_order_flag(order, flag, value, at)
            .await
            .map_err(|error| match error {
                StoreError::NotFound => OrderDeskError::NotFound(order.clone()),
                error => OrderDeskError::Store(error),
            })?;

        info!("updated order status");

        Ok(updated)
    }
}
