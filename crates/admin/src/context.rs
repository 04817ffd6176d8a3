//! App Context

use std::{fmt, path::Path, sync::Arc};

use jiff::SignedDuration;
use thiserror::Error;
use tracing::info;

use storefront::catalog::{Catalog, CatalogError};

use crate::{
    auth::{MemorySessionService, SessionService},
    editor::ProductEditor,
    orders::OrderDesk,
    store::{
        EventsStore, MemoryObjectStorage, MemoryStore, ObjectStorage, OrdersStore, ProductsStore,
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to load catalog")]
    Catalog(#[source] CatalogError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsStore>,
    pub orders: Arc<dyn OrdersStore>,
    pub events: Arc<dyn EventsStore>,
    pub objects: Arc<dyn ObjectStorage>,
    pub sessions: Arc<dyn SessionService>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Build application context over in-memory backends seeded from a
    /// catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error when the catalog cannot be read or parsed.
    pub fn from_catalog_path(
        path: impl AsRef<Path>,
        session_ttl: SignedDuration,
    ) -> Result<Self, AppInitError> {
        let catalog = Catalog::load(path.as_ref()).map_err(AppInitError::Catalog)?;

        info!(
            catalog = %path.as_ref().display(),
            products = catalog.products.len(),
            orders = catalog.orders.len(),
            events = catalog.events.len(),
            "loaded catalog"
        );

        Ok(Self::from_catalog(catalog, session_ttl))
    }

    #[must_use]
    pub fn from_catalog(catalog: Catalog, session_ttl: SignedDuration) -> Self {
        let store = Arc::new(MemoryStore::from_catalog(catalog));

        Self {
            products: store.clone(),
            orders: store.clone(),
            events: store,
            objects: Arc::new(MemoryObjectStorage::new()),
            sessions: Arc::new(MemorySessionService::new(session_ttl)),
        }
    }

    #[must_use]
    pub fn editor(&self) -> ProductEditor {
        ProductEditor::new(self.products.clone(), self.objects.clone())
    }

    #[must_use]
    pub fn order_desk(&self) -> OrderDesk {
        OrderDesk::new(self.orders.clone(), self.products.clone())
    }
}
