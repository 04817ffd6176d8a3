//! Document store and object storage clients.

mod errors;
mod memory;
mod service;

pub use errors::StoreError;
pub use memory::{MemoryObjectStorage, MemoryStore, StoredObject};
pub use service::*;
