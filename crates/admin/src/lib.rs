//! Storefront admin services: product editing, order handling and sessions
//! over the hosted document store and object storage.

pub mod auth;
pub mod config;
pub mod context;
pub mod editor;
pub mod logging;
pub mod orders;
pub mod store;
pub mod sync;

#[cfg(test)]
mod test;
