//! Storefront
//!
//! Domain types and formatting for a small merchandise storefront: products
//! with their variants and images, orders and their text summaries, sale
//! events, checkout cost summaries and admin reports.

pub mod catalog;
pub mod checkout;
pub mod events;
pub mod ids;
pub mod money;
pub mod orders;
pub mod overlay;
pub mod products;
pub mod reports;
pub mod utils;
