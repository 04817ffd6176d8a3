//! Sessions

mod cookie;
mod errors;
mod models;
mod service;
mod token;

pub use cookie::*;
pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::*;
