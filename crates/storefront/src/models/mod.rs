//! Domain models for the storefront.
//!
//! These are validated domain objects, separate from the database row types
//! private to each repository.

pub mod catalog;
pub mod order;
pub mod session;
pub mod user;

pub use catalog::{Category, NewProduct, Product, ProductFilter};
pub use order::{NewOrder, Order, OrderItem};
pub use session::CurrentUser;
pub use user::User;
