//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Restaurants, menus and special offers
//! - `orders` - Checkout, order history and tracking lookups
//! - `addresses` - Address book synced with the backend
//! - `session` - Sign-in, registration and the persisted session
//!
//! Every remote call goes through [`crate::api::fallback`], so services never
//! fail because the backend is away. User-scoped services take the session
//! token; without one they serve the mock account's data.

pub mod addresses;
pub mod catalog;
pub mod orders;
pub mod session;

pub use addresses::AddressService;
pub use catalog::CatalogService;
pub use orders::{OrderHistory, OrderService};
pub use session::Session;
