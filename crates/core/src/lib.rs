//! Campus Eats Core - Cart, pricing and order-status domain library.
//!
//! This crate provides the domain model shared by every Campus Eats component:
//! - `storefront` - JSON storefront service and remote API client
//! - `cli` - Command-line tools for browsing, ordering and tracking
//!
//! # Architecture
//!
//! The core crate contains only types, pure logic and traits - no network I/O,
//! no async runtime. Persistence goes through the [`storage::KeyValueStore`]
//! trait so callers decide where snapshots live.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, order status and progress
//! - [`cart`] - The cart store and its line items
//! - [`pricing`] - Restaurant grouping and order totals
//! - [`order`] - Order records, order requests and dashboard summaries
//! - [`placed`] - Orders placed from this client
//! - [`address`] - Delivery addresses and the single-default address book
//! - [`checkout`] - Checkout form validation and order request building
//! - [`storage`] - Scoped key-value persistence

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod checkout;
pub mod order;
pub mod placed;
pub mod pricing;
pub mod storage;
pub mod types;

pub use address::{Address, AddressBook, AddressDraft, AddressError};
pub use cart::{CartError, CartItem, CartStore, NewCartItem};
pub use checkout::{CardDetails, CheckoutError, CheckoutForm};
pub use order::{Order, OrderItem, OrderItemRequest, OrderRequest, OrderSummary};
pub use placed::PlacedOrders;
pub use pricing::{LineItem, OrderTotals, RestaurantGroup, compute_totals, group_by_restaurant};
pub use storage::{KeyValueStore, MemoryStore, StoreError};
pub use types::*;
