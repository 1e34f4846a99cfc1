//! The cart store.
//!
//! A cart is an ordered list of line items, unique by menu item id, each with
//! a quantity of at least one. Every mutation writes a JSON snapshot to the
//! backing [`KeyValueStore`] under [`keys::CART`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::pricing::{self, LineItem, OrderTotals, RestaurantGroup, RestaurantLine};
use crate::storage::{self, KeyValueStore, keys};
use crate::types::{Fees, MenuItemId, RestaurantId};

/// A menu item with its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_name: Option<String>,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
    #[serde(default)]
    pub image: String,
}

/// A menu item about to be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub restaurant_name: Option<String>,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
}

impl NewCartItem {
    fn into_cart_item(self) -> CartItem {
        CartItem {
            id: self.id,
            restaurant_id: self.restaurant_id,
            restaurant_name: self.restaurant_name,
            name: self.name,
            price: self.price,
            quantity: 1,
            image: self.image,
        }
    }
}

impl LineItem for CartItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

impl RestaurantLine for CartItem {
    fn restaurant_id(&self) -> &RestaurantId {
        &self.restaurant_id
    }

    fn restaurant_name(&self) -> Option<&str> {
        self.restaurant_name.as_deref()
    }
}

/// Rejected cart mutation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("item {0} has a negative price")]
    NegativePrice(MenuItemId),
}

/// Line items plus the store their snapshot is written to.
#[derive(Debug)]
pub struct CartStore<S> {
    items: Vec<CartItem>,
    store: S,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the cart persisted in `store`.
    ///
    /// A missing or unparseable snapshot yields an empty cart. Loaded items
    /// are normalized: quantities below one become one, duplicate ids are
    /// merged and negatively priced entries are dropped.
    pub fn load(store: S) -> Self {
        let saved: Vec<CartItem> = storage::load_json(&store, keys::CART).unwrap_or_default();
        let items = normalize(saved);
        debug!(items = items.len(), "Cart loaded");
        Self { items, store }
    }

    /// Current line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line item.
    #[must_use]
    pub fn get(&self, id: &MenuItemId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// Whether the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Add one unit of `item`.
    ///
    /// An existing line with the same id has its quantity incremented; its
    /// name and price are left untouched. Returns the resulting quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NegativePrice` if the item's price is below zero.
    pub fn add_to_cart(&mut self, item: NewCartItem) -> Result<u32, CartError> {
        if item.price.is_sign_negative() && !item.price.is_zero() {
            return Err(CartError::NegativePrice(item.id));
        }

        let quantity = if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(1);
            existing.quantity
        } else {
            self.items.push(item.into_cart_item());
            1
        };

        self.persist();
        Ok(quantity)
    }

    /// Remove every line with `id`. Returns whether anything was removed.
    pub fn remove_from_cart(&mut self, id: &MenuItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.id != id);
        let removed = self.items.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Set the quantity of `id`, flooring at one.
    ///
    /// Returns the stored quantity, or `None` if the item is not in the cart.
    pub fn update_quantity(&mut self, id: &MenuItemId, quantity: i64) -> Option<u32> {
        let floored = u32::try_from(quantity.max(1)).unwrap_or(u32::MAX);
        let item = self.items.iter_mut().find(|item| &item.id == id)?;
        item.quantity = floored;
        self.persist();
        Some(floored)
    }

    /// Remove all line items.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.persist();
    }

    /// Sum of `price × quantity` over all line items.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        pricing::subtotal(&self.items)
    }

    /// Line items grouped by restaurant.
    #[must_use]
    pub fn restaurant_groups(&self) -> Vec<RestaurantGroup<'_, CartItem>> {
        pricing::group_by_restaurant(&self.items)
    }

    /// Subtotal, fees and grand total.
    #[must_use]
    pub fn totals(&self, fees: Fees) -> OrderTotals {
        pricing::compute_totals(&self.items, fees)
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the cart and return the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if let Err(e) = storage::save_json(&mut self.store, keys::CART, &self.items) {
            warn!(error = %e, "Failed to persist cart snapshot");
        }
    }
}

fn normalize(saved: Vec<CartItem>) -> Vec<CartItem> {
    let mut items: Vec<CartItem> = Vec::with_capacity(saved.len());
    for mut item in saved {
        if item.price.is_sign_negative() && !item.price.is_zero() {
            warn!(id = %item.id, "Dropping persisted cart item with negative price");
            continue;
        }
        item.quantity = item.quantity.max(1);
        if let Some(existing) = items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            items.push(item);
        }
    }
    items
}
