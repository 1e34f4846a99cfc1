//! Orders placed from this client.
//!
//! The backend may not list an order it never accepted, so every order placed
//! here is remembered under [`keys::ORDERS`], newest first. Lists fetched
//! later are merged with it.

use std::collections::HashSet;

use tracing::warn;

use crate::order::Order;
use crate::storage::{self, KeyValueStore, keys};
use crate::types::OrderId;

/// Persisted log of placed orders, unique by id.
#[derive(Debug)]
pub struct PlacedOrders<S> {
    store: S,
    orders: Vec<Order>,
}

impl<S: KeyValueStore> PlacedOrders<S> {
    /// Restore the log persisted in `store`. A corrupt snapshot loads empty.
    pub fn load(store: S) -> Self {
        let mut orders: Vec<Order> = storage::load_json(&store, keys::ORDERS).unwrap_or_default();
        let mut seen = HashSet::with_capacity(orders.len());
        orders.retain(|order| seen.insert(order.id.clone()));
        Self { store, orders }
    }

    /// Remember `order`, replacing an earlier record with the same id.
    ///
    /// A replaced record keeps its place; a new one goes first.
    pub fn record(&mut self, order: Order) {
        match self.orders.iter_mut().find(|o| o.id == order.id) {
            Some(existing) => *existing = order,
            None => self.orders.insert(0, order),
        }
        if let Err(e) = storage::save_json(&mut self.store, keys::ORDERS, &self.orders) {
            warn!(error = %e, "Failed to persist placed orders");
        }
    }

    /// A placed order by id.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| &order.id == id)
    }

    /// Placed orders, newest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// `fetched` preceded by every placed order it does not contain.
    #[must_use]
    pub fn merge(&self, fetched: Vec<Order>) -> Vec<Order> {
        let mut merged: Vec<Order> = self
            .orders
            .iter()
            .filter(|placed| fetched.iter().all(|o| o.id != placed.id))
            .cloned()
            .collect();
        merged.extend(fetched);
        merged
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::OrderStatus;

    fn order(id: &str, status: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "orderNumber": format!("ORD-{id}"),
            "status": status,
            "restaurant": { "id": "rest-1", "name": "Pizza Paradise" },
            "items": [{ "id": "item-1", "name": "Margherita Pizza", "quantity": 1, "price": "349" }],
            "createdAt": "2026-10-17T12:00:00Z",
            "deliveryAddress": {
                "street": "Hostel Block A, Room 203",
                "city": "Chandigarh University",
                "state": "Punjab",
                "zipCode": "140413"
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_record_survives_reload() {
        let mut placed = PlacedOrders::load(MemoryStore::new());
        placed.record(order("a", "RECEIVED"));
        placed.record(order("b", "RECEIVED"));
        placed.record(order("a", "DELIVERED"));

        let reloaded = PlacedOrders::load(placed.store);
        let ids: Vec<&str> = reloaded.orders().iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
        assert_eq!(
            reloaded.get(&OrderId::new("a")).unwrap().status,
            OrderStatus::Delivered
        );
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let placed = PlacedOrders::load(MemoryStore::with_entry(keys::ORDERS, "[{"));
        assert!(placed.orders().is_empty());
    }

    #[test]
    fn test_merge_prefers_fetched_copy() {
        let mut placed = PlacedOrders::load(MemoryStore::new());
        placed.record(order("local", "RECEIVED"));
        placed.record(order("shared", "RECEIVED"));

        let merged = placed.merge(vec![order("shared", "READY"), order("remote", "DELIVERED")]);
        let ids: Vec<&str> = merged.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["local", "shared", "remote"]);
        assert_eq!(merged[1].status, OrderStatus::Ready);
    }
}
