//! Restaurant grouping and order totals.
//!
//! Grouping is a derived view: it borrows the underlying line items and is
//! recomputed on every read.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{Fees, RestaurantId};

/// Name shown for a group whose items carry no restaurant name.
pub const UNKNOWN_RESTAURANT: &str = "Unknown Restaurant";

/// Anything with a unit price and a quantity.
pub trait LineItem {
    /// Price of a single unit.
    fn unit_price(&self) -> Decimal;

    /// Number of units.
    fn quantity(&self) -> u32;

    /// `unit_price × quantity`.
    fn line_total(&self) -> Decimal {
        self.unit_price() * Decimal::from(self.quantity())
    }
}

/// A line item that knows which restaurant it comes from.
pub trait RestaurantLine: LineItem {
    fn restaurant_id(&self) -> &RestaurantId;

    fn restaurant_name(&self) -> Option<&str>;
}

/// Line items from a single restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantGroup<'a, T> {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub items: Vec<&'a T>,
}

impl<T: LineItem> RestaurantGroup<'_, T> {
    /// Sum of the group's line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(|item| item.line_total()).sum()
    }
}

/// Partition `items` into one group per restaurant.
///
/// Groups appear in the order their restaurant is first seen and items keep
/// their relative order. Each group takes the first non-empty restaurant name
/// among its items, or [`UNKNOWN_RESTAURANT`].
#[must_use]
pub fn group_by_restaurant<T: RestaurantLine>(items: &[T]) -> Vec<RestaurantGroup<'_, T>> {
    let mut index: HashMap<&RestaurantId, usize> = HashMap::new();
    let mut groups: Vec<RestaurantGroup<'_, T>> = Vec::new();
    let mut named: Vec<bool> = Vec::new();

    for item in items {
        let name = item.restaurant_name().filter(|n| !n.trim().is_empty());
        let position = *index.entry(item.restaurant_id()).or_insert_with(|| {
            groups.push(RestaurantGroup {
                restaurant_id: item.restaurant_id().clone(),
                restaurant_name: UNKNOWN_RESTAURANT.to_string(),
                items: Vec::new(),
            });
            named.push(false);
            groups.len() - 1
        });

        if let (Some(group), Some(has_name)) = (groups.get_mut(position), named.get_mut(position)) {
            if !*has_name && let Some(name) = name {
                group.restaurant_name = name.to_string();
                *has_name = true;
            }
            group.items.push(item);
        }
    }

    groups
}

/// Subtotal, fees and grand total for a set of line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub delivery_fee: Decimal,
    pub service_fee: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// Assemble totals from a subtotal and a fee schedule.
    #[must_use]
    pub fn from_subtotal(subtotal: Decimal, fees: Fees) -> Self {
        Self {
            subtotal,
            delivery_fee: fees.delivery_fee,
            service_fee: fees.service_fee,
            total: subtotal + fees.total(),
        }
    }
}

/// Sum of `price × quantity` over `items`.
#[must_use]
pub fn subtotal<T: LineItem>(items: &[T]) -> Decimal {
    items.iter().map(LineItem::line_total).sum()
}

/// Compute subtotal and grand total with the given fees.
#[must_use]
pub fn compute_totals<T: LineItem>(items: &[T], fees: Fees) -> OrderTotals {
    OrderTotals::from_subtotal(subtotal(items), fees)
}
