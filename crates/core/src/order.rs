//! Order records, order requests and dashboard summaries.
//!
//! Fees recorded on an order are facts of that order: [`Order::totals`]
//! returns whatever the record stores and only falls back to the standard
//! schedule for values the record omits.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::cart::CartItem;
use crate::pricing::{self, LineItem, OrderTotals};
use crate::types::{
    CurrencyCode, Fees, MenuItemId, Price, OrderId, OrderProgress, OrderStatus, PaymentMethod, RestaurantId,
};

/// The restaurant an order was placed with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantRef {
    pub id: RestaurantId,
    pub name: String,
}

/// A line item on a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: MenuItemId,
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl LineItem for OrderItem {
    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn quantity(&self) -> u32 {
        self.quantity
    }
}

/// Where an order is delivered to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl From<&Address> for DeliveryAddress {
    fn from(address: &Address) -> Self {
        Self {
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
        }
    }
}

/// A map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub restaurant: RestaurantRef,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub subtotal: Option<Decimal>,
    #[serde(default)]
    pub delivery_fee: Option<Decimal>,
    #[serde(default)]
    pub service_fee: Option<Decimal>,
    #[serde(default)]
    pub total: Option<Decimal>,
    /// Currency the amounts are in, when the record says.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<CurrencyCode>,
    pub created_at: DateTime<Utc>,
    pub delivery_address: DeliveryAddress,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_location: Option<GeoPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_delivery_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

impl Order {
    /// Totals as recorded on the order.
    ///
    /// Stored values win. Missing values are derived: the subtotal from the
    /// items, fees from the standard schedule, the total from the parts.
    #[must_use]
    pub fn totals(&self) -> OrderTotals {
        let standard = Fees::standard();
        let subtotal = self
            .subtotal
            .unwrap_or_else(|| pricing::subtotal(&self.items));
        let delivery_fee = self.delivery_fee.unwrap_or(standard.delivery_fee);
        let service_fee = self.service_fee.unwrap_or(standard.service_fee);
        let total = self
            .total
            .unwrap_or(subtotal + delivery_fee + service_fee);

        OrderTotals {
            subtotal,
            delivery_fee,
            service_fee,
            total,
        }
    }

    /// Total number of units ordered.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(LineItem::quantity).sum()
    }

    /// Tracking snapshot for the order's current status.
    #[must_use]
    pub fn progress(&self) -> OrderProgress {
        OrderProgress::new(self.status)
    }

    /// Whether the order is still in flight.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Split orders into active (in flight) and past (delivered or cancelled).
#[must_use]
pub fn partition_by_activity(orders: Vec<Order>) -> (Vec<Order>, Vec<Order>) {
    orders.into_iter().partition(Order::is_active)
}

/// A line of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
}

impl From<&CartItem> for OrderItemRequest {
    fn from(item: &CartItem) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            quantity: item.quantity,
        }
    }
}

/// Order submission sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub restaurant_id: RestaurantId,
    pub delivery_address_id: crate::types::AddressId,
    pub items: Vec<OrderItemRequest>,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_instructions: Option<String>,
}

/// Dashboard counters over a set of orders.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    pub active_orders: usize,
    pub delivered_orders: usize,
    pub cancelled_orders: usize,
    /// Sum of order totals excluding cancelled orders, one entry per
    /// currency in first-seen order.
    pub revenue: Vec<Price>,
}

impl OrderSummary {
    /// Summarize `orders`. Orders without a recorded currency count as
    /// `default_currency`.
    #[must_use]
    pub fn from_orders(orders: &[Order], default_currency: CurrencyCode) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total_orders += 1;
            match order.status {
                OrderStatus::Delivered => summary.delivered_orders += 1,
                OrderStatus::Cancelled => summary.cancelled_orders += 1,
                _ => summary.active_orders += 1,
            }
            if order.status != OrderStatus::Cancelled {
                let currency = order.currency.unwrap_or(default_currency);
                let total = order.totals().total;
                match summary
                    .revenue
                    .iter_mut()
                    .find(|price| price.currency_code == currency)
                {
                    Some(price) => price.amount += total,
                    None => summary.revenue.push(Price::new(total, currency)),
                }
            }
            summary
        })
    }

    /// Revenue in `currency`, zero when no order was in it.
    #[must_use]
    pub fn revenue_in(&self, currency: CurrencyCode) -> Decimal {
        self.revenue
            .iter()
            .find(|price| price.currency_code == currency)
            .map_or(Decimal::ZERO, |price| price.amount)
    }
}
