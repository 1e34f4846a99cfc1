//! Checkout, order history and tracking lookups.

use campus_eats_core::order::partition_by_activity;
use campus_eats_core::{
    AddressBook, CartStore, CheckoutError, CheckoutForm, CurrencyCode, Fees, KeyValueStore,
    Order, OrderId,
};
use chrono::Utc;
use secrecy::SecretString;
use serde::Serialize;
use tracing::{info, instrument};

use crate::api::{ApiClient, FallbackPolicy};
use crate::fixtures;

/// Orders split for the order history page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHistory {
    /// Received through out for delivery.
    pub active: Vec<Order>,
    /// Delivered or cancelled.
    pub past: Vec<Order>,
}

impl From<Vec<Order>> for OrderHistory {
    fn from(orders: Vec<Order>) -> Self {
        let (active, past) = partition_by_activity(orders);
        Self { active, past }
    }
}

/// Order operations for the signed-in user.
///
/// Without a token the mock order data is used and nothing is sent.
pub struct OrderService<'a> {
    api: &'a ApiClient,
    policy: FallbackPolicy,
    token: Option<&'a SecretString>,
    fees: Fees,
    currency: CurrencyCode,
}

impl<'a> OrderService<'a> {
    /// Create a new order service charging the standard fees in rupees.
    #[must_use]
    pub const fn new(
        api: &'a ApiClient,
        policy: FallbackPolicy,
        token: Option<&'a SecretString>,
    ) -> Self {
        Self {
            api,
            policy,
            token,
            fees: Fees::standard(),
            currency: CurrencyCode::INR,
        }
    }

    /// Charge `fees` in `currency` on orders placed locally.
    ///
    /// These must match what the cart was shown with.
    #[must_use]
    pub const fn with_pricing(mut self, fees: Fees, currency: CurrencyCode) -> Self {
        self.fees = fees;
        self.currency = currency;
        self
    }

    /// Place an order for everything in `cart` and empty the cart.
    ///
    /// The delivery address must exist in `addresses`. When the backend does
    /// not take the order, a local order is produced from the cart instead.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError` if the cart is empty, the form is incomplete or
    /// the address is unknown. The cart is untouched in that case.
    #[instrument(skip_all, fields(payment_method = %form.payment_method))]
    pub async fn checkout<S: KeyValueStore>(
        &self,
        cart: &mut CartStore<S>,
        form: &CheckoutForm,
        addresses: &AddressBook,
    ) -> Result<Order, CheckoutError> {
        let request = form.build_request(cart.items())?;
        let address = addresses
            .get(&request.delivery_address_id)
            .ok_or(CheckoutError::MissingAddress)?;

        let local = || {
            fixtures::placed_order(
                &request,
                cart.items(),
                Some(address),
                self.fees,
                self.currency,
                Utc::now(),
            )
        };
        let order = match self.token {
            Some(token) => {
                self.policy
                    .call_with(self.api.create_order(token, &request), local, "create order")
                    .await
            }
            None => local(),
        };

        cart.clear_cart();
        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            "Order placed"
        );
        Ok(order)
    }

    /// Every order of the signed-in user, newest first as returned.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Vec<Order> {
        let mock = || fixtures::mock_orders(Utc::now());
        match self.token {
            Some(token) => {
                self.policy
                    .call_with(self.api.user_orders(token), mock, "user orders")
                    .await
            }
            None => mock(),
        }
    }

    /// Orders split into active and past.
    pub async fn history(&self) -> OrderHistory {
        OrderHistory::from(self.list().await)
    }

    /// One order.
    ///
    /// `known` is served when the backend cannot answer; without it a mock
    /// order being prepared is returned under `id`.
    #[instrument(skip(self, known), fields(order_id = %id))]
    pub async fn get(&self, id: &OrderId, known: Option<Order>) -> Order {
        let fallback = || {
            known.unwrap_or_else(|| {
                fixtures::mock_order(id, fixtures::generate_order_number(), Utc::now())
            })
        };
        match self.token {
            Some(token) => {
                self.policy
                    .call_with(self.api.order(token, id), fallback, "order")
                    .await
            }
            None => fallback(),
        }
    }

    /// An order that actually exists: confirmed by the backend, or one of
    /// the mock orders when the backend cannot answer.
    ///
    /// Unlike [`Self::get`] nothing is made up for unknown ids.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn lookup(&self, id: &OrderId) -> Option<Order> {
        let mock = || {
            fixtures::mock_orders(Utc::now())
                .into_iter()
                .find(|order| order.id == *id)
        };
        match self.token {
            Some(token) => {
                self.policy
                    .call_with(
                        async { self.api.order(token, id).await.map(Some) },
                        mock,
                        "order lookup",
                    )
                    .await
            }
            None => mock(),
        }
    }

    /// Look up an order by its public order number. No session needed.
    #[instrument(skip(self))]
    pub async fn track_by_number(&self, order_number: &str) -> Order {
        self.policy
            .call_with(
                self.api.order_by_number(order_number),
                || {
                    let id = OrderId::new(format!("order-{order_number}"));
                    fixtures::mock_order(&id, order_number.to_string(), Utc::now())
                },
                "order tracking",
            )
            .await
    }
}
