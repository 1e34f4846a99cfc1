//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use campus_eats_core::{
    AddressBook, CartStore, KeyValueStore, MemoryStore, Order, OrderId, OrderProgress,
    PlacedOrders, TransitionError,
};
use secrecy::SecretString;
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use crate::api::{ApiClient, ApiError, FallbackPolicy};
use crate::config::StorefrontConfig;
use crate::services::session::detach_token;
use crate::services::{AddressService, OrderService, Session};
use crate::store::FileStore;
use crate::tracking::OrderTracker;

/// Type-erased snapshot backend.
pub type BoxedStore = Box<dyn KeyValueStore + Sync>;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Each piece of mutable state sits behind its
/// own async mutex; handlers never hold two of them across a remote call
/// except the address book, which is filled lazily on first use.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    api: ApiClient,
    cart: Mutex<CartStore<BoxedStore>>,
    session: Mutex<Session<BoxedStore>>,
    addresses: Mutex<Option<AddressBook>>,
    placed: Mutex<PlacedOrders<MemoryStore>>,
    trackers: Mutex<HashMap<OrderId, OrderTracker>>,
    settled: Mutex<HashMap<OrderId, OrderProgress>>,
}

impl AppState {
    /// Create state persisting the cart and session under the configured
    /// data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend base URL is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, ApiError> {
        let store = FileStore::new(&config.data_dir);
        Self::with_stores(config, Box::new(store.clone()), Box::new(store))
    }

    /// Create state over explicit snapshot backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend base URL is invalid.
    pub fn with_stores(
        config: StorefrontConfig,
        cart_store: BoxedStore,
        session_store: BoxedStore,
    ) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                api,
                cart: Mutex::new(CartStore::load(cart_store)),
                session: Mutex::new(Session::load(session_store)),
                addresses: Mutex::new(None),
                placed: Mutex::new(PlacedOrders::load(MemoryStore::new())),
                trackers: Mutex::new(HashMap::new()),
                settled: Mutex::new(HashMap::new()),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backend client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Fallback logging policy from configuration.
    #[must_use]
    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.inner.config.fallback_policy
    }

    /// Lock the cart.
    pub async fn cart(&self) -> MutexGuard<'_, CartStore<BoxedStore>> {
        self.inner.cart.lock().await
    }

    /// Lock the session.
    pub async fn session(&self) -> MutexGuard<'_, Session<BoxedStore>> {
        self.inner.session.lock().await
    }

    /// Copy of the current session token.
    pub async fn token(&self) -> Option<SecretString> {
        detach_token(self.session().await.token())
    }

    /// Lock the address book, fetching it on first use.
    pub async fn address_book(&self) -> MappedMutexGuard<'_, AddressBook> {
        let mut guard = self.inner.addresses.lock().await;
        if guard.is_none() {
            let token = self.token().await;
            let service =
                AddressService::new(self.api(), self.fallback_policy(), token.as_ref());
            *guard = Some(service.load().await);
        }
        MutexGuard::map(guard, |book| book.get_or_insert_with(AddressBook::new))
    }

    /// Drop the cached address book so the next access refetches it.
    pub async fn reset_address_book(&self) {
        *self.inner.addresses.lock().await = None;
    }

    /// Remember an order placed through this process.
    pub async fn record_order(&self, order: Order) {
        self.inner.placed.lock().await.record(order);
    }

    /// An order placed through this process.
    pub async fn placed_order(&self, id: &OrderId) -> Option<Order> {
        self.inner.placed.lock().await.get(id).cloned()
    }

    /// Order operations for `token`, charging the fees the cart shows.
    #[must_use]
    pub fn order_service<'a>(&'a self, token: Option<&'a SecretString>) -> OrderService<'a> {
        OrderService::new(self.api(), self.fallback_policy(), token)
            .with_pricing(self.inner.config.fees, self.inner.config.currency)
    }

    /// The user's orders with live tracked statuses applied.
    ///
    /// Orders placed through this process come first unless the backend
    /// already lists them.
    pub async fn orders(&self) -> Vec<Order> {
        let token = self.token().await;
        let fetched = self.order_service(token.as_ref()).list().await;

        let mut orders = self.inner.placed.lock().await.merge(fetched);
        self.apply_live_status(&mut orders).await;
        orders
    }

    /// Overwrite the status of every tracked or settled order in `orders`.
    pub async fn apply_live_status(&self, orders: &mut [Order]) {
        let trackers = self.inner.trackers.lock().await;
        let settled = self.inner.settled.lock().await;
        for order in orders {
            let live = trackers
                .get(&order.id)
                .map(OrderTracker::snapshot)
                .or_else(|| settled.get(&order.id).copied());
            if let Some(progress) = live {
                order.status = progress.status;
            }
        }
    }

    /// Start tracking `order` unless it is tracked already or finished.
    ///
    /// Returns the current progress.
    pub async fn track(&self, order: &Order) -> OrderProgress {
        let mut trackers = self.inner.trackers.lock().await;
        let settled = self.inner.settled.lock().await;
        if let Some(tracker) = trackers.get(&order.id) {
            return tracker.snapshot();
        }
        if let Some(progress) = settled.get(&order.id) {
            return *progress;
        }

        let initial = order.progress();
        if !initial.status.is_terminal() {
            trackers.insert(
                order.id.clone(),
                OrderTracker::start(initial, self.inner.config.status_dwell),
            );
        }
        initial
    }

    /// Progress of a tracked or settled order.
    pub async fn tracked_progress(&self, id: &OrderId) -> Option<OrderProgress> {
        let trackers = self.inner.trackers.lock().await;
        let settled = self.inner.settled.lock().await;
        trackers
            .get(id)
            .map(OrderTracker::snapshot)
            .or_else(|| settled.get(id).copied())
    }

    /// Apply `change` to a tracked order.
    ///
    /// An order that reaches DELIVERED or CANCELLED stops being tracked; its
    /// final progress is kept and further changes are refused. Returns `None`
    /// if the order was never tracked.
    pub async fn update_tracker<F>(
        &self,
        id: &OrderId,
        change: F,
    ) -> Option<Result<OrderProgress, TransitionError>>
    where
        F: FnOnce(&OrderTracker) -> Result<OrderProgress, TransitionError>,
    {
        let mut trackers = self.inner.trackers.lock().await;
        let mut settled = self.inner.settled.lock().await;
        if let Some(progress) = settled.get(id) {
            return Some(Err(TransitionError::Terminal(progress.status)));
        }

        let result = change(trackers.get(id)?);
        if let Some(progress) = result.as_ref().ok().filter(|p| p.status.is_terminal()) {
            trackers.remove(id);
            settled.insert(id.clone(), *progress);
        }
        Some(result)
    }

    /// Number of orders with a running tracker.
    pub async fn running_trackers(&self) -> usize {
        self.inner.trackers.lock().await.len()
    }
}
