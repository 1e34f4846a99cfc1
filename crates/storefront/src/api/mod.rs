//! Backend REST client.
//!
//! # Architecture
//!
//! - `reqwest` with a per-request timeout; one attempt per call
//! - Catalog reads (restaurants, menus, special offers) cached via `moka`
//!   (5 minute TTL); user-scoped reads are never cached
//! - User-scoped calls send `Authorization: Bearer <token>`
//! - Every method returns `Result<_, ApiError>`; the services layer wraps
//!   each call with [`fallback`] so a missing backend degrades to fixture data
//!
//! # Example
//!
//! ```rust,ignore
//! use campus_eats_storefront::api::{ApiClient, call_with_fallback};
//!
//! let client = ApiClient::new(&config.api)?;
//! let restaurants =
//!     call_with_fallback(client.restaurants(), fixtures::restaurants(), "restaurants").await;
//! ```

mod cache;
pub mod fallback;
pub mod types;

pub use fallback::{FallbackPolicy, call_with_fallback, call_with_fallback_with};
pub use types::*;

use std::sync::Arc;
use std::time::Duration;

use campus_eats_core::{Address, AddressDraft, AddressId, Order, OrderId, OrderRequest, RestaurantId};
use moka::future::Cache;
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::ApiConfig;

use cache::{CacheKey, CacheValue};

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot carry path segments.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the Campus Eats backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    cache: Cache<CacheKey, CacheValue>,
}

impl ApiClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                cache,
            }),
        })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Drop every cached catalog response.
    pub fn invalidate_cache(&self) {
        self.inner.cache.invalidate_all();
    }

    /// Build an endpoint URL from percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_token(request: RequestBuilder, token: Option<&SecretString>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and decode a JSON body.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| {
            debug!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    /// Send a request and return the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            debug!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Backend returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        Ok(text)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        token: Option<&SecretString>,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        self.execute(Self::with_token(self.inner.client.get(url), token))
            .await
    }

    async fn send_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        segments: &[&str],
        token: Option<&SecretString>,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(segments)?;
        let request = self.inner.client.request(method, url).json(body);
        self.execute(Self::with_token(request, token)).await
    }

    // =========================================================================
    // Auth Methods
    // =========================================================================

    /// Sign in with a username and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the credentials are rejected.
    #[instrument(skip(self, credentials), fields(username = %credentials.username))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.send_json(reqwest::Method::POST, &["auth", "signin"], None, credentials)
            .await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the backend refuses the signup.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn sign_up(&self, request: &SignupRequest) -> Result<MessageResponse, ApiError> {
        self.send_json(reqwest::Method::POST, &["auth", "signup"], None, request)
            .await
    }

    // =========================================================================
    // Catalog Methods
    // =========================================================================

    /// List every restaurant.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, ApiError> {
        if let Some(CacheValue::Restaurants(restaurants)) =
            self.inner.cache.get(&CacheKey::Restaurants).await
        {
            debug!("Cache hit for restaurants");
            return Ok(restaurants);
        }

        let restaurants: Vec<Restaurant> = self.get_json(&["restaurants"], None).await?;

        self.inner
            .cache
            .insert(
                CacheKey::Restaurants,
                CacheValue::Restaurants(restaurants.clone()),
            )
            .await;

        Ok(restaurants)
    }

    /// Get a restaurant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the restaurant is not found or the request fails.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn restaurant(&self, id: &RestaurantId) -> Result<Restaurant, ApiError> {
        let cache_key = CacheKey::Restaurant(id.clone());

        if let Some(CacheValue::Restaurant(restaurant)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for restaurant");
            return Ok(*restaurant);
        }

        let restaurant: Restaurant = self.get_json(&["restaurants", id.as_str()], None).await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Restaurant(Box::new(restaurant.clone())))
            .await;

        Ok(restaurant)
    }

    /// List restaurants serving a cuisine.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn restaurants_by_cuisine(&self, cuisine: &str) -> Result<Vec<Restaurant>, ApiError> {
        self.get_json(&["restaurants", "cuisine", cuisine], None).await
    }

    /// Search restaurants by keyword.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, keyword: &str) -> Result<Vec<Restaurant>, ApiError> {
        let mut url = self.endpoint(&["restaurants", "search"])?;
        url.query_pairs_mut().append_pair("keyword", keyword);
        self.execute(self.inner.client.get(url)).await
    }

    /// List a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu_items(&self, restaurant_id: &RestaurantId) -> Result<Vec<MenuItem>, ApiError> {
        let cache_key = CacheKey::Menu(restaurant_id.clone());

        if let Some(CacheValue::Menu(items)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(items);
        }

        let items: Vec<MenuItem> = self
            .get_json(&["menu-items", "restaurant", restaurant_id.as_str()], None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Menu(items.clone()))
            .await;

        Ok(items)
    }

    /// List a restaurant's menu items in one category.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu_items_by_category(
        &self,
        restaurant_id: &RestaurantId,
        category: &str,
    ) -> Result<Vec<MenuItem>, ApiError> {
        self.get_json(
            &["menu-items", "restaurant", restaurant_id.as_str(), "category", category],
            None,
        )
        .await
    }

    /// List today's special offers.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn special_offers(&self) -> Result<Vec<SpecialOffer>, ApiError> {
        if let Some(CacheValue::SpecialOffers(offers)) =
            self.inner.cache.get(&CacheKey::SpecialOffers).await
        {
            debug!("Cache hit for special offers");
            return Ok(offers);
        }

        let offers: Vec<SpecialOffer> = self.get_json(&["special-offers"], None).await?;

        self.inner
            .cache
            .insert(CacheKey::SpecialOffers, CacheValue::SpecialOffers(offers.clone()))
            .await;

        Ok(offers)
    }

    // =========================================================================
    // Order Methods
    // =========================================================================

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_order(
        &self,
        token: &SecretString,
        request: &OrderRequest,
    ) -> Result<Order, ApiError> {
        self.send_json(reqwest::Method::POST, &["orders"], Some(token), request)
            .await
    }

    /// List the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn user_orders(&self, token: &SecretString) -> Result<Vec<Order>, ApiError> {
        self.get_json(&["orders", "user"], Some(token)).await
    }

    /// Get one of the signed-in user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn order(&self, token: &SecretString, id: &OrderId) -> Result<Order, ApiError> {
        self.get_json(&["orders", id.as_str()], Some(token)).await
    }

    /// Look up an order by its public order number.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn order_by_number(&self, order_number: &str) -> Result<Order, ApiError> {
        self.get_json(&["orders", "tracking", order_number], None).await
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Get the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &SecretString) -> Result<UserProfile, ApiError> {
        self.get_json(&["users", "profile"], Some(token)).await
    }

    /// Update the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: &SecretString,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        self.send_json(reqwest::Method::PUT, &["users", "profile"], Some(token), update)
            .await
    }

    /// List the signed-in user's addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn addresses(&self, token: &SecretString) -> Result<Vec<Address>, ApiError> {
        self.get_json(&["users", "addresses"], Some(token)).await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, draft))]
    pub async fn add_address(
        &self,
        token: &SecretString,
        draft: &AddressDraft,
    ) -> Result<Address, ApiError> {
        self.send_json(reqwest::Method::POST, &["users", "addresses"], Some(token), draft)
            .await
    }

    /// Replace an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token, draft), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        token: &SecretString,
        id: &AddressId,
        draft: &AddressDraft,
    ) -> Result<Address, ApiError> {
        self.send_json(
            reqwest::Method::PUT,
            &["users", "addresses", id.as_str()],
            Some(token),
            draft,
        )
        .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, token), fields(address_id = %id))]
    pub async fn delete_address(&self, token: &SecretString, id: &AddressId) -> Result<(), ApiError> {
        let url = self.endpoint(&["users", "addresses", id.as_str()])?;
        let request = Self::with_token(self.inner.client.delete(url), Some(token));
        self.send(request).await.map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(1),
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("http://localhost:8080/api");
        let url = api.endpoint(&["menu-items", "restaurant", "rest-1"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/api/menu-items/restaurant/rest-1");
    }

    #[test]
    fn test_endpoint_encodes_user_input() {
        let api = client("http://localhost:8080/api/");
        let url = api
            .endpoint(&["restaurants", "cuisine", "Fast Food/Burgers"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/api/restaurants/cuisine/Fast%20Food%2FBurgers"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = ApiClient::new(&ApiConfig {
            base_url: "mailto:someone@example.com".to_string(),
            timeout: Duration::from_secs(1),
        });
        assert!(matches!(result, Err(ApiError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_http_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let api = client("http://127.0.0.1:9/api");
        let result = api.restaurants().await;
        assert!(matches!(result, Err(ApiError::Http(_))));
    }
}
