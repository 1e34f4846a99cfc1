//! Wire types exchanged with the backend.
//!
//! Field names are camelCase on the wire. IDs accept numeric or string JSON.

use campus_eats_core::{MenuItemId, NewCartItem, OfferId, RestaurantId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Catalog
// =============================================================================

/// A restaurant listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub cuisine: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub delivery_time: String,
    #[serde(default)]
    pub delivery_fee: Decimal,
    #[serde(default)]
    pub min_order: Decimal,
}

impl Restaurant {
    /// Whether the restaurant lists `cuisine`, ignoring case.
    #[must_use]
    pub fn serves(&self, cuisine: &str) -> bool {
        let cuisine = cuisine.trim();
        self.cuisine.iter().any(|c| c.eq_ignore_ascii_case(cuisine))
    }

    /// Whether the name or any cuisine contains `keyword`, ignoring case.
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        let query = keyword.trim().to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.cuisine.iter().any(|c| c.to_lowercase().contains(&query))
    }
}

const fn available_by_default() -> bool {
    true
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

impl MenuItem {
    /// Build the cart entry for this dish, served by `restaurant`.
    #[must_use]
    pub fn to_cart_item(&self, restaurant: &Restaurant) -> NewCartItem {
        NewCartItem {
            id: self.id.clone(),
            restaurant_id: restaurant.id.clone(),
            restaurant_name: Some(restaurant.name.clone()),
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
        }
    }
}

/// A discounted dish featured on the home page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialOffer {
    pub id: OfferId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub restaurant_id: RestaurantId,
    #[serde(default)]
    pub restaurant_name: String,
    pub original_price: Decimal,
    pub discounted_price: Decimal,
    /// Whole-number discount percentage.
    #[serde(default)]
    pub discount: u8,
    #[serde(default)]
    pub image: String,
}

impl SpecialOffer {
    /// Amount saved against the original price.
    #[must_use]
    pub fn savings(&self) -> Decimal {
        self.original_price - self.discounted_price
    }
}

// =============================================================================
// Accounts
// =============================================================================

/// Sign-in request body.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Sign-up request body.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl std::fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignupRequest")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Response to a successful sign-in.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl std::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("roles", &self.roles)
            .finish()
    }
}

/// The signed-in user as persisted in the session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl From<&AuthResponse> for User {
    fn from(auth: &AuthResponse) -> Self {
        Self {
            id: auth.id.clone(),
            username: auth.username.clone(),
            email: auth.email.clone(),
            name: auth.name.clone(),
            roles: auth.roles.clone(),
        }
    }
}

/// Profile details shown on the account page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl UserProfile {
    /// Apply the fields present in `update`.
    #[must_use]
    pub fn with_update(mut self, update: &ProfileUpdate) -> Self {
        if let Some(name) = &update.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &update.email {
            self.email.clone_from(email);
        }
        if update.phone.is_some() {
            self.phone.clone_from(&update.phone);
        }
        self
    }
}

/// Acknowledgement returned by write endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
