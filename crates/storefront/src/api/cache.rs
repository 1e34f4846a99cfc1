//! Cache types for catalog responses.

use campus_eats_core::RestaurantId;

use super::types::{MenuItem, Restaurant, SpecialOffer};

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Restaurants,
    Restaurant(RestaurantId),
    Menu(RestaurantId),
    SpecialOffers,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Restaurants(Vec<Restaurant>),
    Restaurant(Box<Restaurant>),
    Menu(Vec<MenuItem>),
    SpecialOffers(Vec<SpecialOffer>),
}
