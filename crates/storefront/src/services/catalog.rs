//! Catalog reads with fixture fallback.

use campus_eats_core::{MenuItemId, NewCartItem, RestaurantId};
use tracing::instrument;

use crate::api::{ApiClient, FallbackPolicy, MenuItem, Restaurant, SpecialOffer};
use crate::fixtures::{self, images};

/// Restaurants, menus and offers, from the backend when it answers.
///
/// Remote items without a photo get one from the fixture image table.
pub struct CatalogService<'a> {
    api: &'a ApiClient,
    policy: FallbackPolicy,
}

impl<'a> CatalogService<'a> {
    /// Create a new catalog service.
    #[must_use]
    pub const fn new(api: &'a ApiClient, policy: FallbackPolicy) -> Self {
        Self { api, policy }
    }

    /// Every restaurant.
    #[instrument(skip(self))]
    pub async fn restaurants(&self) -> Vec<Restaurant> {
        let restaurants = self
            .policy
            .call_with(self.api.restaurants(), fixtures::restaurants, "restaurants")
            .await;
        with_covers(restaurants)
    }

    /// One restaurant; unknown ids resolve to the first fixture restaurant
    /// when the backend is away.
    #[instrument(skip(self), fields(restaurant_id = %id))]
    pub async fn restaurant(&self, id: &RestaurantId) -> Restaurant {
        let mut restaurant = self
            .policy
            .call_with(
                self.api.restaurant(id),
                || fixtures::restaurant(id),
                "restaurant",
            )
            .await;
        fill_cover(&mut restaurant);
        restaurant
    }

    /// Restaurants serving `cuisine`.
    #[instrument(skip(self))]
    pub async fn restaurants_by_cuisine(&self, cuisine: &str) -> Vec<Restaurant> {
        let restaurants = self
            .policy
            .call_with(
                self.api.restaurants_by_cuisine(cuisine),
                || fixtures::restaurants_by_cuisine(cuisine),
                "restaurants by cuisine",
            )
            .await;
        with_covers(restaurants)
    }

    /// Restaurants matching `keyword` by name or cuisine.
    #[instrument(skip(self))]
    pub async fn search_restaurants(&self, keyword: &str) -> Vec<Restaurant> {
        let restaurants = self
            .policy
            .call_with(
                self.api.search_restaurants(keyword),
                || fixtures::search_restaurants(keyword),
                "restaurant search",
            )
            .await;
        with_covers(restaurants)
    }

    /// A restaurant's menu.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu_items(&self, restaurant_id: &RestaurantId) -> Vec<MenuItem> {
        let items = self
            .policy
            .call_with(
                self.api.menu_items(restaurant_id),
                || fixtures::menu_items(restaurant_id),
                "menu items",
            )
            .await;
        with_food_images(items)
    }

    /// A restaurant's menu items in `category`.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn menu_items_by_category(
        &self,
        restaurant_id: &RestaurantId,
        category: &str,
    ) -> Vec<MenuItem> {
        let items = self
            .policy
            .call_with(
                self.api.menu_items_by_category(restaurant_id, category),
                || fixtures::menu_items_by_category(restaurant_id, category),
                "menu items by category",
            )
            .await;
        with_food_images(items)
    }

    /// Today's special offers.
    #[instrument(skip(self))]
    pub async fn special_offers(&self) -> Vec<SpecialOffer> {
        let mut offers = self
            .policy
            .call_with(
                self.api.special_offers(),
                fixtures::special_offers,
                "special offers",
            )
            .await;
        for offer in &mut offers {
            if offer.image.is_empty() {
                offer.image = images::special_offer_image(offer.id.as_str()).to_string();
            }
        }
        offers
    }

    /// Find a dish and build its cart entry.
    ///
    /// Only `restaurant_id`'s menu is searched when given, otherwise every
    /// restaurant's menu in listing order.
    #[instrument(skip(self), fields(menu_item_id = %item_id))]
    pub async fn find_menu_item(
        &self,
        restaurant_id: Option<&RestaurantId>,
        item_id: &MenuItemId,
    ) -> Option<NewCartItem> {
        let restaurants = match restaurant_id {
            Some(id) => vec![self.restaurant(id).await],
            None => self.restaurants().await,
        };

        for restaurant in &restaurants {
            let menu = self.menu_items(&restaurant.id).await;
            if let Some(item) = menu.iter().find(|item| &item.id == item_id) {
                return Some(item.to_cart_item(restaurant));
            }
        }
        None
    }
}

fn fill_cover(restaurant: &mut Restaurant) {
    if restaurant.image.is_empty() {
        restaurant.image = images::restaurant_cover(restaurant.id.as_str()).to_string();
    }
}

fn with_covers(mut restaurants: Vec<Restaurant>) -> Vec<Restaurant> {
    restaurants.iter_mut().for_each(fill_cover);
    restaurants
}

fn with_food_images(mut items: Vec<MenuItem>) -> Vec<MenuItem> {
    for item in &mut items {
        if item.image.is_empty() {
            let category = Some(item.category.as_str()).filter(|c| !c.is_empty());
            item.image = images::food_image(item.id.as_str(), category).to_string();
        }
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::time::Duration;

    use rust_decimal::Decimal;

    use super::*;
    use crate::config::ApiConfig;

    fn offline_client() -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout: Duration::from_millis(200),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_offline_catalog_uses_fixtures() {
        let api = offline_client();
        let catalog = CatalogService::new(&api, FallbackPolicy::Quiet);

        assert_eq!(catalog.restaurants().await.len(), 6);
        assert_eq!(catalog.special_offers().await, fixtures::special_offers());

        let unknown = catalog.restaurant(&RestaurantId::new("rest-404")).await;
        assert_eq!(unknown.id, RestaurantId::new("rest-1"));
    }

    #[tokio::test]
    async fn test_find_menu_item_searches_all_menus() {
        let api = offline_client();
        let catalog = CatalogService::new(&api, FallbackPolicy::Quiet);

        let naan = catalog
            .find_menu_item(None, &MenuItemId::new("item-27"))
            .await
            .unwrap();
        assert_eq!(naan.name, "Garlic Naan");
        assert_eq!(naan.price, Decimal::from(79));
        assert_eq!(naan.restaurant_id, RestaurantId::new("rest-6"));
        assert_eq!(naan.restaurant_name.as_deref(), Some("Curry Corner"));

        let missing = catalog
            .find_menu_item(None, &MenuItemId::new("item-999"))
            .await;
        assert!(missing.is_none());
    }

    #[test]
    fn test_missing_images_are_filled() {
        let items = with_food_images(vec![MenuItem {
            id: MenuItemId::new("item-x"),
            restaurant_id: None,
            name: "Mystery Roll".to_string(),
            description: String::new(),
            price: Decimal::ONE,
            image: String::new(),
            category: "Sushi Rolls".to_string(),
            available: true,
        }]);
        assert_eq!(items[0].image, images::food_image("item-x", Some("Sushi Rolls")));
    }
}
