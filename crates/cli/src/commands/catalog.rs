//! Browse restaurants and menus.

use campus_eats_core::{Price, RestaurantId};
use campus_eats_storefront::services::CatalogService;
use tracing::info;

use super::{CommandResult, Context};

/// List restaurants, optionally filtered by cuisine or keyword.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub async fn restaurants(
    ctx: &Context,
    cuisine: Option<&str>,
    search: Option<&str>,
) -> CommandResult {
    let catalog = CatalogService::new(&ctx.api, ctx.config.fallback_policy);
    let restaurants = match (search, cuisine) {
        (Some(keyword), _) => catalog.search_restaurants(keyword).await,
        (None, Some(cuisine)) => catalog.restaurants_by_cuisine(cuisine).await,
        (None, None) => catalog.restaurants().await,
    };

    if restaurants.is_empty() {
        info!("No restaurants found");
    }
    for r in &restaurants {
        let fee = Price::new(r.delivery_fee, ctx.config.currency);
        info!(
            "{:<8} {:<16} {:>4.1}★  {:<10} delivery {}  [{}]",
            r.id.as_str(),
            r.name,
            r.rating,
            r.delivery_time,
            fee,
            r.cuisine.join(", ")
        );
    }
    Ok(())
}

/// Show a restaurant's menu.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub async fn menu(ctx: &Context, restaurant_id: &str, category: Option<&str>) -> CommandResult {
    let catalog = CatalogService::new(&ctx.api, ctx.config.fallback_policy);
    let id = RestaurantId::new(restaurant_id);

    let restaurant = catalog.restaurant(&id).await;
    let items = match category {
        Some(category) => catalog.menu_items_by_category(&id, category).await,
        None => catalog.menu_items(&id).await,
    };

    info!("{} ({})", restaurant.name, restaurant.id);
    for item in items.iter().filter(|item| item.available) {
        info!(
            "  {:<8} {:<24} {:>10}  {}",
            item.id.as_str(),
            item.name,
            Price::new(item.price, ctx.config.currency).to_string(),
            item.category
        );
    }
    Ok(())
}
