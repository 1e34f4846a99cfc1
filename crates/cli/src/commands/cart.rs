//! Inspect and edit the persisted cart.

use campus_eats_core::{CurrencyCode, LineItem, MenuItemId, Price, RestaurantId};
use campus_eats_storefront::services::CatalogService;
use rust_decimal::Decimal;
use tracing::info;

use super::{CommandResult, Context};

/// Print the cart grouped by restaurant, with totals.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn show(ctx: &Context) -> CommandResult {
    let cart = ctx.cart();
    let currency = ctx.config.currency;

    if cart.is_empty() {
        info!("Your cart is empty");
        return Ok(());
    }

    for group in cart.restaurant_groups() {
        info!("{}", group.restaurant_name);
        for item in &group.items {
            info!(
                "  {:<8} {:<24} x{:<3} {:>10}",
                item.id.as_str(),
                item.name,
                item.quantity,
                money(item.line_total(), currency)
            );
        }
    }

    let totals = cart.totals(ctx.config.fees);
    info!("Subtotal      {:>12}", money(totals.subtotal, currency));
    info!("Delivery fee  {:>12}", money(totals.delivery_fee, currency));
    info!("Service fee   {:>12}", money(totals.service_fee, currency));
    info!("Total         {:>12}", money(totals.total, currency));
    Ok(())
}

/// Look up a menu item and add one unit of it.
///
/// # Errors
///
/// Returns an error if the item is unknown or the cart cannot be saved.
pub async fn add(ctx: &Context, menu_item_id: &str, restaurant_id: Option<&str>) -> CommandResult {
    let catalog = CatalogService::new(&ctx.api, ctx.config.fallback_policy);
    let restaurant_id = restaurant_id.map(RestaurantId::new);
    let id = MenuItemId::new(menu_item_id);

    let item = catalog
        .find_menu_item(restaurant_id.as_ref(), &id)
        .await
        .ok_or_else(|| format!("Menu item {menu_item_id} not found"))?;

    let name = item.name.clone();
    let mut cart = ctx.cart();
    let quantity = cart.add_to_cart(item)?;
    info!("Added {name} (now {quantity} in cart)");
    Ok(())
}

/// Set the quantity of a cart line.
///
/// # Errors
///
/// Returns an error if the item is not in the cart.
pub fn set(ctx: &Context, menu_item_id: &str, quantity: i64) -> CommandResult {
    let mut cart = ctx.cart();
    let id = MenuItemId::new(menu_item_id);
    let quantity = cart
        .update_quantity(&id, quantity)
        .ok_or_else(|| format!("{menu_item_id} is not in the cart"))?;
    info!("{menu_item_id} quantity set to {quantity}");
    Ok(())
}

/// Remove a cart line.
///
/// # Errors
///
/// Returns an error if the item is not in the cart.
pub fn remove(ctx: &Context, menu_item_id: &str) -> CommandResult {
    let mut cart = ctx.cart();
    if !cart.remove_from_cart(&MenuItemId::new(menu_item_id)) {
        return Err(format!("{menu_item_id} is not in the cart").into());
    }
    info!("Removed {menu_item_id}");
    Ok(())
}

/// Empty the cart.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub fn clear(ctx: &Context) -> CommandResult {
    let mut cart = ctx.cart();
    let removed = cart.item_count();
    cart.clear_cart();
    info!("Cart cleared ({removed} items removed)");
    Ok(())
}

fn money(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).to_string()
}
