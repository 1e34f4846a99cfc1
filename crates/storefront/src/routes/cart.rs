//! Cart route handlers.
//!
//! Every mutation responds with the full cart view so clients never have to
//! recompute totals.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use campus_eats_core::{
    CartItem, CartStore, KeyValueStore, MenuItemId, NewCartItem, OrderTotals, Price,
    RestaurantId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::StorefrontConfig;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::CatalogService;
use crate::state::AppState;

/// Cart line items from one restaurant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartGroupView {
    pub restaurant_id: RestaurantId,
    pub restaurant_name: String,
    pub items: Vec<CartItem>,
    pub subtotal: Decimal,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub groups: Vec<CartGroupView>,
    pub item_count: u32,
    pub totals: OrderTotals,
    /// Grand total formatted in the display currency.
    pub formatted_total: String,
}

impl CartView {
    /// Build the view with the configured fees and currency.
    pub fn new<S: KeyValueStore>(cart: &CartStore<S>, config: &StorefrontConfig) -> Self {
        let totals = cart.totals(config.fees);
        let groups = cart
            .restaurant_groups()
            .into_iter()
            .map(|group| CartGroupView {
                subtotal: group.subtotal(),
                restaurant_id: group.restaurant_id,
                restaurant_name: group.restaurant_name,
                items: group.items.into_iter().cloned().collect(),
            })
            .collect();

        Self {
            items: cart.items().to_vec(),
            groups,
            item_count: cart.item_count(),
            formatted_total: Price::new(totals.total, config.currency).display(),
            totals,
        }
    }
}

/// Add-to-cart body: either a complete item, or a menu item to look up.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddToCart {
    Item(NewCartItem),
    #[serde(rename_all = "camelCase")]
    Lookup {
        menu_item_id: MenuItemId,
        #[serde(default)]
        restaurant_id: Option<RestaurantId>,
    },
}

/// Quantity update body.
#[derive(Debug, Deserialize)]
pub struct UpdateQuantity {
    pub quantity: i64,
}

/// Show the cart.
///
/// GET /cart
pub async fn show(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart().await;
    Json(CartView::new(&cart, state.config()))
}

/// Add one unit of an item.
///
/// POST /cart/items
///
/// # Errors
///
/// Returns 404 if a looked-up menu item does not exist and 400 for a
/// negative price.
#[instrument(skip(state, body))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddToCart>,
) -> Result<Json<CartView>> {
    let item = match body {
        AddToCart::Item(item) => item,
        AddToCart::Lookup {
            menu_item_id,
            restaurant_id,
        } => CatalogService::new(state.api(), state.fallback_policy())
            .find_menu_item(restaurant_id.as_ref(), &menu_item_id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("menu item {menu_item_id}")))?,
    };

    add_breadcrumb("cart", "Added item", Some(&[("menu_item_id", item.id.as_str())]));

    let mut cart = state.cart().await;
    cart.add_to_cart(item)?;
    Ok(Json(CartView::new(&cart, state.config())))
}

/// Set an item's quantity. Values below one become one.
///
/// PATCH /cart/items/{id}
///
/// # Errors
///
/// Returns 404 if the item is not in the cart.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
    Json(body): Json<UpdateQuantity>,
) -> Result<Json<CartView>> {
    let mut cart = state.cart().await;
    cart.update_quantity(&id, body.quantity)
        .ok_or_else(|| AppError::NotFound(format!("cart item {id}")))?;
    Ok(Json(CartView::new(&cart, state.config())))
}

/// Remove an item.
///
/// DELETE /cart/items/{id}
///
/// # Errors
///
/// Returns 404 if the item is not in the cart.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<MenuItemId>,
) -> Result<Json<CartView>> {
    let mut cart = state.cart().await;
    if !cart.remove_from_cart(&id) {
        return Err(AppError::NotFound(format!("cart item {id}")));
    }
    Ok(Json(CartView::new(&cart, state.config())))
}

/// Empty the cart.
///
/// DELETE /cart
pub async fn clear(State(state): State<AppState>) -> StatusCode {
    state.cart().await.clear_cart();
    StatusCode::NO_CONTENT
}
