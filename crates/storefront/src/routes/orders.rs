//! Checkout, order history and tracking handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use campus_eats_core::{CheckoutForm, Order, OrderId, OrderProgress, OrderStatus};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::OrderHistory;
use crate::state::AppState;
use crate::tracking::OrderTracker;

/// Tracking snapshot as shown on the tracking page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingView {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub progress: u8,
    pub label: &'static str,
    pub eta_minutes: u32,
}

impl TrackingView {
    fn new(order_id: OrderId, progress: OrderProgress) -> Self {
        Self {
            order_id,
            status: progress.status,
            progress: progress.progress,
            label: progress.label(),
            eta_minutes: progress.eta_minutes(),
        }
    }
}

/// Place an order for the cart and start tracking it.
///
/// POST /checkout
///
/// # Errors
///
/// Returns 400 if the cart is empty or the form is incomplete.
#[instrument(skip(state, form))]
pub async fn checkout(
    State(state): State<AppState>,
    Json(form): Json<CheckoutForm>,
) -> Result<(StatusCode, Json<Order>)> {
    let token = state.token().await;
    let service = state.order_service(token.as_ref());

    let order = {
        let addresses = state.address_book().await;
        let mut cart = state.cart().await;
        service.checkout(&mut *cart, &form, &addresses).await?
    };

    add_breadcrumb(
        "checkout",
        "Order placed",
        Some(&[("order_number", order.order_number.as_str())]),
    );

    state.record_order(order.clone()).await;
    state.track(&order).await;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Order history split into active and past orders.
///
/// Orders placed through this process are listed first when the backend
/// does not return them.
///
/// GET /orders
pub async fn index(State(state): State<AppState>) -> Json<OrderHistory> {
    Json(OrderHistory::from(state.orders().await))
}

/// Order detail, with the live tracked status if the order is tracked.
///
/// GET /orders/{id}
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(id): Path<OrderId>) -> Json<Order> {
    let token = state.token().await;
    let known = state.placed_order(&id).await;
    let mut order = state.order_service(token.as_ref()).get(&id, known).await;
    state.apply_live_status(std::slice::from_mut(&mut order)).await;

    Json(order)
}

/// Look up an order by its public number.
///
/// GET /track/{order_number}
#[instrument(skip(state))]
pub async fn by_number(
    State(state): State<AppState>,
    Path(order_number): Path<String>,
) -> Json<Order> {
    Json(state.order_service(None).track_by_number(&order_number).await)
}

/// Tracking snapshot. Starts tracking the order if it is not tracked yet.
///
/// GET /orders/{id}/tracking
///
/// # Errors
///
/// Returns 404 unless the order was placed here, is confirmed by the
/// backend, or is one of the mock orders.
#[instrument(skip(state))]
pub async fn tracking(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<TrackingView>> {
    if let Some(progress) = state.tracked_progress(&id).await {
        return Ok(Json(TrackingView::new(id, progress)));
    }

    let order = match state.placed_order(&id).await {
        Some(order) => order,
        None => {
            let token = state.token().await;
            state
                .order_service(token.as_ref())
                .lookup(&id)
                .await
                .ok_or_else(|| AppError::NotFound(format!("order {id}")))?
        }
    };

    let progress = state.track(&order).await;
    Ok(Json(TrackingView::new(id, progress)))
}

/// Confirm delivery of an out-for-delivery order.
///
/// POST /orders/{id}/tracking/deliver
///
/// # Errors
///
/// Returns 404 if the order is not tracked and 409 unless it is out for
/// delivery.
#[instrument(skip(state))]
pub async fn deliver(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<TrackingView>> {
    let progress = state
        .update_tracker(&id, OrderTracker::confirm_delivery)
        .await
        .ok_or_else(|| AppError::NotFound(format!("tracked order {id}")))??;
    Ok(Json(TrackingView::new(id, progress)))
}

/// Cancel a tracked order.
///
/// POST /orders/{id}/tracking/cancel
///
/// # Errors
///
/// Returns 404 if the order is not tracked and 409 if it already finished.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<TrackingView>> {
    let progress = state
        .update_tracker(&id, OrderTracker::cancel)
        .await
        .ok_or_else(|| AppError::NotFound(format!("tracked order {id}")))??;
    Ok(Json(TrackingView::new(id, progress)))
}
