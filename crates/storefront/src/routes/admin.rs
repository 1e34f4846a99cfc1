//! Admin dashboard handlers.

use axum::{Json, extract::State};
use campus_eats_core::OrderSummary;
use serde::Serialize;

use crate::state::AppState;

/// Dashboard counters plus revenue formatted for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryView {
    #[serde(flatten)]
    pub summary: OrderSummary,
    /// One entry per currency, e.g. "₹3,139.00".
    pub formatted_revenue: Vec<String>,
}

/// Order counters and revenue over the same orders `/orders` lists.
///
/// GET /admin/summary
pub async fn summary(State(state): State<AppState>) -> Json<SummaryView> {
    let orders = state.orders().await;
    let summary = OrderSummary::from_orders(&orders, state.config().currency);

    Json(SummaryView {
        formatted_revenue: summary.revenue.iter().map(|price| price.display()).collect(),
        summary,
    })
}
