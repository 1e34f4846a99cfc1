//! Checkout, order history and live tracking.

use std::time::Duration;

use campus_eats_core::{
    AddressId, CardDetails, CheckoutForm, Order, OrderId, OrderProgress, OrderStatus,
    PaymentMethod, Price,
};
use campus_eats_storefront::services::{AddressService, OrderHistory, OrderService, Session};
use campus_eats_storefront::store::FileStore;
use campus_eats_storefront::tracking::{AUTO_ADVANCE_LIMIT, OrderTracker};
use tracing::info;

use super::{CommandResult, Context};

/// Checkout arguments collected from the command line.
#[derive(Debug, Default)]
pub struct CheckoutArgs {
    pub payment: PaymentMethod,
    pub address: Option<String>,
    pub card: CardDetails,
    pub instructions: Option<String>,
}

/// Place an order for the whole cart.
///
/// Without `--address` the default saved address is used.
///
/// # Errors
///
/// Returns an error if the cart is empty, the form is incomplete or the
/// address is unknown.
pub async fn checkout(ctx: &Context, args: CheckoutArgs) -> CommandResult {
    let session = ctx.session();
    let policy = ctx.config.fallback_policy;

    let book = AddressService::new(&ctx.api, policy, session.token())
        .load()
        .await;
    let address_id = match args.address {
        Some(id) => Some(AddressId::new(id)),
        None => book.preferred().map(|address| address.id.clone()),
    };

    let form = CheckoutForm {
        delivery_address_id: address_id,
        payment_method: args.payment,
        card: args.card,
        delivery_instructions: args.instructions,
    };

    let mut cart = ctx.cart();
    let order = order_service(ctx, &session)
        .checkout(&mut cart, &form, &book)
        .await?;

    info!("Order {} placed", order.order_number);
    print_order(ctx, &order);
    info!("Track it with: ce-cli track {}", order.id);
    ctx.placed().record(order);
    Ok(())
}

/// List active and past orders.
///
/// # Errors
///
/// Never fails; the signature matches the other commands.
pub async fn history(ctx: &Context) -> CommandResult {
    let session = ctx.session();
    let fetched = order_service(ctx, &session).list().await;
    let history = OrderHistory::from(ctx.placed().merge(fetched));

    info!("Active orders: {}", history.active.len());
    for order in &history.active {
        print_line(ctx, order);
    }
    info!("Past orders: {}", history.past.len());
    for order in &history.past {
        print_line(ctx, order);
    }
    Ok(())
}

/// Follow an order's status until it is out for delivery.
///
/// With `confirm` the delivery is confirmed once the courier is on the way.
///
/// # Errors
///
/// Returns an error if the tracker stops unexpectedly or the order cannot be
/// confirmed as delivered.
pub async fn track(
    ctx: &Context,
    order_id: &str,
    dwell: Option<Duration>,
    confirm: bool,
) -> CommandResult {
    let session = ctx.session();
    let mut placed = ctx.placed();
    let id = OrderId::new(order_id);
    let known = placed.get(&id).cloned();
    let mut order = order_service(ctx, &session).get(&id, known).await;

    let dwell = dwell.unwrap_or(ctx.config.status_dwell);
    info!(
        "Tracking order {} from {} (every {}s)",
        order.order_number,
        order.restaurant.name,
        dwell.as_secs_f32()
    );

    let tracker = OrderTracker::start(order.progress(), dwell);
    let mut updates = tracker.subscribe();
    let mut current = *updates.borrow_and_update();
    print_progress(&current);

    while !current.status.is_terminal() && current.status != AUTO_ADVANCE_LIMIT {
        updates.changed().await?;
        current = *updates.borrow_and_update();
        print_progress(&current);
    }

    if confirm && current.status == OrderStatus::OutForDelivery {
        current = tracker.confirm_delivery()?;
        print_progress(&current);
    }

    if placed.get(&order.id).is_some() {
        order.status = current.status;
        placed.record(order);
    }
    Ok(())
}

fn order_service<'a>(ctx: &'a Context, session: &'a Session<FileStore>) -> OrderService<'a> {
    OrderService::new(&ctx.api, ctx.config.fallback_policy, session.token())
        .with_pricing(ctx.config.fees, ctx.config.currency)
}

fn print_progress(progress: &OrderProgress) {
    info!(
        "[{:>3}%] {:<18} {} (ETA {} min)",
        progress.progress,
        progress.status.display_name(),
        progress.label(),
        progress.eta_minutes()
    );
}

fn print_line(ctx: &Context, order: &Order) {
    info!(
        "  {:<10} {:<16} {:<18} {:>12}  {}",
        order.order_number,
        order.restaurant.name,
        order.status.display_name(),
        Price::new(order.totals().total, order.currency.unwrap_or(ctx.config.currency)).to_string(),
        order.created_at.format("%Y-%m-%d %H:%M")
    );
}

fn print_order(ctx: &Context, order: &Order) {
    let currency = order.currency.unwrap_or(ctx.config.currency);
    for item in &order.items {
        info!("  {} x{}", item.name, item.quantity);
    }
    let totals = order.totals();
    info!("Subtotal      {:>12}", Price::new(totals.subtotal, currency).to_string());
    info!("Delivery fee  {:>12}", Price::new(totals.delivery_fee, currency).to_string());
    info!("Service fee   {:>12}", Price::new(totals.service_fee, currency).to_string());
    info!("Total         {:>12}", Price::new(totals.total, currency).to_string());
}
