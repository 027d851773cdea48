//! Admin console commands.
//!
//! Every command opens an [`AdminConsole`], which refuses non-admin sessions.

use std::io::Write;

use minie_admin::AdminConsole;
use minie_core::{NewProduct, OrderId, OrderStatus, ProductId};
use minie_storefront::Notifier;
use minie_storefront::search::SearchRequest;

use super::{CommandError, Context, Result, ensure, interactive, require_session};
use crate::render;

fn console(ctx: &Context) -> Result<AdminConsole> {
    let shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    Ok(AdminConsole::new(
        ctx.client.clone(),
        session,
        std::sync::Arc::clone(&ctx.notifier),
        ctx.config.search_debounce,
    )?)
}

/// Look up users by name; without a query, search interactively from stdin.
pub async fn users(ctx: &Context, query: Option<&str>) -> Result<()> {
    let mut console = console(ctx)?;
    match query {
        Some(q) => {
            console.users.apply(&SearchRequest::from_input(q)).await;
            render::users(console.users.items())?;
        }
        None => interactive(&mut console.users, render::users).await,
    }
    Ok(())
}

pub async fn orders_list(ctx: &Context) -> Result<()> {
    let mut console = console(ctx)?;
    ensure(console.orders.reload().await, "Loading admin orders")?;
    render::admin_orders(console.orders.orders())?;
    Ok(())
}

/// Move an order to `status`.
///
/// Only statuses the order's picker would offer are accepted; picking the
/// current status changes nothing.
pub async fn set_status(ctx: &Context, id: &OrderId, status: OrderStatus) -> Result<()> {
    let mut console = console(ctx)?;
    ensure(console.orders.reload().await, "Loading admin orders")?;

    let order = console
        .orders
        .find(id)
        .cloned()
        .ok_or_else(|| CommandError::OrderNotFound(id.clone()))?;

    if !order.status.offers(status) {
        return Err(CommandError::StatusNotOffered {
            id: order.id,
            current: order.status,
            offered: render::status_list(order.status.offered_transitions()),
        });
    }

    if order.status == status {
        tracing::info!(order_id = %id, status = %status, "Order already has this status");
    } else {
        ensure(console.orders.select(&order, status).await, "Status update")?;
    }
    render::admin_orders(console.orders.orders())?;
    Ok(())
}

/// Load the whole admin dashboard and render it with the order list.
pub async fn stats(ctx: &Context) -> Result<()> {
    let mut console = console(ctx)?;
    console.load_all().await;
    render::dashboard(
        console.dashboard.stats(),
        console.dashboard.monthly_revenue(),
        console.dashboard.best_sellers(),
    )?;
    writeln!(std::io::stdout(), "\nOrders")?;
    render::admin_orders(console.orders.orders())?;
    Ok(())
}

pub async fn add_product(ctx: &Context, product: NewProduct) -> Result<()> {
    let console = console(ctx)?;
    let id: ProductId = product.product_id;
    match console.client().add_product(&product).await {
        Ok(()) => {
            ctx.notifier.alert("Product added");
            tracing::info!(product_id = %id, "Product added");
            Ok(())
        }
        Err(e) => {
            ctx.notifier.alert(&e.user_message("Failed to add product"));
            Err(CommandError::Failed("Adding product"))
        }
    }
}
