//! Catalog, cart, checkout and order history.

use minie_core::{OrderId, ProductId};
use minie_storefront::search::SearchRequest;

use super::{CommandError, Context, Result, ensure, interactive, require_session};
use crate::render;

/// List the catalog, optionally filtered.
pub async fn products(ctx: &Context, search: Option<&str>) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let request = SearchRequest::from_input(search.unwrap_or_default());
    shop.catalog.apply(&request).await;
    render::products(shop.catalog.items())?;
    Ok(())
}

/// Debounced catalog search driven by stdin lines.
pub async fn search(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    shop.catalog.load().await;
    render::products(shop.catalog.items())?;
    interactive(&mut shop.catalog, render::products).await;
    Ok(())
}

pub async fn cart_show(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    ensure(shop.cart.load(&session).await, "Loading cart")?;
    render::cart(shop.cart.items(), shop.cart.subtotal())?;
    Ok(())
}

/// Add one unit; products the catalog lists as out of stock are refused.
pub async fn cart_add(ctx: &Context, product_id: ProductId) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let session = require_session(&shop)?;

    shop.catalog.load().await;
    let listed = shop
        .catalog
        .items()
        .iter()
        .find(|product| product.id == product_id)
        .cloned();

    let added = match listed {
        Some(product) => shop.cart.add_product(Some(&session), &product).await,
        None => shop.add_to_cart(product_id).await,
    };
    ensure(added, "Adding to cart")?;
    render::cart(shop.cart.items(), shop.cart.subtotal())?;
    Ok(())
}

pub async fn cart_remove(ctx: &Context, product_id: ProductId) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    ensure(shop.cart.remove(&session, product_id).await, "Removing from cart")?;
    render::cart(shop.cart.items(), shop.cart.subtotal())?;
    Ok(())
}

pub async fn checkout(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    if shop.session().is_none() {
        return Err(CommandError::NotLoggedIn);
    }
    ensure(shop.checkout().await, "Checkout")?;
    render::orders(shop.orders.orders())?;
    Ok(())
}

pub async fn orders_list(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    ensure(shop.orders.load(&session).await, "Loading orders")?;
    render::orders(shop.orders.orders())?;
    Ok(())
}

pub async fn orders_show(ctx: &Context, id: &OrderId) -> Result<()> {
    let shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    let order = shop
        .orders
        .details(&session, id)
        .await
        .ok_or_else(|| CommandError::OrderNotFound(id.clone()))?;
    render::order(&order)?;
    Ok(())
}

pub async fn orders_cancel(ctx: &Context, id: &OrderId) -> Result<()> {
    let mut shop = ctx.storefront()?;
    let session = require_session(&shop)?;
    ensure(shop.orders.cancel(&session, id).await, "Cancelling order")?;
    render::orders(shop.orders.orders())?;
    Ok(())
}
