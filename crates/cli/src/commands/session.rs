//! Login, logout and identity.

use std::io::Write;

use super::{CommandError, Context, Result, ensure};
use crate::render;

/// Log in and show the loaded cart.
pub async fn login(ctx: &Context, name: &str) -> Result<()> {
    let mut shop = ctx.storefront()?;
    ensure(shop.login(name).await, "Login")?;

    if let Some(user) = shop.auth().user() {
        writeln!(std::io::stdout(), "Logged in as {} ({})", user.name, user.role)?;
    }
    render::cart(shop.cart.items(), shop.cart.subtotal())?;
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    let mut shop = ctx.storefront()?;
    shop.logout()?;
    writeln!(std::io::stdout(), "Logged out")?;
    Ok(())
}

/// Show who the stored session belongs to.
pub fn whoami(ctx: &Context) -> Result<()> {
    let shop = ctx.storefront()?;
    let session = shop.session().ok_or(CommandError::NotLoggedIn)?;
    let user = session.user();

    let mut out = std::io::stdout().lock();
    writeln!(out, "{} (id {}, {})", user.name, user.id, user.role)?;
    if let Some(at) = session.expires_at() {
        writeln!(out, "Session expires {}", at.format("%Y-%m-%d %H:%M UTC"))?;
    }
    Ok(())
}
