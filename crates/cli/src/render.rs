//! Plain-text rendering of listings to stdout.

use std::io::{self, Write};

use minie_core::{BestSeller, LineItem, Order, OrderStatus, Price, Product, Stats, User};

pub fn products(items: &[Product]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if items.is_empty() {
        return writeln!(out, "No products found");
    }
    for product in items {
        let stock = if product.is_in_stock() {
            format!("{} in stock", product.quantity)
        } else {
            "out of stock".to_string()
        };
        writeln!(
            out,
            "{:>5}  {:<32} {:>10}  {stock}",
            product.id, product.name, product.price
        )?;
    }
    Ok(())
}

pub fn cart(items: &[LineItem], subtotal: Price) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if items.is_empty() {
        return writeln!(out, "Cart is empty");
    }
    for item in items {
        writeln!(
            out,
            "{:>5}  {:<32} {:>3} x {:>8} = {}",
            item.product_id,
            item.name,
            item.quantity,
            item.price,
            item.line_total()
        )?;
    }
    writeln!(out, "Subtotal: {subtotal}")
}

pub fn orders(orders: &[Order]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if orders.is_empty() {
        return writeln!(out, "No orders");
    }
    for order in orders {
        let placed = order
            .created_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        writeln!(
            out,
            "{:<26} {:<10} {:>10}  {:>3} items  {placed}",
            order.id,
            order.status,
            order.total,
            order.items.len()
        )?;
    }
    Ok(())
}

pub fn order(order: &Order) -> io::Result<()> {
    {
        let mut out = io::stdout().lock();
        writeln!(out, "Order {} ({})", order.id, order.status)?;
        writeln!(out, "Total: {}", order.total)?;
    }
    cart(&order.items, order.total)
}

/// Admin order list with the statuses each order can move to.
pub fn admin_orders(orders: &[Order]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if orders.is_empty() {
        return writeln!(out, "No orders");
    }
    for order in orders {
        let options: Vec<&str> = order
            .status
            .offered_transitions()
            .iter()
            .map(|status| status.as_str())
            .collect();
        writeln!(
            out,
            "{:<26} user {:<5} {:>10}  {:<10} [{}]",
            order.id,
            order.user_id,
            order.total,
            order.status,
            options.join("|")
        )?;
    }
    Ok(())
}

pub fn users(users: &[User]) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if users.is_empty() {
        return writeln!(out, "No users");
    }
    for user in users {
        writeln!(out, "{:>5}  {:<24} {}", user.id, user.name, user.role)?;
    }
    Ok(())
}

pub fn dashboard(
    stats: Option<&Stats>,
    monthly_revenue: Price,
    best_sellers: &[BestSeller],
) -> io::Result<()> {
    let mut out = io::stdout().lock();
    if let Some(stats) = stats {
        writeln!(out, "Total orders:     {}", stats.total_orders)?;
        writeln!(out, "Total revenue:    {}", stats.total_revenue)?;
        writeln!(out, "Pending orders:   {}", stats.pending_orders)?;
        writeln!(out, "Delivered orders: {}", stats.delivered_orders)?;
    }
    writeln!(out, "Monthly revenue:  {monthly_revenue}")?;

    if !best_sellers.is_empty() {
        writeln!(out, "\nBest sellers")?;
        for (rank, product) in best_sellers.iter().enumerate() {
            writeln!(
                out,
                "{:>2}. {:<32} {:>5} sold  {}",
                rank + 1,
                product.name,
                product.total_sold,
                product.revenue
            )?;
        }
    }
    Ok(())
}

/// Statuses listed for an error message.
pub fn status_list(statuses: &[OrderStatus]) -> String {
    statuses
        .iter()
        .map(|status| status.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
