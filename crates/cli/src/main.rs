//! Minie CLI - storefront and admin console for the Minie shop.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the token is kept in MINIE_SESSION_FILE)
//! minie login asha
//!
//! # Browse and search the catalog
//! minie products --search shoe
//! minie search            # one query per pause in typing, read from stdin
//!
//! # Cart and checkout
//! minie cart add 3
//! minie checkout
//!
//! # Admin console
//! minie admin orders set-status 65f0c0ffee shipped
//! minie admin stats
//! ```
//!
//! # Environment Variables
//!
//! - `MINIE_API_URL` - Backend base URL
//! - `MINIE_SEARCH_DEBOUNCE_MS` - Search quiescence window
//! - `MINIE_HTTP_TIMEOUT_SECS` - Per-request timeout
//! - `MINIE_SESSION_FILE` - Token file
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use minie_core::{NewProduct, OrderId, OrderStatus, ProductId};
use minie_storefront::ClientConfig;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod notify;
mod render;

use commands::{Context, admin, session, shop};

#[derive(Parser)]
#[command(name = "minie")]
#[command(author, version, about = "Minie storefront and admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in by user name
    Login {
        name: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// List products
    Products {
        /// Filter by name
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Search the catalog interactively; each stdin line replaces the query
    Search,
    /// View and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart contents
    Checkout,
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin console (admin role required)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add { product_id: ProductId },
    /// Remove a product
    Remove { product_id: ProductId },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List your orders
    List,
    /// Show one order
    Show { id: String },
    /// Cancel a pending order
    Cancel { id: String },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Search users by name (interactive when no query is given)
    Users { query: Option<String> },
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: AdminOrdersAction,
    },
    /// Dashboard: sales statistics, best sellers and the order list
    Stats,
    /// Add a product to the catalog
    AddProduct {
        #[arg(long)]
        id: ProductId,

        #[arg(short, long)]
        name: String,

        /// Price in whole rupees
        #[arg(short, long)]
        price: i64,

        /// Units in stock
        #[arg(short, long, default_value_t = 0)]
        qty: i32,

        /// Image URL
        #[arg(short, long, default_value = "")]
        image: String,
    },
}

#[derive(Subcommand)]
enum AdminOrdersAction {
    /// List every order with the statuses it can move to
    List,
    /// Change an order's status (`pending`, `shipped`, `delivered`, `cancelled`)
    SetStatus { id: String, status: OrderStatus },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Errors and warnings become Sentry events; info and debug become breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let _sentry_guard = init_sentry(&config);

    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "minie=info,minie_storefront=info,minie_admin=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Login { name } => session::login(&ctx, &name).await?,
        Commands::Logout => session::logout(&ctx)?,
        Commands::Whoami => session::whoami(&ctx)?,
        Commands::Products { search } => shop::products(&ctx, search.as_deref()).await?,
        Commands::Search => shop::search(&ctx).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => shop::cart_show(&ctx).await?,
            CartAction::Add { product_id } => shop::cart_add(&ctx, product_id).await?,
            CartAction::Remove { product_id } => shop::cart_remove(&ctx, product_id).await?,
        },
        Commands::Checkout => shop::checkout(&ctx).await?,
        Commands::Orders { action } => match action {
            OrdersAction::List => shop::orders_list(&ctx).await?,
            OrdersAction::Show { id } => shop::orders_show(&ctx, &OrderId::new(id)).await?,
            OrdersAction::Cancel { id } => shop::orders_cancel(&ctx, &OrderId::new(id)).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Users { query } => admin::users(&ctx, query.as_deref()).await?,
            AdminAction::Orders { action } => match action {
                AdminOrdersAction::List => admin::orders_list(&ctx).await?,
                AdminOrdersAction::SetStatus { id, status } => {
                    admin::set_status(&ctx, &OrderId::new(id), status).await?;
                }
            },
            AdminAction::Stats => admin::stats(&ctx).await?,
            AdminAction::AddProduct {
                id,
                name,
                price,
                qty,
                image,
            } => {
                let product = NewProduct {
                    product_id: id,
                    name,
                    price,
                    qty,
                    image,
                };
                admin::add_product(&ctx, product).await?;
            }
        },
    }
    Ok(())
}
