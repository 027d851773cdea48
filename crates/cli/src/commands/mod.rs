//! Command implementations.
//!
//! Views report failures through the terminal notifier; commands turn a
//! failed view action into [`CommandError::Failed`] so the process exits
//! non-zero.

pub mod admin;
pub mod session;
pub mod shop;

use std::sync::Arc;

use minie_core::{OrderId, OrderStatus};
use minie_storefront::search::{SearchSource, SearchView};
use minie_storefront::services::auth::{AuthError, FileTokenStore};
use minie_storefront::{ApiClient, ApiError, ClientConfig, Notifier, Session, Storefront};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::notify::TerminalNotifier;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Not logged in; run `minie login <name>` first")]
    NotLoggedIn,

    /// A view action failed; the user has already been alerted.
    #[error("{0} failed")]
    Failed(&'static str),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Order {id} is {current}; choose one of: {offered}")]
    StatusNotOffered {
        id: OrderId,
        current: OrderStatus,
        offered: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Admin(#[from] minie_admin::AdminError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;

/// Shared handles for one CLI invocation.
pub struct Context {
    pub config: ClientConfig,
    pub client: ApiClient,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = ApiClient::new(&config.api)?;
        Ok(Self {
            config,
            client,
            notifier: Arc::new(TerminalNotifier),
        })
    }

    /// A storefront resumed from the session file, if one is stored.
    ///
    /// # Errors
    ///
    /// Returns error if the session file cannot be read.
    pub fn storefront(&self) -> Result<Storefront> {
        let mut shop = Storefront::new(
            self.client.clone(),
            FileTokenStore::new(&self.config.session_file),
            Arc::clone(&self.notifier),
            self.config.search_debounce,
        );
        shop.restore()?;
        Ok(shop)
    }
}

/// The session of a restored storefront, or `NotLoggedIn`.
pub fn require_session(shop: &Storefront) -> Result<Session> {
    shop.session().cloned().ok_or(CommandError::NotLoggedIn)
}

/// Map a view's success flag onto a command result.
pub const fn ensure(ok: bool, action: &'static str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(CommandError::Failed(action))
    }
}

/// Feed stdin lines into a search view until EOF, rendering each result.
pub async fn interactive<S, F>(view: &mut SearchView<S>, mut render: F)
where
    S: SearchSource,
    F: FnMut(&[S::Item]) -> std::io::Result<()>,
{
    let (tx, rx) = mpsc::channel(32);

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read search input");
                    break;
                }
            }
        }
    });

    view.run(rx, |items| {
        if let Err(e) = render(items) {
            tracing::warn!(error = %e, "Failed to render search results");
        }
    })
    .await;

    if let Err(e) = reader.await {
        tracing::warn!(error = %e, "Search input reader stopped abnormally");
    }
}
