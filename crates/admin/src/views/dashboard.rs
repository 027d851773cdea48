//! Sales dashboard.

use std::sync::Arc;

use minie_core::{BestSeller, Price, Stats};
use minie_storefront::Notifier;

use crate::client::AdminClient;

/// Store-wide statistics, this month's revenue and the best sellers.
pub struct DashboardView {
    client: AdminClient,
    stats: Option<Stats>,
    monthly_revenue: Price,
    best_sellers: Vec<BestSeller>,
    notifier: Arc<dyn Notifier>,
}

impl DashboardView {
    #[must_use]
    pub fn new(client: AdminClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            stats: None,
            monthly_revenue: Price::ZERO,
            best_sellers: Vec::new(),
            notifier,
        }
    }

    #[must_use]
    pub const fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    /// Revenue since the first of the month; zero until loaded.
    #[must_use]
    pub const fn monthly_revenue(&self) -> Price {
        self.monthly_revenue
    }

    #[must_use]
    pub fn best_sellers(&self) -> &[BestSeller] {
        &self.best_sellers
    }

    /// Fetch every panel. Each panel fails on its own.
    pub async fn load(&mut self) {
        self.load_stats().await;
        self.load_best_sellers().await;
    }

    /// Fetch totals and monthly revenue.
    pub async fn load_stats(&mut self) -> bool {
        let (stats, monthly) = tokio::join!(self.client.stats(), self.client.monthly_stats());

        self.monthly_revenue = match monthly {
            Ok(monthly) => monthly.monthly_revenue,
            Err(e) => {
                tracing::warn!(error = %e, "Monthly stats unavailable");
                Price::ZERO
            }
        };

        match stats {
            Ok(stats) => {
                self.stats = Some(stats);
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load stats");
                self.notifier.alert("Failed to load stats");
                false
            }
        }
    }

    pub async fn load_best_sellers(&mut self) -> bool {
        match self.client.best_sellers().await {
            Ok(products) => {
                self.best_sellers = products;
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load best sellers");
                self.notifier.alert("Failed to load best sellers");
                false
            }
        }
    }
}
