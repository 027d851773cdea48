//! User-visible notifications.
//!
//! Views never propagate failures to their caller; they report them through a
//! [`Notifier`] and keep their previously displayed state.

use std::sync::{Arc, Mutex, PoisonError};

/// Surface a blocking message to the user.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn alert(&self, message: &str) {
        (**self).alert(message);
    }
}

/// Notifier that keeps every alert, for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Alerts raised so far, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
