//! Terminal alerts.

use minie_storefront::Notifier;

/// Shows alerts on stderr, keeping stdout for command output.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    #[allow(clippy::print_stderr)]
    fn alert(&self, message: &str) {
        tracing::debug!(alert = %message, "User alert");
        eprintln!("{message}");
    }
}
