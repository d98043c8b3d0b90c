//! Navigation seam between the page components and whatever hosts them.

/// Performs page navigation on behalf of the components.
///
/// The session gate and logout use this to send the user to the login
/// flow. Implementations must not block.
pub trait Navigator: Send + Sync {
    fn navigate(&self, location: &str);
}

/// Navigator for headless hosts: logs the redirect and does nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, location: &str) {
        tracing::warn!(location, "Navigation requested; log in to continue");
    }
}
