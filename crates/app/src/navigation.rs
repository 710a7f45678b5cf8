//! Terminal navigation

use std::sync::{Mutex, PoisonError};

use rootcraft::navigation::{Navigator, Route};
use tracing::info;

/// Navigator for terminal front-ends.
///
/// There is no page to move to, so the route is logged and kept for the caller to report.
#[derive(Debug, Default)]
pub struct TerminalNavigator {
    last: Mutex<Option<Route>>,
}

impl TerminalNavigator {
    /// Create a navigator with no recorded route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation, if any.
    pub fn last_route(&self) -> Option<Route> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, route: Route) {
        info!(path = %route, "navigating");

        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(route);
    }
}

#[cfg(test)]
mod tests {
    use rootcraft::navigation::CHECKOUT_PATH;

    use super::*;

    #[test]
    fn records_latest_route() {
        let navigator = TerminalNavigator::new();

        assert_eq!(navigator.last_route(), None);

        navigator.navigate(Route::Home);
        navigator.navigate(Route::SignIn {
            redirect: CHECKOUT_PATH.to_string(),
            message: "Please log in to place an order".to_string(),
        });

        assert_eq!(
            navigator.last_route().map(|route| route.path()),
            Some("/signin?redirect=/checkout".to_string())
        );
    }
}
