//! Navigation intents raised by the checkout.

use std::fmt;

use mockall::automock;

/// Path of the checkout page, used as the sign-in return target.
pub const CHECKOUT_PATH: &str = "/checkout";

/// A place the front-end should navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Storefront home page.
    Home,

    /// Sign-in page, returning to `redirect` afterwards.
    SignIn {
        /// Path to come back to once signed in.
        redirect: String,

        /// Message shown on the sign-in page.
        message: String,
    },
}

impl Route {
    /// Path component of the route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::SignIn { redirect, .. } => format!("/signin?redirect={redirect}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Carries out navigation intents.
#[automock]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`.
    fn navigate(&self, route: Route);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_path_carries_redirect() {
        let route = Route::SignIn {
            redirect: CHECKOUT_PATH.to_string(),
            message: "Please log in".to_string(),
        };

        assert_eq!(route.to_string(), "/signin?redirect=/checkout");
    }

    #[test]
    fn home_path_is_root() {
        assert_eq!(Route::Home.path(), "/");
    }
}
