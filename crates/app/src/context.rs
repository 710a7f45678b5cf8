//! App Context

use std::sync::Arc;

use rootcraft::{
    cart::Cart,
    checkout::Checkout,
    orders::OrdersApi,
    pricing::ShippingRule,
    storage::{Storage, StorageError},
    toasts::Toasts,
    wishlist::Wishlist,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    config::StorefrontConfig,
    navigation::TerminalNavigator,
    orders::{HttpOrdersClient, HttpOrdersConfig},
    storage::FileStorage,
};

/// Errors raised while building the application context.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The storage directory could not be created or opened.
    #[error("failed to open storage directory")]
    Storage(#[source] StorageError),
}

/// Shared storefront state handed to front-ends.
#[derive(Clone)]
pub struct AppContext {
    /// Toast dispatcher shared by every container
    pub toasts: Toasts,

    /// Cart container, restored from storage
    pub cart: Cart,

    /// Wishlist container, restored from storage
    pub wishlist: Wishlist,

    /// Order-creation backend
    pub orders: Arc<dyn OrdersApi>,

    /// Records where checkout asked to navigate
    pub navigator: Arc<TerminalNavigator>,

    /// Shipping rule applied to checkout totals
    pub shipping: Arc<dyn ShippingRule>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the storage directory cannot be opened.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, AppInitError> {
        let storage = FileStorage::open(&config.storage_dir).map_err(AppInitError::Storage)?;

        let orders = HttpOrdersClient::new(HttpOrdersConfig {
            url: config.orders_url(),
            token: config.api_token.clone(),
        });

        debug!(?orders, storage = %storage.dir().display(), "building storefront context");

        Ok(Self::new(
            Arc::new(storage),
            Arc::new(orders),
            Arc::new(config.shipping_rule()),
        ))
    }

    /// Build application context around the given collaborators.
    pub fn new(
        storage: Arc<dyn Storage>,
        orders: Arc<dyn OrdersApi>,
        shipping: Arc<dyn ShippingRule>,
    ) -> Self {
        let toasts = Toasts::new();

        Self {
            cart: Cart::new(Arc::clone(&storage), toasts.clone()),
            wishlist: Wishlist::new(storage, toasts.clone()),
            toasts,
            orders,
            navigator: Arc::new(TerminalNavigator::new()),
            shipping,
        }
    }

    /// Start a checkout over the current cart.
    pub fn checkout(&self) -> Checkout {
        Checkout::new(
            self.cart.clone(),
            self.toasts.clone(),
            Arc::clone(&self.orders),
            Arc::clone(&self.navigator) as Arc<dyn rootcraft::navigation::Navigator>,
            Arc::clone(&self.shipping),
        )
    }
}
