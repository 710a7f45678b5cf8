//! Checkout errors.

use thiserror::Error;

use crate::{checkout::CheckoutStep, orders::OrdersApiError};

/// Reasons a checkout transition did not happen.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The transition is not available from the current step.
    #[error("not available from the {0} step")]
    InvalidStep(CheckoutStep),

    /// Required fields are blank.
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// An order submission is already in flight.
    #[error("an order is already being placed")]
    AlreadySubmitting,

    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// The backend requires the customer to sign in.
    #[error("please log in to place an order")]
    Unauthorized,

    /// The backend rejected the order.
    #[error("{0}")]
    Rejected(String),

    /// The order could not be placed.
    #[error("failed to place order")]
    Failed(#[source] OrdersApiError),
}
