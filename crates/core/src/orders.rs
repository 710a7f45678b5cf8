//! Orders
//!
//! The order-creation payload sent to the storefront backend, its response, and the seam the
//! checkout calls through.

use std::error::Error as StdError;

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::{checkout::forms::AddressForm, items::CartItem, pricing::OrderTotals};

/// How the customer pays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Card payment, details collected at checkout.
    Card,

    /// Pay the courier on delivery.
    #[default]
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
}

impl PaymentMethod {
    /// Label sent to the backend.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Card => "Card",
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
        }
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    /// Product name
    pub name: String,

    /// Quantity ordered
    pub qty: u32,

    /// Product image
    pub image: String,

    /// Unit price
    pub price: Decimal,

    /// Product identifier
    pub product: String,
}

impl From<&CartItem> for OrderLine {
    fn from(item: &CartItem) -> Self {
        OrderLine {
            name: item.name.clone(),
            qty: item.quantity,
            image: item.image.clone(),
            price: item.price,
            product: item.id.clone(),
        }
    }
}

/// Delivery address as the backend expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    /// Street address
    pub address: String,

    /// City
    pub city: String,

    /// Postal code
    pub postal_code: String,

    /// Country
    pub country: String,

    /// State
    pub state: String,

    /// Recipient first name
    pub first_name: String,

    /// Recipient last name
    pub last_name: String,

    /// Contact email
    pub email: String,

    /// Contact phone
    pub phone: String,
}

impl From<&AddressForm> for ShippingAddress {
    fn from(form: &AddressForm) -> Self {
        ShippingAddress {
            address: form.street.trim().to_string(),
            city: form.city.trim().to_string(),
            postal_code: form.zip.trim().to_string(),
            country: form.country.trim().to_string(),
            state: form.state.trim().to_string(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form.phone.trim().to_string(),
        }
    }
}

/// Order-creation request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Ordered lines
    pub order_items: Vec<OrderLine>,

    /// Delivery address
    pub shipping_address: ShippingAddress,

    /// Payment method label
    pub payment_method: PaymentMethod,

    /// Sum of line totals
    pub items_price: Decimal,

    /// Tax, always zero
    pub tax_price: Decimal,

    /// Shipping cost
    pub shipping_price: Decimal,

    /// Grand total
    pub total_price: Decimal,
}

impl NewOrder {
    /// Assemble an order from cart lines, the address form, payment method and totals.
    pub fn new(
        items: &[CartItem],
        address: &AddressForm,
        payment_method: PaymentMethod,
        totals: OrderTotals,
    ) -> Self {
        NewOrder {
            order_items: items.iter().map(OrderLine::from).collect(),
            shipping_address: ShippingAddress::from(address),
            payment_method,
            items_price: totals.subtotal,
            tax_price: Decimal::ZERO,
            shipping_price: totals.shipping,
            total_price: totals.total,
        }
    }
}

/// Successful order-creation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderCreated {
    /// Backend order identifier
    pub id: String,
}

impl OrderCreated {
    /// Read the order id from a response body.
    ///
    /// # Errors
    ///
    /// Returns [`OrdersApiError::MissingOrderId`] when the body carries no usable `_id` or `id`.
    pub fn from_body(body: &Value) -> Result<Self, OrdersApiError> {
        ["_id", "id"]
            .iter()
            .find_map(|field| body.get(*field).and_then(Value::as_str))
            .filter(|id| !id.trim().is_empty())
            .map(|id| OrderCreated { id: id.to_string() })
            .ok_or(OrdersApiError::MissingOrderId)
    }
}

/// Extract the human-readable `message` from an error body, if any.
pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

/// Errors returned by the order-creation call.
#[derive(Debug, Error)]
pub enum OrdersApiError {
    /// The backend requires a signed-in customer.
    #[error("not authorised to create orders")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("order rejected with status {status}")]
    Rejected {
        /// HTTP status code
        status: u16,

        /// Message from the response body
        message: Option<String>,
    },

    /// No response was received.
    #[error("order request failed")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// A success response without an order id.
    #[error("order response did not include an order id")]
    MissingOrderId,
}

/// Creates orders on the storefront backend.
#[automock]
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Create an order.
    async fn create_order(&self, order: NewOrder) -> Result<OrderCreated, OrdersApiError>;
}
