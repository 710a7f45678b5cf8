//! Items
//!
//! Line items held by the cart and wishlist containers, and the catalog product snapshot they
//! are built from.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Merchandising tag shown on a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ProductTag {
    /// New arrival, e.g. `"New"`.
    New(String),

    /// Discount badge, e.g. `"-20%"`.
    Discount(String),
}

/// Product
///
/// Snapshot of a catalog product as the storefront displays it.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product identifier
    pub id: String,

    /// Product name
    pub name: String,

    /// Short description
    pub description: String,

    /// Image URL
    pub image: String,

    /// Current price in whole rupees
    pub price: Decimal,

    /// Price before discount
    pub old_price: Option<Decimal>,

    /// Merchandising tag
    pub tag: Option<ProductTag>,
}

/// Cart line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Product identifier, unique within the cart.
    pub id: String,

    /// Display name
    pub name: String,

    /// Display description
    #[serde(default)]
    pub description: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Unit price
    pub price: Decimal,

    /// Unit price before discount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,

    /// Quantity, always at least one.
    pub quantity: u32,

    /// Merchandising tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ProductTag>,
}

impl CartItem {
    /// Build a single-quantity line item from a product.
    pub fn from_product(product: Product) -> Self {
        CartItem {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
            old_price: product.old_price,
            quantity: 1,
            tag: product.tag,
        }
    }

    /// Line total, `price * quantity`.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

impl From<Product> for CartItem {
    fn from(product: Product) -> Self {
        CartItem::from_product(product)
    }
}

/// Wishlist entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    /// Product identifier, unique within the wishlist.
    pub id: String,

    /// Display name
    pub name: String,

    /// Display description
    #[serde(default)]
    pub description: String,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Unit price
    pub price: Decimal,

    /// Unit price before discount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_price: Option<Decimal>,

    /// Merchandising tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<ProductTag>,
}

impl From<Product> for WishlistItem {
    fn from(product: Product) -> Self {
        WishlistItem {
            id: product.id,
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
            old_price: product.old_price,
            tag: product.tag,
        }
    }
}

impl From<WishlistItem> for Product {
    fn from(item: WishlistItem) -> Self {
        Product {
            id: item.id,
            name: item.name,
            description: item.description,
            image: item.image,
            price: item.price,
            old_price: item.old_price,
            tag: item.tag,
        }
    }
}
