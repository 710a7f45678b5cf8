//! Pricing
//!
//! Subtotals, the shipping rule and order totals. Amounts are whole rupees held as [`Decimal`].

use rust_decimal::Decimal;
use rusty_money::{Money, iso};
use serde::Serialize;

use crate::items::CartItem;

/// Subtotal at or above which shipping is free.
pub const FREE_SHIPPING_THRESHOLD: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Flat shipping fee charged below the free threshold.
pub const FLAT_SHIPPING_FEE: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

/// Maps an order subtotal to its shipping cost.
pub trait ShippingRule: Send + Sync {
    /// Shipping cost for the given subtotal.
    fn shipping_for(&self, subtotal: Decimal) -> Decimal;
}

/// Free shipping from a threshold upwards, a flat fee below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdShipping {
    /// Subtotal from which shipping is free.
    pub free_from: Decimal,

    /// Fee charged below `free_from`.
    pub flat_fee: Decimal,
}

impl ThresholdShipping {
    /// Create a rule with the given threshold and fee.
    pub fn new(free_from: Decimal, flat_fee: Decimal) -> Self {
        Self {
            free_from,
            flat_fee,
        }
    }
}

impl Default for ThresholdShipping {
    fn default() -> Self {
        Self::new(FREE_SHIPPING_THRESHOLD, FLAT_SHIPPING_FEE)
    }
}

impl ShippingRule for ThresholdShipping {
    fn shipping_for(&self, subtotal: Decimal) -> Decimal {
        if subtotal <= Decimal::ZERO || subtotal >= self.free_from {
            Decimal::ZERO
        } else {
            self.flat_fee
        }
    }
}

/// Derived order totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    /// Sum of line totals
    pub subtotal: Decimal,

    /// Shipping cost
    pub shipping: Decimal,

    /// `subtotal + shipping`
    pub total: Decimal,
}

impl OrderTotals {
    /// Compute totals for the given items under a shipping rule.
    pub fn for_items(items: &[CartItem], rule: &dyn ShippingRule) -> Self {
        let subtotal = subtotal(items);
        let shipping = rule.shipping_for(subtotal);

        OrderTotals {
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }
}

/// Sum of `price * quantity` across items.
pub fn subtotal(items: &[CartItem]) -> Decimal {
    items.iter().map(CartItem::line_total).sum()
}

/// Format an amount as Indian rupees for display.
pub fn format_inr(amount: Decimal) -> String {
    Money::from_decimal(amount, iso::INR).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: i64, quantity: u32) -> CartItem {
        CartItem {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            image: String::new(),
            price: Decimal::from(price),
            old_price: None,
            quantity,
            tag: None,
        }
    }

    #[test]
    fn shipping_is_free_at_threshold() {
        let rule = ThresholdShipping::default();

        assert_eq!(rule.shipping_for(Decimal::from(1_000)), Decimal::ZERO);
        assert_eq!(rule.shipping_for(Decimal::from(2_000)), Decimal::ZERO);
    }

    #[test]
    fn shipping_is_flat_below_threshold() {
        let rule = ThresholdShipping::default();

        assert_eq!(rule.shipping_for(Decimal::from(999)), Decimal::from(99));
    }

    #[test]
    fn empty_order_ships_free() {
        let rule = ThresholdShipping::default();

        assert_eq!(rule.shipping_for(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn totals_add_shipping() {
        let rule = ThresholdShipping::new(Decimal::from(5_000), Decimal::from(250));
        let items = [item("a", 1_000, 2), item("b", 500, 1)];

        let totals = OrderTotals::for_items(&items, &rule);

        assert_eq!(totals.subtotal, Decimal::from(2_500));
        assert_eq!(totals.shipping, Decimal::from(250));
        assert_eq!(totals.total, Decimal::from(2_750));
    }

    #[test]
    fn subtotal_of_nothing_is_zero() {
        assert_eq!(subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn format_inr_is_not_empty() {
        assert!(!format_inr(Decimal::from(2_000)).is_empty());
    }
}
