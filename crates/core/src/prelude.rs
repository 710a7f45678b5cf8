//! Rootcraft prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartState, NoScrollLock, ScrollLock},
    checkout::{
        CART_CLEAR_DELAY, Checkout, CheckoutError, CheckoutState, CheckoutStep, Confirmation,
        REDIRECT_DELAY,
        forms::{AddressForm, PaymentForm},
    },
    items::{CartItem, Product, ProductTag, WishlistItem},
    navigation::{Navigator, Route},
    orders::{NewOrder, OrderCreated, OrdersApi, OrdersApiError, PaymentMethod},
    pricing::{OrderTotals, ShippingRule, ThresholdShipping, format_inr},
    storage::{CART_KEY, MemoryStorage, Storage, StorageError, WISHLIST_KEY},
    toasts::{Toast, ToastAction, ToastKind, Toasts},
    wishlist::Wishlist,
};
