//! Rootcraft
//!
//! Client-side state core for the Rootcraft furniture storefront: cart and wishlist containers
//! with local-storage persistence, the checkout wizard and a toast dispatcher.

pub mod cart;
pub mod checkout;
pub mod items;
pub mod navigation;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod storage;
pub mod toasts;
pub mod wishlist;
