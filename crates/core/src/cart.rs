//! Cart
//!
//! The cart container: line items, drawer visibility, totals. Every change to the line items is
//! mirrored to [`CART_KEY`] in storage.

use std::{fmt, sync::Arc};

use mockall::automock;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    items::CartItem,
    pricing,
    storage::{CART_KEY, Storage, load_collection, persist_collection},
    toasts::{ToastAction, Toasts},
};

/// Suppresses background scrolling while the cart drawer is open.
#[automock]
pub trait ScrollLock: Send + Sync {
    /// Engage (`true`) or release (`false`) the lock.
    fn set_locked(&self, locked: bool);
}

/// Scroll lock for environments without a scrollable page.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoScrollLock;

impl ScrollLock for NoScrollLock {
    fn set_locked(&self, _locked: bool) {}
}

/// Observable cart state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartState {
    /// Line items, in insertion order.
    pub items: Vec<CartItem>,

    /// Whether the cart drawer is open.
    pub is_open: bool,
}

struct CartInner {
    state: watch::Sender<CartState>,
    storage: Arc<dyn Storage>,
    toasts: Toasts,
    scroll_lock: Arc<dyn ScrollLock>,
}

/// Cart container.
///
/// Cloning yields another handle onto the same cart.
#[derive(Clone)]
pub struct Cart {
    inner: Arc<CartInner>,
}

impl Cart {
    /// Create a cart restored from storage.
    pub fn new(storage: Arc<dyn Storage>, toasts: Toasts) -> Self {
        Self::with_scroll_lock(storage, toasts, Arc::new(NoScrollLock))
    }

    /// Create a cart restored from storage, driving the given scroll lock from the drawer.
    pub fn with_scroll_lock(
        storage: Arc<dyn Storage>,
        toasts: Toasts,
        scroll_lock: Arc<dyn ScrollLock>,
    ) -> Self {
        let items = repair_lines(load_collection::<CartItem>(storage.as_ref(), CART_KEY));
        let (state, _) = watch::channel(CartState {
            items,
            is_open: false,
        });

        Cart {
            inner: Arc::new(CartInner {
                state,
                storage,
                toasts,
                scroll_lock,
            }),
        }
    }

    /// Add an item, or bump its quantity by one when it is already in the cart.
    ///
    /// Opens the drawer either way.
    pub fn add_to_cart(&self, item: impl Into<CartItem>) {
        let item = item.into();
        let name = item.name.clone();
        let mut bumped = false;

        self.inner.state.send_modify(|state| {
            if let Some(existing) = state.items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(1);
                bumped = true;
            } else {
                state.items.push(CartItem { quantity: 1, ..item });
            }
        });

        self.persist();

        if bumped {
            debug!(product = %name, "bumped cart quantity");

            self.inner.toasts.success(
                ToastAction::UpdateQuantity,
                format!("{name} quantity updated in cart"),
                Some(&name),
            );
        } else {
            debug!(product = %name, "added item to cart");

            self.inner.toasts.success(
                ToastAction::AddToCart,
                format!("{name} added to cart"),
                Some(&name),
            );
        }

        self.open_cart();
    }

    /// Remove the line with the given id. Unknown ids are ignored.
    pub fn remove_from_cart(&self, id: &str) {
        let mut removed = None;

        self.inner.state.send_if_modified(|state| {
            let position = state.items.iter().position(|line| line.id == id);

            removed = position.map(|index| state.items.remove(index));
            removed.is_some()
        });

        let Some(item) = removed else {
            return;
        };

        self.persist();

        debug!(product = %item.name, "removed item from cart");

        self.inner.toasts.info(
            ToastAction::RemoveFromCart,
            format!("{} removed from cart", item.name),
            Some(&item.name),
        );
    }

    /// Set the quantity of a line. A quantity of zero or less removes it.
    pub fn update_quantity(&self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(id);

            return;
        }

        let Ok(quantity) = u32::try_from(quantity) else {
            return;
        };

        let changed = self.inner.state.send_if_modified(|state| {
            match state.items.iter_mut().find(|line| line.id == id) {
                Some(line) if line.quantity != quantity => {
                    line.quantity = quantity;
                    true
                }
                _ => false,
            }
        });

        if changed {
            debug!(id, quantity, "updated cart quantity");

            self.persist();
        }
    }

    /// Remove every line. No toast is raised.
    pub fn clear_cart(&self) {
        let cleared = self.inner.state.send_if_modified(|state| {
            let had_items = !state.items.is_empty();

            state.items.clear();
            had_items
        });

        if cleared {
            debug!("cleared cart");
        }

        self.persist();
    }

    /// Sum of `price * quantity` across all lines.
    pub fn total_price(&self) -> Decimal {
        pricing::subtotal(&self.inner.state.borrow().items)
    }

    /// Sum of quantities across all lines.
    pub fn total_items(&self) -> u64 {
        self.inner
            .state
            .borrow()
            .items
            .iter()
            .map(|line| u64::from(line.quantity))
            .sum()
    }

    /// Open the drawer.
    pub fn open_cart(&self) {
        self.set_open(true);
    }

    /// Close the drawer.
    pub fn close_cart(&self) {
        self.set_open(false);
    }

    /// Flip the drawer between open and closed.
    pub fn toggle_cart(&self) {
        let open = !self.is_open();

        self.set_open(open);
    }

    /// Whether the drawer is open.
    pub fn is_open(&self) -> bool {
        self.inner.state.borrow().is_open
    }

    /// Snapshot of the line items.
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.state.borrow().items.clone()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.inner.state.borrow().items.is_empty()
    }

    /// Snapshot of the whole cart state.
    pub fn state(&self) -> CartState {
        self.inner.state.borrow().clone()
    }

    /// Observe cart changes.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.state.subscribe()
    }

    fn set_open(&self, open: bool) {
        self.inner.state.send_if_modified(|state| {
            let changed = state.is_open != open;

            state.is_open = open;
            changed
        });

        self.inner.scroll_lock.set_locked(open);
    }

    fn persist(&self) {
        let state = self.inner.state.borrow();

        persist_collection(self.inner.storage.as_ref(), CART_KEY, &state.items);
    }
}

/// Drop empty lines and merge lines sharing an id, so restored carts hold one line per product.
fn repair_lines(stored: Vec<CartItem>) -> Vec<CartItem> {
    let mut lines: Vec<CartItem> = Vec::with_capacity(stored.len());

    for line in stored {
        if line.quantity == 0 {
            warn!(key = CART_KEY, id = %line.id, "dropping stored cart line without quantity");

            continue;
        }

        match lines.iter_mut().find(|existing| existing.id == line.id) {
            Some(existing) => {
                warn!(key = CART_KEY, id = %line.id, "merging duplicate stored cart line");

                existing.quantity = existing.quantity.saturating_add(line.quantity);
            }
            None => lines.push(line),
        }
    }

    lines
}

impl fmt::Debug for Cart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cart")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}
