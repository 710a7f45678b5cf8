//! Wishlist
//!
//! Set of liked products, mirrored to [`WISHLIST_KEY`] in storage.

use std::{collections::HashSet, fmt, sync::Arc};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::{
    items::WishlistItem,
    storage::{Storage, WISHLIST_KEY, load_collection, persist_collection},
    toasts::{ToastAction, Toasts},
};

struct WishlistInner {
    items: watch::Sender<Vec<WishlistItem>>,
    storage: Arc<dyn Storage>,
    toasts: Toasts,
}

/// Wishlist container.
///
/// Cloning yields another handle onto the same wishlist.
#[derive(Clone)]
pub struct Wishlist {
    inner: Arc<WishlistInner>,
}

impl Wishlist {
    /// Create a wishlist restored from storage.
    pub fn new(storage: Arc<dyn Storage>, toasts: Toasts) -> Self {
        let mut items = load_collection::<WishlistItem>(storage.as_ref(), WISHLIST_KEY);
        let mut seen = HashSet::new();

        items.retain(|item| {
            let first = seen.insert(item.id.clone());

            if !first {
                warn!(key = WISHLIST_KEY, id = %item.id, "dropping duplicate stored wishlist item");
            }

            first
        });

        let (items, _) = watch::channel(items);

        Wishlist {
            inner: Arc::new(WishlistInner {
                items,
                storage,
                toasts,
            }),
        }
    }

    /// Add an item. Adding an item that is already present does nothing.
    pub fn add_to_wishlist(&self, item: impl Into<WishlistItem>) {
        let item = item.into();
        let name = item.name.clone();

        let added = self.inner.items.send_if_modified(|items| {
            if items.iter().any(|existing| existing.id == item.id) {
                return false;
            }

            items.push(item);
            true
        });

        if !added {
            return;
        }

        self.persist();

        debug!(product = %name, "added item to wishlist");

        self.inner.toasts.success(
            ToastAction::AddToWishlist,
            format!("{name} added to wishlist"),
            Some(&name),
        );
    }

    /// Remove the item with the given id. Unknown ids are ignored.
    pub fn remove_from_wishlist(&self, id: &str) {
        let mut removed = None;

        self.inner.items.send_if_modified(|items| {
            let position = items.iter().position(|item| item.id == id);

            removed = position.map(|index| items.remove(index));
            removed.is_some()
        });

        let Some(item) = removed else {
            return;
        };

        self.persist();

        debug!(product = %item.name, "removed item from wishlist");

        self.inner.toasts.info(
            ToastAction::RemoveFromWishlist,
            format!("{} removed from wishlist", item.name),
            Some(&item.name),
        );
    }

    /// Whether an item with the given id is in the wishlist.
    pub fn is_in_wishlist(&self, id: &str) -> bool {
        self.inner.items.borrow().iter().any(|item| item.id == id)
    }

    /// Remove the item when present, add it otherwise.
    pub fn toggle_wishlist(&self, item: impl Into<WishlistItem>) {
        let item = item.into();

        if self.is_in_wishlist(&item.id) {
            self.remove_from_wishlist(&item.id);
        } else {
            self.add_to_wishlist(item);
        }
    }

    /// Number of items in the wishlist.
    pub fn wishlist_count(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Remove every item. No toast is raised.
    pub fn clear_wishlist(&self) {
        self.inner.items.send_if_modified(|items| {
            let had_items = !items.is_empty();

            items.clear();
            had_items
        });

        self.persist();
    }

    /// Snapshot of the wishlist.
    pub fn items(&self) -> Vec<WishlistItem> {
        self.inner.items.borrow().clone()
    }

    /// Observe wishlist changes.
    pub fn subscribe(&self) -> watch::Receiver<Vec<WishlistItem>> {
        self.inner.items.subscribe()
    }

    fn persist(&self) {
        let items = self.inner.items.borrow();

        persist_collection(self.inner.storage.as_ref(), WISHLIST_KEY, &items);
    }
}

impl fmt::Debug for Wishlist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wishlist")
            .field("items", &*self.inner.items.borrow())
            .finish_non_exhaustive()
    }
}
