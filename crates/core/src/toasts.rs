//! Toasts
//!
//! Short-lived status messages raised by the containers and the checkout. A toast expires on its
//! own after [`TOAST_LIFETIME`]; a repeat of the most recent `(action, product)` pair inside
//! [`DEDUP_WINDOW`] is dropped.

use std::{
    fmt,
    sync::{Arc, Mutex, PoisonError, Weak},
    time::Duration,
};

use rand::{Rng, distributions::Alphanumeric};
use serde::Serialize;
use tokio::{runtime::Handle, sync::watch, time::Instant};
use tracing::debug;

/// How long a toast stays visible.
pub const TOAST_LIFETIME: Duration = Duration::from_millis(3_000);

/// Window in which a repeated dispatch is suppressed.
pub const DEDUP_WINDOW: Duration = Duration::from_millis(500);

const TOAST_ID_LEN: usize = 9;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    /// Positive confirmation
    Success,

    /// Something went wrong
    Error,

    /// Neutral information
    Info,
}

/// The user-facing action a toast reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastAction {
    /// Product added to the cart
    AddToCart,

    /// Product removed from the cart
    RemoveFromCart,

    /// Cart line quantity changed
    UpdateQuantity,

    /// Product added to the wishlist
    AddToWishlist,

    /// Product removed from the wishlist
    RemoveFromWishlist,

    /// Order created
    OrderPlaced,

    /// Order creation failed
    OrderFailed,

    /// Form validation failed
    Validation,

    /// Signed in
    Login,

    /// Signed out
    Logout,

    /// Account created
    Register,

    /// Profile saved
    ProfileUpdated,

    /// Sign-in needed to continue
    AuthRequired,

    /// Anything else
    General,
}

/// A visible toast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    /// Random token identifying the toast.
    pub id: String,

    /// Severity
    #[serde(rename = "type")]
    pub kind: ToastKind,

    /// Action being reported
    pub action: ToastAction,

    /// Message body
    pub message: String,

    /// Product the message refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
}

#[derive(Debug)]
struct LastDispatch {
    action: ToastAction,
    product_name: Option<String>,
    at: Instant,
}

#[derive(Debug)]
struct ToastsInner {
    visible: watch::Sender<Vec<Toast>>,
    last: Mutex<Option<LastDispatch>>,
}

/// Toast dispatcher.
///
/// Cloning yields another handle onto the same toast list.
#[derive(Clone)]
pub struct Toasts {
    inner: Arc<ToastsInner>,
}

impl Toasts {
    /// Create a dispatcher with no visible toasts.
    pub fn new() -> Self {
        let (visible, _) = watch::channel(Vec::new());

        Toasts {
            inner: Arc::new(ToastsInner {
                visible,
                last: Mutex::new(None),
            }),
        }
    }

    /// Show a toast.
    ///
    /// Returns the new toast id, or `None` when the dispatch repeats the previous one within
    /// [`DEDUP_WINDOW`].
    pub fn show(
        &self,
        kind: ToastKind,
        action: ToastAction,
        message: impl Into<String>,
        product_name: Option<&str>,
    ) -> Option<String> {
        let now = Instant::now();

        {
            let mut last = self
                .inner
                .last
                .lock()
                .unwrap_or_else(PoisonError::into_inner);

            if let Some(previous) = last.as_ref() {
                if previous.action == action
                    && previous.product_name.as_deref() == product_name
                    && now.duration_since(previous.at) < DEDUP_WINDOW
                {
                    debug!(?action, product_name, "suppressed repeated toast");

                    return None;
                }
            }

            *last = Some(LastDispatch {
                action,
                product_name: product_name.map(str::to_string),
                at: now,
            });
        }

        let toast = Toast {
            id: random_id(),
            kind,
            action,
            message: message.into(),
            product_name: product_name.map(str::to_string),
        };

        let id = toast.id.clone();

        self.inner.visible.send_modify(|toasts| toasts.push(toast));
        self.schedule_expiry(id.clone());

        Some(id)
    }

    /// Show a success toast.
    pub fn success(
        &self,
        action: ToastAction,
        message: impl Into<String>,
        product_name: Option<&str>,
    ) -> Option<String> {
        self.show(ToastKind::Success, action, message, product_name)
    }

    /// Show an error toast.
    pub fn error(
        &self,
        action: ToastAction,
        message: impl Into<String>,
        product_name: Option<&str>,
    ) -> Option<String> {
        self.show(ToastKind::Error, action, message, product_name)
    }

    /// Show an informational toast.
    pub fn info(
        &self,
        action: ToastAction,
        message: impl Into<String>,
        product_name: Option<&str>,
    ) -> Option<String> {
        self.show(ToastKind::Info, action, message, product_name)
    }

    /// Dismiss a toast before it expires.
    pub fn dismiss(&self, id: &str) {
        dismiss(&self.inner, id);
    }

    /// Currently visible toasts, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.visible.borrow().clone()
    }

    /// Observe changes to the visible toasts.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.visible.subscribe()
    }

    fn schedule_expiry(&self, id: String) {
        let Ok(handle) = Handle::try_current() else {
            debug!(id, "no runtime available; toast stays until dismissed");

            return;
        };

        let inner: Weak<ToastsInner> = Arc::downgrade(&self.inner);

        handle.spawn(async move {
            tokio::time::sleep(TOAST_LIFETIME).await;

            if let Some(inner) = inner.upgrade() {
                dismiss(&inner, &id);
            }
        });
    }
}

impl Default for Toasts {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Toasts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toasts")
            .field("visible", &*self.inner.visible.borrow())
            .finish()
    }
}

fn dismiss(inner: &ToastsInner, id: &str) {
    inner.visible.send_if_modified(|toasts| {
        let before = toasts.len();

        toasts.retain(|toast| toast.id != id);

        toasts.len() != before
    });
}

fn random_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOAST_ID_LEN)
        .map(|byte| char::from(byte).to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use testresult::TestResult;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn identical_toasts_within_window_show_once() {
        let toasts = Toasts::new();

        let first = toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));
        tokio::time::advance(Duration::from_millis(200)).await;
        let second = toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));

        assert!(first.is_some(), "first dispatch should be shown");
        assert!(second.is_none(), "repeat inside the window should be dropped");
        assert_eq!(toasts.toasts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn identical_toasts_outside_window_show_twice() {
        let toasts = Toasts::new();

        toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));
        tokio::time::advance(Duration::from_millis(600)).await;
        toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));

        assert_eq!(toasts.toasts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn different_products_are_not_deduplicated() {
        let toasts = Toasts::new();

        toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));
        toasts.success(ToastAction::AddToCart, "Added", Some("Teak Sofa"));

        assert_eq!(toasts.toasts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn dedup_only_compares_the_latest_dispatch() {
        let toasts = Toasts::new();

        toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));
        toasts.info(ToastAction::RemoveFromCart, "Removed", Some("Teak Sofa"));
        toasts.success(ToastAction::AddToCart, "Added", Some("Oak Chair"));

        assert_eq!(toasts.toasts().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_after_lifetime() {
        let toasts = Toasts::new();

        toasts.error(ToastAction::OrderFailed, "Failed", None);

        tokio::time::sleep(Duration::from_millis(2_900)).await;
        assert_eq!(toasts.toasts().len(), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(toasts.toasts().is_empty(), "toast should have expired");
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_removes_early() -> TestResult {
        let toasts = Toasts::new();

        let id = toasts
            .info(ToastAction::General, "Hello", None)
            .ok_or("toast was not shown")?;

        toasts.dismiss(&id);

        assert!(toasts.toasts().is_empty());

        Ok(())
    }

    #[test]
    fn show_without_runtime_keeps_toast() {
        let toasts = Toasts::new();

        toasts.info(ToastAction::General, "Hello", None);

        assert_eq!(toasts.toasts().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_new_toasts() -> TestResult {
        let toasts = Toasts::new();
        let mut rx = toasts.subscribe();

        toasts.success(ToastAction::Login, "Welcome back", None);

        rx.changed().await?;

        assert_eq!(rx.borrow().len(), 1);

        Ok(())
    }

    #[test]
    fn ids_are_nine_lowercase_characters() {
        let id = random_id();

        assert_eq!(id.len(), TOAST_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
