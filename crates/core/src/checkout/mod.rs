//! Checkout
//!
//! Three-step wizard: `address -> payment -> confirmation`. Payment may step back to address;
//! confirmation is terminal. Placing an order clears the cart after [`CART_CLEAR_DELAY`] and
//! sends the customer home after [`REDIRECT_DELAY`].

use std::{
    fmt,
    future::Future,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use jiff::Timestamp;
use tokio::{runtime::Handle, sync::watch, task::AbortHandle};
use tracing::{debug, error, info, warn};

use crate::{
    cart::Cart,
    items::CartItem,
    navigation::{CHECKOUT_PATH, Navigator, Route},
    orders::{NewOrder, OrderCreated, OrdersApi, OrdersApiError, PaymentMethod},
    pricing::{OrderTotals, ShippingRule},
    toasts::{ToastAction, Toasts},
};

pub mod errors;
pub mod forms;

pub use errors::CheckoutError;

use forms::{AddressForm, PaymentForm};

/// Delay between a successful order and clearing the cart.
pub const CART_CLEAR_DELAY: Duration = Duration::from_secs(1);

/// Delay between a successful order and navigating home.
pub const REDIRECT_DELAY: Duration = Duration::from_secs(3);

const ORDER_FAILED_MESSAGE: &str = "Failed to place order. Please try again.";
const SIGN_IN_MESSAGE: &str = "Please log in to place an order";
const ORDER_PLACED_MESSAGE: &str = "Order placed successfully!";
const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Checkout wizard step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CheckoutStep {
    /// Delivery address entry
    #[default]
    Address,

    /// Payment method entry
    Payment,

    /// Order placed
    Confirmation,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckoutStep::Address => "address",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        })
    }
}

/// What was ordered, captured when the order succeeds.
///
/// The cart is cleared shortly after, so the confirmation view renders from this snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// Backend order identifier
    pub order_id: String,

    /// When the order was accepted
    pub placed_at: Timestamp,

    /// Ordered lines
    pub items: Vec<CartItem>,

    /// Totals charged
    pub totals: OrderTotals,

    /// Payment method used
    pub payment_method: PaymentMethod,

    /// Delivery address
    pub address: AddressForm,
}

/// Observable checkout state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutState {
    /// Current step
    pub step: CheckoutStep,

    /// Address form contents
    pub address: AddressForm,

    /// Payment form contents
    pub payment: PaymentForm,

    /// Whether an order submission is in flight
    pub submitting: bool,

    /// Order id, set once the order succeeds
    pub order_id: Option<String>,

    /// Confirmation snapshot, set once the order succeeds
    pub confirmation: Option<Confirmation>,
}

struct CheckoutInner {
    state: watch::Sender<CheckoutState>,
    submitting: AtomicBool,
    cart: Cart,
    toasts: Toasts,
    orders: Arc<dyn OrdersApi>,
    navigator: Arc<dyn Navigator>,
    shipping: Arc<dyn ShippingRule>,
    timers: Mutex<Vec<AbortHandle>>,
}

impl CheckoutInner {
    fn cancel_timers(&self) {
        let mut timers = self.timers.lock().unwrap_or_else(PoisonError::into_inner);

        for timer in timers.drain(..) {
            timer.abort();
        }
    }
}

impl Drop for CheckoutInner {
    fn drop(&mut self) {
        self.cancel_timers();
    }
}

/// Checkout wizard.
///
/// Cloning yields another handle onto the same checkout. Pending timers are cancelled by
/// [`Checkout::teardown`] or when the last handle is dropped.
#[derive(Clone)]
pub struct Checkout {
    inner: Arc<CheckoutInner>,
}

impl Checkout {
    /// Start a checkout at the address step.
    pub fn new(
        cart: Cart,
        toasts: Toasts,
        orders: Arc<dyn OrdersApi>,
        navigator: Arc<dyn Navigator>,
        shipping: Arc<dyn ShippingRule>,
    ) -> Self {
        let (state, _) = watch::channel(CheckoutState::default());

        Checkout {
            inner: Arc::new(CheckoutInner {
                state,
                submitting: AtomicBool::new(false),
                cart,
                toasts,
                orders,
                navigator,
                shipping,
                timers: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Snapshot of the checkout state.
    pub fn state(&self) -> CheckoutState {
        self.inner.state.borrow().clone()
    }

    /// Current step.
    pub fn step(&self) -> CheckoutStep {
        self.inner.state.borrow().step
    }

    /// Order id, once the order has been placed.
    pub fn order_id(&self) -> Option<String> {
        self.inner.state.borrow().order_id.clone()
    }

    /// Observe checkout changes.
    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.inner.state.subscribe()
    }

    /// Totals for the current cart contents.
    pub fn totals(&self) -> OrderTotals {
        OrderTotals::for_items(&self.inner.cart.items(), self.inner.shipping.as_ref())
    }

    /// Replace the address form.
    pub fn set_address(&self, address: AddressForm) {
        self.inner.state.send_modify(|state| state.address = address);
    }

    /// Edit the address form in place.
    pub fn update_address(&self, edit: impl FnOnce(&mut AddressForm)) {
        self.inner.state.send_modify(|state| edit(&mut state.address));
    }

    /// Replace the payment form.
    pub fn set_payment(&self, payment: PaymentForm) {
        self.inner.state.send_modify(|state| state.payment = payment);
    }

    /// Choose the payment method, keeping any card details entered.
    pub fn set_payment_method(&self, method: PaymentMethod) {
        self.inner
            .state
            .send_modify(|state| state.payment.method = method);
    }

    /// Move from the address step to the payment step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`]: not on the address step.
    /// - [`CheckoutError::MissingFields`]: a required address field is blank.
    pub fn continue_to_payment(&self) -> Result<(), CheckoutError> {
        let mut outcome = Ok(());

        self.inner.state.send_if_modified(|state| {
            if state.step != CheckoutStep::Address {
                outcome = Err(CheckoutError::InvalidStep(state.step));

                return false;
            }

            let missing = state.address.missing_fields();

            if !missing.is_empty() {
                outcome = Err(CheckoutError::MissingFields(missing));

                return false;
            }

            state.step = CheckoutStep::Payment;

            true
        });

        match &outcome {
            Ok(()) => debug!("checkout moved to payment"),
            Err(CheckoutError::MissingFields(missing)) => self.report_missing(missing),
            Err(_) => {}
        }

        outcome
    }

    /// Go back from the payment step to the address step.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::AlreadySubmitting`]: an order submission is in flight.
    /// - [`CheckoutError::InvalidStep`]: not on the payment step.
    pub fn back_to_address(&self) -> Result<(), CheckoutError> {
        if self.inner.submitting.load(Ordering::Acquire) {
            return Err(CheckoutError::AlreadySubmitting);
        }

        let mut outcome = Ok(());

        self.inner.state.send_if_modified(|state| {
            if state.step != CheckoutStep::Payment {
                outcome = Err(CheckoutError::InvalidStep(state.step));

                return false;
            }

            state.step = CheckoutStep::Address;

            true
        });

        outcome
    }

    /// Place the order for the current cart.
    ///
    /// On success the checkout moves to the confirmation step, the cart is cleared after
    /// [`CART_CLEAR_DELAY`] and the customer is sent home after [`REDIRECT_DELAY`].
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::InvalidStep`]: not on the payment step.
    /// - [`CheckoutError::AlreadySubmitting`]: another submission is in flight.
    /// - [`CheckoutError::MissingFields`]: card details or address fields are blank.
    /// - [`CheckoutError::EmptyCart`]: there is nothing to order.
    /// - [`CheckoutError::Unauthorized`]: the backend requires sign-in.
    /// - [`CheckoutError::Rejected`]: the backend refused the order.
    /// - [`CheckoutError::Failed`]: no usable response was received.
    pub async fn place_order(&self) -> Result<Confirmation, CheckoutError> {
        let step = self.step();

        if step != CheckoutStep::Payment {
            return Err(CheckoutError::InvalidStep(step));
        }

        let Some(_guard) = SubmittingGuard::acquire(&self.inner) else {
            debug!("ignored duplicate order submission");

            return Err(CheckoutError::AlreadySubmitting);
        };

        self.submit().await
    }

    /// Cancel the pending cart clear and redirect, if any.
    pub fn teardown(&self) {
        self.inner.cancel_timers();
    }

    async fn submit(&self) -> Result<Confirmation, CheckoutError> {
        let CheckoutState {
            address, payment, ..
        } = self.state();

        let mut missing = address.missing_fields();
        missing.extend(payment.missing_fields());

        if !missing.is_empty() {
            self.report_missing(&missing);

            return Err(CheckoutError::MissingFields(missing));
        }

        let items = self.inner.cart.items();

        if items.is_empty() {
            self.inner
                .toasts
                .error(ToastAction::Validation, EMPTY_CART_MESSAGE, None);

            return Err(CheckoutError::EmptyCart);
        }

        let totals = OrderTotals::for_items(&items, self.inner.shipping.as_ref());
        let order = NewOrder::new(&items, &address, payment.method, totals);

        debug!(
            lines = items.len(),
            total = %totals.total,
            payment = payment.method.label(),
            "creating order"
        );

        match self.inner.orders.create_order(order).await {
            Ok(created) => Ok(self.confirm(created, items, totals, payment.method, address)),
            Err(error) => Err(self.fail(error)),
        }
    }

    fn confirm(
        &self,
        created: OrderCreated,
        items: Vec<CartItem>,
        totals: OrderTotals,
        payment_method: PaymentMethod,
        address: AddressForm,
    ) -> Confirmation {
        let confirmation = Confirmation {
            order_id: created.id,
            placed_at: Timestamp::now(),
            items,
            totals,
            payment_method,
            address,
        };

        self.inner.state.send_modify(|state| {
            state.step = CheckoutStep::Confirmation;
            state.order_id = Some(confirmation.order_id.clone());
            state.confirmation = Some(confirmation.clone());
        });

        info!(
            order_id = %confirmation.order_id,
            total = %confirmation.totals.total,
            "order placed"
        );

        self.inner
            .toasts
            .success(ToastAction::OrderPlaced, ORDER_PLACED_MESSAGE, None);

        let cart = self.inner.cart.clone();
        self.schedule(CART_CLEAR_DELAY, async move { cart.clear_cart() });

        let navigator = self.inner.navigator.clone();
        self.schedule(REDIRECT_DELAY, async move { navigator.navigate(Route::Home) });

        confirmation
    }

    fn fail(&self, error: OrdersApiError) -> CheckoutError {
        match error {
            OrdersApiError::Unauthorized => {
                warn!("order rejected: sign-in required");

                self.inner
                    .toasts
                    .error(ToastAction::AuthRequired, SIGN_IN_MESSAGE, None);

                self.inner.navigator.navigate(Route::SignIn {
                    redirect: CHECKOUT_PATH.to_string(),
                    message: SIGN_IN_MESSAGE.to_string(),
                });

                CheckoutError::Unauthorized
            }
            OrdersApiError::Rejected { status, message } => {
                let message = message.unwrap_or_else(|| ORDER_FAILED_MESSAGE.to_string());

                error!(status, %message, "order rejected");

                self.inner
                    .toasts
                    .error(ToastAction::OrderFailed, message.clone(), None);

                CheckoutError::Rejected(message)
            }
            error @ (OrdersApiError::Transport(_) | OrdersApiError::MissingOrderId) => {
                error!(%error, "order failed");

                self.inner
                    .toasts
                    .error(ToastAction::OrderFailed, ORDER_FAILED_MESSAGE, None);

                CheckoutError::Failed(error)
            }
        }
    }

    fn report_missing(&self, missing: &[&'static str]) {
        self.inner.toasts.error(
            ToastAction::Validation,
            format!("Please fill in: {}", missing.join(", ")),
            None,
        );
    }

    fn schedule(&self, delay: Duration, action: impl Future<Output = ()> + Send + 'static) {
        let Ok(handle) = Handle::try_current() else {
            debug!(?delay, "no runtime available; skipping scheduled checkout step");

            return;
        };

        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });

        self.inner
            .timers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(task.abort_handle());
    }
}

impl fmt::Debug for Checkout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkout")
            .field("state", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

/// Holds the submitting flag for the duration of one submission.
struct SubmittingGuard<'a> {
    inner: &'a CheckoutInner,
}

impl<'a> SubmittingGuard<'a> {
    fn acquire(inner: &'a CheckoutInner) -> Option<Self> {
        if inner.submitting.swap(true, Ordering::AcqRel) {
            return None;
        }

        inner.state.send_modify(|state| state.submitting = true);

        Some(SubmittingGuard { inner })
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.inner
            .state
            .send_modify(|state| state.submitting = false);
        self.inner.submitting.store(false, Ordering::Release);
    }
}
