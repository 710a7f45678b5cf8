use std::time::Duration;

use clap::{Args, ValueEnum};
use rootcraft::{
    checkout::{
        CART_CLEAR_DELAY,
        forms::{AddressForm, DEFAULT_COUNTRY, PaymentForm},
    },
    navigation::Route,
    orders::PaymentMethod,
};
use rootcraft_app::context::AppContext;
use tokio::time;

use super::{print_toasts, render};

/// Time allowed past the cart-clear delay so the clear lands before the command exits.
const SETTLE_MARGIN: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PaymentChoice {
    /// Card payment
    Card,

    /// Cash on delivery
    Cash,
}

impl From<PaymentChoice> for PaymentMethod {
    fn from(choice: PaymentChoice) -> Self {
        match choice {
            PaymentChoice::Card => PaymentMethod::Card,
            PaymentChoice::Cash => PaymentMethod::CashOnDelivery,
        }
    }
}

/// Delivery and payment details for one checkout.
#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// First name
    #[arg(long, default_value = "")]
    first_name: String,

    /// Last name
    #[arg(long, default_value = "")]
    last_name: String,

    /// Email address
    #[arg(long, default_value = "")]
    email: String,

    /// Phone number
    #[arg(long, default_value = "")]
    phone: String,

    /// Street address
    #[arg(long, default_value = "")]
    street: String,

    /// City
    #[arg(long, default_value = "")]
    city: String,

    /// State
    #[arg(long, default_value = "")]
    state: String,

    /// ZIP / PIN code
    #[arg(long, default_value = "")]
    zip: String,

    /// Country
    #[arg(long, default_value = DEFAULT_COUNTRY)]
    country: String,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentChoice::Cash)]
    payment: PaymentChoice,

    /// Card number
    #[arg(long, default_value = "")]
    card_number: String,

    /// Name on card
    #[arg(long, default_value = "")]
    card_name: String,

    /// Card expiry, MM/YY
    #[arg(long, default_value = "")]
    expiry: String,

    /// Card security code
    #[arg(long, default_value = "")]
    cvv: String,
}

impl CheckoutArgs {
    fn address(&self) -> AddressForm {
        AddressForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            street: self.street.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip: self.zip.clone(),
            country: self.country.clone(),
        }
    }

    fn payment(&self) -> PaymentForm {
        PaymentForm {
            method: self.payment.into(),
            card_number: self.card_number.clone(),
            card_name: self.card_name.clone(),
            expiry: self.expiry.clone(),
            cvv: self.cvv.clone(),
        }
    }
}

pub(crate) async fn run(context: &AppContext, args: CheckoutArgs) -> Result<(), String> {
    let checkout = context.checkout();

    checkout.set_address(args.address());

    if let Err(error) = checkout.continue_to_payment() {
        print_toasts(context);

        return Err(format!("checkout stopped at the address step: {error}"));
    }

    checkout.set_payment(args.payment());

    let confirmation = match checkout.place_order().await {
        Ok(confirmation) => confirmation,
        Err(error) => {
            print_toasts(context);

            if let Some(route @ Route::SignIn { .. }) = context.navigator.last_route() {
                eprintln!("sign in at {route} and retry");
            }

            return Err(format!("failed to place order: {error}"));
        }
    };

    println!("{}", render::confirmation(&confirmation));

    time::sleep(CART_CLEAR_DELAY + SETTLE_MARGIN).await;
    checkout.teardown();

    print_toasts(context);

    Ok(())
}
