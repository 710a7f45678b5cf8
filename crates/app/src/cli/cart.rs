use clap::{Args, Subcommand};
use rootcraft::{items::Product, pricing::OrderTotals};
use rootcraft_app::context::AppContext;

use super::{ProductArgs, render};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    List,

    /// Add a product, or bump its quantity when already in the cart
    Add(ProductArgs),

    /// Remove a line
    Remove {
        /// Product identifier
        id: String,
    },

    /// Set a line quantity; zero or less removes the line
    Set {
        /// Product identifier
        id: String,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Remove every line
    Clear,
}

pub(crate) fn run(context: &AppContext, command: CartCommand) -> Result<(), String> {
    let cart = &context.cart;

    match command.command {
        CartSubcommand::List => {}
        CartSubcommand::Add(product) => cart.add_to_cart(Product::from(product)),
        CartSubcommand::Remove { id } => cart.remove_from_cart(&id),
        CartSubcommand::Set { id, quantity } => cart.update_quantity(&id, quantity),
        CartSubcommand::Clear => cart.clear_cart(),
    }

    let state = cart.state();
    let totals = OrderTotals::for_items(&state.items, context.shipping.as_ref());

    println!("{}", render::cart(&state, totals));

    super::print_toasts(context);

    Ok(())
}
