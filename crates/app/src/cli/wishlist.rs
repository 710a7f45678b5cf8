use clap::{Args, Subcommand};
use rootcraft::items::Product;
use rootcraft_app::context::AppContext;

use super::{ProductArgs, render};

#[derive(Debug, Args)]
pub(crate) struct WishlistCommand {
    #[command(subcommand)]
    command: WishlistSubcommand,
}

#[derive(Debug, Subcommand)]
enum WishlistSubcommand {
    /// Show the wishlist
    List,

    /// Save a product
    Add(ProductArgs),

    /// Forget a product
    Remove {
        /// Product identifier
        id: String,
    },

    /// Save the product if absent, otherwise forget it
    Toggle(ProductArgs),

    /// Forget every product
    Clear,
}

pub(crate) fn run(context: &AppContext, command: WishlistCommand) -> Result<(), String> {
    let wishlist = &context.wishlist;

    match command.command {
        WishlistSubcommand::List => {}
        WishlistSubcommand::Add(product) => wishlist.add_to_wishlist(Product::from(product)),
        WishlistSubcommand::Remove { id } => wishlist.remove_from_wishlist(&id),
        WishlistSubcommand::Toggle(product) => wishlist.toggle_wishlist(Product::from(product)),
        WishlistSubcommand::Clear => wishlist.clear_wishlist(),
    }

    println!("{}", render::wishlist(&wishlist.items()));

    super::print_toasts(context);

    Ok(())
}
