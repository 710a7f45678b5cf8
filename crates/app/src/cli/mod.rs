use clap::{Args, Parser, Subcommand};
use rootcraft::items::Product;
use rootcraft_app::{config::StorefrontConfig, context::AppContext, observability};
use rust_decimal::Decimal;

mod cart;
mod checkout;
mod render;
mod wishlist;

#[derive(Debug, Parser)]
#[command(name = "rootcraft", about = "Rootcraft storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Wishlist(wishlist::WishlistCommand),
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_logging(&self.config)
            .map_err(|error| format!("failed to initialise logging: {error}"))?;

        let context = AppContext::from_config(&self.config).map_err(|error| {
            format!(
                "failed to open {}: {error}",
                self.config.storage_dir.display()
            )
        })?;

        match self.command {
            Commands::Cart(command) => cart::run(&context, command),
            Commands::Wishlist(command) => wishlist::run(&context, command),
            Commands::Checkout(args) => checkout::run(&context, args).await,
        }
    }
}

fn print_toasts(context: &AppContext) {
    let toasts = context.toasts.toasts();

    if !toasts.is_empty() {
        println!("{}", render::toasts(&toasts));
    }
}

/// Product details supplied on the command line.
#[derive(Debug, Clone, Args)]
pub(crate) struct ProductArgs {
    /// Product identifier
    #[arg(long)]
    id: String,

    /// Product name
    #[arg(long)]
    name: String,

    /// Unit price in rupees
    #[arg(long)]
    price: Decimal,

    /// Price before discount
    #[arg(long)]
    old_price: Option<Decimal>,

    /// Image URL
    #[arg(long, default_value = "")]
    image: String,

    /// Short description
    #[arg(long, default_value = "")]
    description: String,
}

impl From<ProductArgs> for Product {
    fn from(args: ProductArgs) -> Self {
        Product {
            id: args.id,
            name: args.name,
            description: args.description,
            image: args.image,
            price: args.price,
            old_price: args.old_price,
            tag: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn global_config_precedes_subcommand() -> TestResult {
        let cli = Cli::try_parse_from([
            "rootcraft",
            "--storage-dir",
            "/tmp/rootcraft",
            "cart",
            "add",
            "--id",
            "p1",
            "--name",
            "Oak Chair",
            "--price",
            "1000",
        ])?;

        assert_eq!(cli.config.storage_dir.to_string_lossy(), "/tmp/rootcraft");
        assert!(matches!(cli.command, Commands::Cart(_)));

        Ok(())
    }

    #[test]
    fn product_args_build_an_untagged_product() -> TestResult {
        #[derive(Debug, Parser)]
        struct Harness {
            #[command(flatten)]
            product: ProductArgs,
        }

        let product = Product::from(
            Harness::try_parse_from([
                "rootcraft",
                "--id",
                "p2",
                "--name",
                "Walnut Desk",
                "--price",
                "8499",
                "--old-price",
                "9999",
            ])?
            .product,
        );

        assert_eq!(product.price, Decimal::from(8_499));
        assert_eq!(product.old_price, Some(Decimal::from(9_999)));
        assert_eq!(product.tag, None);

        Ok(())
    }
}
