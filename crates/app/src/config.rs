//! Storefront configuration

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use rootcraft::pricing::ThresholdShipping;
use rust_decimal::Decimal;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output
    #[default]
    Compact,

    /// Structured JSON lines
    Json,
}

/// Storefront configuration, read from flags and the environment.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Storefront backend base URL
    #[arg(long, env = "ROOTCRAFT_API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Bearer token of the signed-in customer
    #[arg(long, env = "ROOTCRAFT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Directory holding the persisted cart and wishlist
    #[arg(long, env = "ROOTCRAFT_STORAGE_DIR", default_value = ".rootcraft")]
    pub storage_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "ROOTCRAFT_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Subtotal from which shipping is free, in rupees
    #[arg(long, env = "ROOTCRAFT_FREE_SHIPPING_THRESHOLD", default_value = "1000")]
    pub free_shipping_threshold: Decimal,

    /// Shipping fee below the free threshold, in rupees
    #[arg(long, env = "ROOTCRAFT_FLAT_SHIPPING_FEE", default_value = "99")]
    pub flat_shipping_fee: Decimal,
}

impl StorefrontConfig {
    /// Shipping rule described by this configuration.
    #[must_use]
    pub fn shipping_rule(&self) -> ThresholdShipping {
        ThresholdShipping::new(self.free_shipping_threshold, self.flat_shipping_fee)
    }

    /// Endpoint accepting new orders.
    #[must_use]
    pub fn orders_url(&self) -> String {
        format!("{}/api/orders", self.api_url.trim_end_matches('/'))
    }
}
