//! CLI command implementations.

pub mod demo;
pub mod quote;

use clap::Args;

/// Arguments for the quote command.
#[derive(Args)]
pub struct QuoteArgs {
    /// JSON file with an array of `{ "unit_price": "19.99", "quantity": 2 }` lines.
    pub cart: String,
}

/// Arguments for the demo command.
#[derive(Args)]
pub struct DemoArgs {
    /// JSON file with the products to seed the catalog with.
    #[arg(long)]
    pub catalog: String,

    /// JSON file with the storefront calls to replay, in order.
    #[arg(long)]
    pub script: String,

    /// Seed for reproducible order ids.
    #[arg(long)]
    pub seed: Option<u64>,
}
