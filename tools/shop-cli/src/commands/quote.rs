//! Price cart lines without touching any store.

use anyhow::{Context as _, Result};
use shop_core::cart::{PricedLine, PricingCalculator};

use super::QuoteArgs;
use crate::context::Context;
use crate::output::money;

/// Run the quote command.
pub async fn run(args: QuoteArgs, ctx: &Context) -> Result<()> {
    let lines: Vec<PricedLine> = ctx.read_json(&args.cart)?;
    if lines.is_empty() {
        ctx.output.warn("No lines to price; the quote is shipping only.");
    }

    let calculator = PricingCalculator::from_config(&ctx.config.pricing)?;
    let summary = calculator
        .calculate(lines.iter().copied())
        .context("Failed to price cart")?;

    if ctx.output.is_json() {
        ctx.output.json(&summary);
        return Ok(());
    }

    ctx.output.header(&format!("Quote for {} line(s)", lines.len()));
    for line in &lines {
        let total = PricingCalculator::line_total(line.unit_price, line.quantity)?;
        ctx.output.list_item(&format!(
            "{} x {} = {}",
            line.quantity,
            line.unit_price.display(),
            total.display()
        ));
    }
    println!();
    ctx.output.kv("Subtotal", &money(summary.subtotal));
    ctx.output.kv("Shipping", &money(summary.shipping));
    ctx.output.kv("Tax", &money(summary.tax));
    ctx.output.kv("Total", &money(summary.total));

    Ok(())
}
