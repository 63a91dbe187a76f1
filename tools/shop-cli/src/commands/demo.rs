//! Replay a scripted storefront session against in-memory stores.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use shop_core::cart::{CartView, InMemoryCartRepository};
use shop_core::catalog::{InMemoryCatalog, Product};
use shop_core::checkout::{
    CheckoutRequest, InMemoryOrderStore, Order, OrderConfirmation, OrderSummaryView, PaymentInfo,
    SeededOrderIds, ShippingInfo,
};
use shop_core::storefront::AddToCart;
use shop_core::{ApiResponse, OrderId, ProductId, Storefront, UserId};
use std::sync::Arc;

use super::DemoArgs;
use crate::context::Context;
use crate::output::{money, status_badge};

/// One scripted storefront call. A step without a user runs anonymously.
#[derive(Debug, Deserialize)]
struct Step {
    #[serde(default)]
    user: Option<UserId>,
    #[serde(flatten)]
    action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Action {
    Add {
        product_id: ProductId,
        #[serde(default = "one")]
        quantity: i64,
    },
    Update {
        product_id: ProductId,
        quantity: i64,
    },
    Remove {
        product_id: ProductId,
    },
    Cart,
    Clear,
    Checkout {
        shipping_info: ShippingInfo,
        #[serde(default)]
        payment_info: Option<PaymentInfo>,
    },
    Orders,
    Order {
        order_id: OrderId,
    },
    Cancel {
        order_id: OrderId,
    },
}

fn one() -> i64 {
    1
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::Add { .. } => "add",
            Action::Update { .. } => "update",
            Action::Remove { .. } => "remove",
            Action::Cart => "cart",
            Action::Clear => "clear",
            Action::Checkout { .. } => "checkout",
            Action::Orders => "orders",
            Action::Order { .. } => "order",
            Action::Cancel { .. } => "cancel",
        }
    }
}

/// One replayed call in JSON output.
#[derive(Serialize)]
struct Transcript {
    step: usize,
    op: &'static str,
    user: Option<UserId>,
    status: u16,
    response: serde_json::Value,
}

/// Run the demo command.
pub async fn run(args: DemoArgs, ctx: &Context) -> Result<()> {
    let products: Vec<Product> = ctx.read_json(&args.catalog)?;
    let steps: Vec<Step> = ctx.read_json(&args.script)?;
    ctx.output.debug(&format!(
        "{} product(s), {} step(s)",
        products.len(),
        steps.len()
    ));

    let mut builder = Storefront::build(
        Arc::new(InMemoryCatalog::with_products(products)),
        Arc::new(InMemoryCartRepository::new()),
        Arc::new(InMemoryOrderStore::new()),
        &ctx.config,
    )?;
    if let Some(seed) = args.seed {
        builder = builder.id_source(Arc::new(SeededOrderIds::new(seed)));
    }
    let shop = builder.finish()?;

    let mut transcript = Vec::with_capacity(steps.len());
    for (index, step) in steps.into_iter().enumerate() {
        let number = index + 1;
        let op = step.action.label();
        let who = step.user.as_ref().map_or("anonymous", |u| u.as_str());
        ctx.output.header(&format!("[{}] {} ({})", number, op, who));

        let (status, response) = replay(&shop, step.user.as_ref(), step.action, ctx).await?;
        transcript.push(Transcript {
            step: number,
            op,
            user: step.user,
            status,
            response,
        });
    }

    if ctx.output.is_json() {
        ctx.output.json(&transcript);
    }
    Ok(())
}

async fn replay(
    shop: &Storefront,
    user: Option<&UserId>,
    action: Action,
    ctx: &Context,
) -> Result<(u16, serde_json::Value)> {
    match action {
        Action::Add {
            product_id,
            quantity,
        } => {
            let response = shop
                .add_to_cart(user, AddToCart { product_id, quantity })
                .await;
            show(ctx, &response, |change| {
                ctx.output.kv(&change.product_name, &format!("qty {}", change.quantity));
            })
        }
        Action::Update {
            product_id,
            quantity,
        } => {
            let response = shop.update_cart_item(user, &product_id, quantity).await;
            show(ctx, &response, |change| {
                ctx.output.kv(&change.product_name, &format!("qty {}", change.quantity));
            })
        }
        Action::Remove { product_id } => {
            let response = shop.remove_from_cart(user, &product_id).await;
            show(ctx, &response, |removed| ctx.output.kv("Removed", &removed.product_name))
        }
        Action::Cart => {
            let response = shop.get_cart(user).await;
            show(ctx, &response, |cart| print_cart(ctx, cart))
        }
        Action::Clear => {
            let response = shop.clear_cart(user).await;
            show(ctx, &response, |_| {})
        }
        Action::Checkout {
            shipping_info,
            payment_info,
        } => {
            let request = CheckoutRequest {
                shipping_info,
                payment_info,
            };
            let response = shop.place_order(user, request).await;
            show(ctx, &response, |confirmation| print_confirmation(ctx, confirmation))
        }
        Action::Orders => {
            let response = shop.list_orders(user).await;
            show(ctx, &response, |orders| print_orders(ctx, orders))
        }
        Action::Order { order_id } => {
            let response = shop.get_order(user, &order_id).await;
            show(ctx, &response, |order| print_order(ctx, order))
        }
        Action::Cancel { order_id } => {
            let response = shop.cancel_order(user, &order_id).await;
            show(ctx, &response, |summary| {
                ctx.output.kv(summary.order_id.as_str(), &status_badge(summary.status));
            })
        }
    }
}

/// Print a response and hand back its status and JSON form.
fn show<T: Serialize>(
    ctx: &Context,
    response: &ApiResponse<T>,
    details: impl FnOnce(&T),
) -> Result<(u16, serde_json::Value)> {
    ctx.output.response(response);
    if let (false, Some(data)) = (ctx.output.is_json(), response.data.as_ref()) {
        details(data);
    }
    Ok((response.status_code(), serde_json::to_value(response)?))
}

fn print_cart(ctx: &Context, cart: &CartView) {
    if cart.is_empty() {
        ctx.output.info("Cart is empty");
        return;
    }
    for entry in &cart.items {
        ctx.output.table_row(
            &[
                entry.name.as_str(),
                &format!("x{}", entry.quantity),
                &money(entry.line_total),
            ],
            &[24, 6, 10],
        );
    }
    ctx.output.kv("Items", &cart.item_count.to_string());
    ctx.output.kv("Subtotal", &money(cart.subtotal));
}

fn print_confirmation(ctx: &Context, confirmation: &OrderConfirmation) {
    ctx.output.kv("Order", confirmation.order_id.as_str());
    ctx.output.kv("Items", &confirmation.item_count.to_string());
    ctx.output.kv("Total", &money(confirmation.total));
    if confirmation.is_degraded() {
        ctx.output.warn("Cart still holds the ordered items");
    }
}

fn print_orders(ctx: &Context, orders: &[OrderSummaryView]) {
    if orders.is_empty() {
        ctx.output.info("No orders yet");
        return;
    }
    for order in orders {
        ctx.output.table_row(
            &[
                order.order_id.as_str(),
                &order.order_date.format("%Y-%m-%d %H:%M").to_string(),
                &status_badge(order.status),
                &money(order.total),
            ],
            &[20, 16, 12, 10],
        );
    }
}

fn print_order(ctx: &Context, order: &Order) {
    ctx.output.kv("Order", order.order_id.as_str());
    ctx.output.kv("Status", &status_badge(order.status));
    ctx.output.kv("Ship to", &order.shipping_info.one_line());
    for line in &order.items {
        ctx.output.list_item(&format!(
            "{} x{} @ {} = {}",
            line.name,
            line.quantity,
            line.unit_price.display(),
            line.line_total.display()
        ));
    }
    ctx.output.kv("Subtotal", &money(order.order_summary.subtotal));
    ctx.output.kv("Shipping", &money(order.order_summary.shipping));
    ctx.output.kv("Tax", &money(order.order_summary.tax));
    ctx.output.kv("Total", &money(order.order_summary.total));
}
