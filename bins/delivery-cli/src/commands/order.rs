//! Order command - show order details

use crate::output;
use crate::session::Login;
use anyhow::Result;
use delivery_api_client::endpoints::orders::{Order, Tracking};
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output for an order
#[derive(Debug, Serialize)]
struct JsonOrderOutput {
    order: Order,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking: Option<Tracking>,
}

/// Run order command
pub async fn run(login: &Login, reference: &str, tracking: bool, format: &str) -> Result<()> {
    let client = login.connect().await?;
    let orders = client.orders();

    let order = orders.details(reference).await?;
    let tracking = if tracking {
        Some(orders.tracking(reference).await?)
    } else {
        None
    };

    if format == "json" {
        return output::json(&JsonOrderOutput { order, tracking });
    }

    let short = order.short_reference.as_deref().unwrap_or(&order.id);
    output::header(&format!("📦 Order {short}"));
    output::field("ID", &order.id);
    if let Some(kind) = &order.order_type {
        output::field("Type", kind);
    }
    if let Some(created_at) = &order.created_at {
        output::field("Created", created_at);
    }
    if let Some(merchant) = &order.merchant {
        output::field(
            "Merchant",
            merchant.name.as_deref().unwrap_or(merchant.id.as_str()),
        );
    }
    if let Some(customer) = order.customer.as_ref().and_then(|c| c.name.as_deref()) {
        output::field("Customer", customer);
    }
    println!();

    for item in &order.items {
        let price = item
            .total_price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_default();
        println!("    └─ {:>4} × {:<30} {}", item.quantity, item.name, price.dimmed());
    }
    if let Some(amount) = order.total.as_ref().and_then(|t| t.order_amount) {
        println!();
        output::field("Total", format!("{amount:.2}").bold());
    }

    if let Some(tracking) = &tracking {
        println!();
        match (tracking.latitude, tracking.longitude) {
            (Some(lat), Some(lon)) => output::field("Courier", format!("{lat:.5}, {lon:.5}")),
            _ => output::field("Courier", "position unknown".yellow()),
        }
        if let Some(eta) = &tracking.expected_delivery {
            output::field("Expected delivery", eta);
        }
    }
    println!();
    Ok(())
}
