//! Merchants command - list merchants or inspect one

use crate::output;
use crate::session::Login;
use anyhow::Result;
use delivery_api_client::endpoints::merchants::{MerchantDetails, MerchantStatus};
use delivery_telemetry::Timer;
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output for a single merchant
#[derive(Debug, Serialize)]
struct JsonMerchantOutput {
    merchant: MerchantDetails,
    statuses: Vec<MerchantStatus>,
}

/// Run merchants command
pub async fn run(login: &Login, id: Option<&str>, format: &str) -> Result<()> {
    let client = login.connect().await?;
    let merchants = client.merchants();

    let Some(id) = id else {
        let timer = Timer::start("list merchants");
        let list = merchants.list().await?;
        timer.stop();

        if format == "json" {
            return output::json(&list);
        }

        output::header("🏪 Merchants");
        if list.is_empty() {
            println!("  {}", "No merchants available for these credentials".yellow());
        }
        for merchant in &list {
            println!("  {:<38} {}", merchant.id.dimmed(), merchant.name.bold());
        }
        println!();
        return Ok(());
    };

    let timer = Timer::start("inspect merchant");
    let merchant = merchants.get(id).await?;
    let statuses = merchants.statuses(id).await?;
    timer.stop();

    if format == "json" {
        return output::json(&JsonMerchantOutput { merchant, statuses });
    }

    output::header(&format!("🏪 {}", merchant.name));
    output::field("ID", &merchant.id);
    if let Some(corporate_name) = &merchant.corporate_name {
        output::field("Corporate name", corporate_name);
    }
    if let Some(address) = &merchant.address {
        let city = address.city.as_deref().unwrap_or("-");
        let street = address.street.as_deref().unwrap_or("-");
        output::field("Address", format!("{street}, {city}"));
    }
    println!();

    for status in &statuses {
        let marker = if status.available {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        let channel = status.sales_channel.as_deref().unwrap_or("ALL");
        let state = status.state.as_deref().unwrap_or("");
        println!(
            "    └─ {} {:<10} {:<10} {}",
            marker,
            status.operation,
            channel,
            state.dimmed()
        );
    }
    println!();
    Ok(())
}
