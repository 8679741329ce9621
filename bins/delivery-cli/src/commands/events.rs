//! Events command - poll and optionally acknowledge the event queue

use crate::output;
use crate::session::Login;
use anyhow::Result;
use delivery_api_client::endpoints::events::Event;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::info;

/// JSON output for events
#[derive(Debug, Serialize)]
struct JsonEventsOutput {
    total: usize,
    acknowledged: bool,
    events: Vec<Event>,
}

/// Run events command
pub async fn run(login: &Login, ack: bool, format: &str) -> Result<()> {
    let client = login.connect().await?;
    let api = client.events();

    let events = api.poll().await?;
    if ack {
        api.acknowledge(&events).await?;
        info!(count = events.len(), "Acknowledged events");
    }

    if format == "json" {
        return output::json(&JsonEventsOutput {
            total: events.len(),
            acknowledged: ack && !events.is_empty(),
            events,
        });
    }

    output::header("📨 Pending Events");
    if events.is_empty() {
        println!("  {}", "Queue is empty".dimmed());
        println!();
        return Ok(());
    }

    println!(
        "  {:<38} {:<6} {:<38} {}",
        "ID".dimmed(),
        "Code".dimmed(),
        "Order".dimmed(),
        "Created".dimmed()
    );
    println!("  {}", "─".repeat(100).dimmed());
    for event in &events {
        println!(
            "  {:<38} {:<6} {:<38} {}",
            event.id,
            event.code.cyan(),
            event.order_id,
            event.created_at.as_deref().unwrap_or("-").dimmed()
        );
    }

    println!();
    if ack {
        println!("  {} {} events acknowledged", "✓".green(), events.len());
    } else {
        println!("  {}", "Run with --ack to remove them from the queue".dimmed());
    }
    println!();
    Ok(())
}
