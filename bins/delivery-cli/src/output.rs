//! Shared terminal output helpers

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;

const RULE: &str =
    "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Print a boxed section title
pub fn header(title: &str) {
    println!();
    println!("{}", RULE.blue());
    println!("  {}", title.blue().bold());
    println!("{}", RULE.blue());
    println!();
}

/// Print a value as pretty JSON on stdout
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an aligned `label: value` line
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", format!("{label}:").dimmed(), value);
}
