//! Auth command - log in and report the token lifetime

use crate::output;
use crate::session::Login;
use anyhow::Result;
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use serde::Serialize;

/// JSON output for auth
#[derive(Debug, Serialize)]
struct JsonAuthOutput {
    authenticated: bool,
    token_type: String,
    scope: String,
    expires_at: Option<DateTime<Utc>>,
    session_id: &'static str,
}

/// Run auth command
pub async fn run(login: &Login, format: &str) -> Result<()> {
    // The token itself is never printed
    let (client, credentials) = login.login().await?;
    let auth = client.auth();
    let expires_at = auth.expires_at();

    if format == "json" {
        return output::json(&JsonAuthOutput {
            authenticated: auth.is_authenticated(),
            token_type: credentials.token_type,
            scope: credentials.scope,
            expires_at,
            session_id: delivery_telemetry::session_id(),
        });
    }

    output::header("🔑 Authentication");
    println!("  {}", "✓ Logged in".green());
    output::field("Token type", &credentials.token_type);
    output::field("Scope", &credentials.scope);
    if let Some(expires_at) = expires_at {
        let minutes = (expires_at - Utc::now()).num_minutes();
        output::field(
            "Expires",
            format!("{} {}", expires_at, format!("(in {minutes} min)").dimmed()),
        );
    }
    println!();
    Ok(())
}
