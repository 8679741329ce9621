//! Client construction and login

use anyhow::{Context, Result};
use delivery_api_client::DeliveryClient;
use delivery_core::Credentials;
use tracing::debug;

/// Login details collected from flags or the environment
pub struct Login {
    username: Option<String>,
    password: Option<String>,
}

impl Login {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self { username, password }
    }

    /// Build a client from the environment and log in
    pub async fn connect(&self) -> Result<DeliveryClient> {
        self.login().await.map(|(client, _)| client)
    }

    /// Like [`Login::connect`], also returning the issued credentials
    pub async fn login(&self) -> Result<(DeliveryClient, Credentials)> {
        let username = self
            .username
            .as_deref()
            .filter(|u| !u.is_empty())
            .context("missing username: pass --username or set DELIVERY_USERNAME")?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .context("missing password: pass --password or set DELIVERY_PASSWORD")?;

        let client = DeliveryClient::new().context("failed to configure the API client")?;
        debug!(base_url = client.adapter().base_url(), "Client configured");

        let credentials = client
            .authenticate(username, password)
            .await
            .context("login failed")?;
        Ok((client, credentials))
    }
}
