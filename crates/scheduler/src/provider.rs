use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use shared::abstract_trait::provider::SettlementProviderTrait;
use shared::config::Config;
use shared::errors::ProviderError;
use tracing::{debug, error, info};

/// HTTP adapter for the third-party purchase API.
pub struct SettlementProviderClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SettlementProviderClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.provider_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            token: config.provider_token.clone(),
        })
    }
}

#[async_trait]
impl SettlementProviderTrait for SettlementProviderClient {
    async fn settle(
        &self,
        produk_id: &str,
        msisdn: &str,
        metode_pembayaran: &str,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}/api/xl/payment-settlement", self.base_url);
        let payload = json!({
            "produk_id": produk_id,
            "msisdn": msisdn,
            "metode_pembayaran": metode_pembayaran,
        });

        debug!("settlement request -> POST {url} {payload}");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout
                } else {
                    error!("❌ Settlement transport error for produk {produk_id}: {e}");
                    ProviderError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        info!(
            "settlement HTTP {} for produk={produk_id} msisdn={msisdn}",
            status.as_u16()
        );

        // Non-2xx bodies are still parsed: the provider reports declined
        // purchases as JSON on error statuses too.
        match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => Err(ProviderError::Http {
                status: status.as_u16(),
                body: truncate(&body, 500),
            }),
            Err(e) => Err(ProviderError::Unparseable(format!(
                "{e}: {}",
                truncate(&body, 500)
            ))),
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...(truncated)", &s[..end])
    }
}
