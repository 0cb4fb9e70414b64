//! Hosted payments provider client.
//!
//! Creates manual-capture payment intents backing a hold: the fee is
//! authorized up front and only captured if the hold converts. The whole
//! module is optional; without a configured secret key the hold flow
//! simply skips the payment step.

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::PaymentsConfig;

const API_BASE: &str = "https://api.stripe.com/v1";

pub struct PaymentsClient {
    secret_key: String,
    currency: String,
    client: reqwest::Client,
}

/// The slice of the provider's intent object we care about.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

impl PaymentsClient {
    /// Build a client from config; `None` when no secret key is set.
    pub fn from_config(config: &PaymentsConfig) -> Option<Self> {
        let secret_key = config.secret_key.clone()?;
        if secret_key.is_empty() {
            return None;
        }
        Some(Self {
            secret_key,
            currency: config.currency.clone(),
            client: reqwest::Client::new(),
        })
    }

    /// Create a manual-capture intent for a hold's fee.
    pub async fn create_hold_intent(
        &self,
        hold_id: &str,
        amount_cents: i64,
    ) -> Result<PaymentIntent> {
        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", self.currency.clone()),
            ("capture_method", "manual".to_string()),
            ("metadata[hold_id]", hold_id.to_string()),
        ];

        let response = self
            .client
            .post(format!("{API_BASE}/payment_intents"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&params)
            .send()
            .await
            .context("Failed to reach payments provider")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Payments provider error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse payment intent response")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_requires_a_secret_key() {
        let unconfigured = PaymentsConfig::default();
        assert!(PaymentsClient::from_config(&unconfigured).is_none());

        let empty_key = PaymentsConfig {
            secret_key: Some(String::new()),
            ..PaymentsConfig::default()
        };
        assert!(PaymentsClient::from_config(&empty_key).is_none());

        let configured = PaymentsConfig {
            secret_key: Some("sk_test_123".to_string()),
            ..PaymentsConfig::default()
        };
        let client = PaymentsClient::from_config(&configured).unwrap();
        assert_eq!(client.currency, "usd");
    }
}
