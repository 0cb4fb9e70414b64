//! Supabase-backed implementation of the backend capability.
//!
//! Talks PostgREST: table reads under `/rest/v1/{table}` and remote
//! procedures under `/rest/v1/rpc/{fn}`. The anon key rides along as both
//! the `apikey` header and a bearer token; row-level security on the hosted
//! side decides what the key may touch.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;

use super::Backend;
use crate::store::models::{Contract, Listing, MatchRecord, Message, NursePreferences};

pub struct SupabaseBackend {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct CreateHoldResponse {
    hold_id: String,
}

#[derive(Debug, Deserialize)]
struct ExpireHoldsResponse {
    #[serde(default)]
    expired: u64,
}

impl SupabaseBackend {
    pub fn new(base_url: String, anon_key: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, function)
    }

    /// Authenticated GET returning a deserialized body.
    async fn get<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .send()
            .await
            .context("Failed to reach remote backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Remote backend error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse remote backend response")
    }

    /// Authenticated POST returning a deserialized body.
    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await
            .context("Failed to reach remote backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Remote backend error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse remote backend response")
    }

    /// POST where the caller does not care about the response body.
    async fn post_ignored(&self, url: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .client
            .post(url)
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
            .json(body)
            .send()
            .await
            .context("Failed to reach remote backend")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Remote backend error: {} - {}", status, body);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Backend for SupabaseBackend {
    fn name(&self) -> &'static str {
        "supabase"
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn fetch_feed(&self) -> Result<Vec<Listing>> {
        self.post(&self.rpc_url("get_feed"), &json!({})).await
    }

    async fn fetch_contracts(&self) -> Result<Vec<Contract>> {
        self.get(&format!("{}?select=*", self.table_url("contracts")))
            .await
    }

    async fn fetch_matches(&self) -> Result<Vec<MatchRecord>> {
        self.get(&format!("{}?select=*", self.table_url("matches")))
            .await
    }

    async fn like(&self, nurse_id: &str, listing_id: &str) -> Result<Option<MatchRecord>> {
        self.post_ignored(
            &self.rpc_url("user_like_listing"),
            &json!({ "nurse_id": nurse_id, "listing_id": listing_id }),
        )
        .await?;

        // A mutual like upgrades to a match on the remote side.
        self.post(
            &self.rpc_url("ensure_match_on_mutual_like"),
            &json!({ "nurse_id": nurse_id, "listing_id": listing_id }),
        )
        .await
    }

    async fn pass(&self, nurse_id: &str, listing_id: &str) -> Result<()> {
        self.post_ignored(
            &self.table_url("likes"),
            &json!({ "nurse_id": nurse_id, "listing_id": listing_id, "decision": "pass" }),
        )
        .await
    }

    async fn create_listing(&self, listing: &Listing) -> Result<()> {
        self.post_ignored(
            &self.rpc_url("create_listing"),
            &serde_json::to_value(listing).context("Failed to serialize listing")?,
        )
        .await
    }

    async fn create_hold(&self, match_id: &str, amount_cents: i64) -> Result<String> {
        let response: CreateHoldResponse = self
            .post(
                &self.rpc_url("create_hold"),
                &json!({ "match_id": match_id, "amount_cents": amount_cents }),
            )
            .await?;
        Ok(response.hold_id)
    }

    async fn expire_holds(&self) -> Result<u64> {
        let response: ExpireHoldsResponse =
            self.post(&self.rpc_url("expire_holds"), &json!({})).await?;
        Ok(response.expired)
    }

    async fn get_onboarding(&self, nurse_id: &str) -> Result<Option<NursePreferences>> {
        self.post(
            &self.rpc_url("get_nurse_onboarding"),
            &json!({ "nurse_id": nurse_id }),
        )
        .await
    }

    async fn set_onboarding(&self, nurse_id: &str, prefs: &NursePreferences) -> Result<()> {
        self.post_ignored(
            &self.rpc_url("upsert_nurse_onboarding"),
            &json!({ "nurse_id": nurse_id, "preferences": prefs }),
        )
        .await
    }

    async fn send_message(&self, conversation_id: &str, message: &Message) -> Result<()> {
        self.post_ignored(
            &self.table_url("messages"),
            &json!({
                "conversation_id": conversation_id,
                "id": message.id,
                "sender_id": message.sender_id,
                "body": message.body,
                "sent_at": message.sent_at,
            }),
        )
        .await
    }

    async fn fetch_messages(&self, conversation_id: &str) -> Result<Vec<Message>> {
        self.get(&format!(
            "{}?select=*&conversation_id=eq.{}&order=sent_at.asc",
            self.table_url("messages"),
            conversation_id
        ))
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_built_off_a_trimmed_base() {
        let backend =
            SupabaseBackend::new("https://demo.supabase.co/".to_string(), "k".to_string());
        assert_eq!(
            backend.table_url("listings"),
            "https://demo.supabase.co/rest/v1/listings"
        );
        assert_eq!(
            backend.rpc_url("get_feed"),
            "https://demo.supabase.co/rest/v1/rpc/get_feed"
        );
    }
}
