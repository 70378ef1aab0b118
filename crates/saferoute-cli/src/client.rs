//! Minimal HTTP client for a running SafeRoute server.

use anyhow::{Context, Result};
use reqwest::Client;
use saferoute_core::geocode::ResolvedPlace;
use saferoute_core::models::ScoredRoute;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct PlanResponse {
    pub origin: ResolvedPlace,
    pub destination: ResolvedPlace,
    pub recommended_index: usize,
    pub routes: Vec<ScoredRoute>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct SafeRouteClient {
    client: Client,
    base_url: String,
}

impl SafeRouteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .context("Failed to create HTTP client")?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Ask the server for ranked routes between two free-text places.
    pub async fn plan(
        &self,
        origin: &str,
        destination: &str,
        zoom: Option<u8>,
    ) -> Result<PlanResponse> {
        let url = format!("{}/v1/routes/plan", self.base_url);
        let mut body = json!({ "origin": origin, "destination": destination });
        if let Some(zoom) = zoom {
            body["zoom"] = json!(zoom);
        }

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(anyhow::anyhow!("Plan request failed: {} {}", status, message));
        }

        response
            .json::<PlanResponse>()
            .await
            .context("Failed to parse plan response")
    }
}
