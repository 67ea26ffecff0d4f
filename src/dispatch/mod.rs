//! Trigger dispatcher
//!
//! Forwards a minted proof to the oracle endpoint. Acceptance starts an
//! irreversible downstream execution that this crate cannot observe, so a
//! dispatch is sent exactly once and never retried.

use crate::core::config::OracleConfig;
use crate::core::error::{GatewayError, Result};
use crate::core::types::Proof;
use reqwest::Client;
use serde::Serialize;

/// Result of a successful dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// HTTP status returned by the oracle endpoint
    pub status: u16,
}

/// Payload sent to the oracle endpoint
#[derive(Debug, Serialize)]
struct TriggerRequest<'a> {
    q_proof: &'a Proof,
    target_contract: &'a str,
}

pub struct TriggerDispatcher {
    client: Client,
    url: String,
    target_contract: String,
}

impl TriggerDispatcher {
    pub fn new(config: &OracleConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url.clone(),
            target_contract: config.target_contract.clone(),
        })
    }

    pub fn target_contract(&self) -> &str {
        &self.target_contract
    }

    /// Send the proof to the oracle endpoint
    ///
    /// Only the status code is interpreted; the response body is read solely
    /// to enrich the error message on rejection.
    pub async fn dispatch(&self, proof: &Proof) -> Result<DispatchOutcome> {
        let request = TriggerRequest {
            q_proof: proof,
            target_contract: &self.target_contract,
        };

        let payload = serde_json::to_vec(&request)?;

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GatewayError::Dispatch(format!(
                "oracle rejected trigger ({}): {}",
                status, error_text
            )));
        }

        tracing::debug!(status = status.as_u16(), "trigger accepted");
        Ok(DispatchOutcome {
            status: status.as_u16(),
        })
    }
}
