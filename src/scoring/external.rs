// src/scoring/external.rs
//! HTTP client for an external scoring model.

use super::{clamp_score, Provenance, ScoreResult, ScoringInput};
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::info;

const SCORE_ENDPOINT: &str = "/score";

/// Response body accepted from the provider. Scores may come back as floats
/// or out of range; they are re-clamped before reaching callers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalScoreResponse {
    pub overall_score: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub project_score: f64,
    pub communication_score: f64,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl From<ExternalScoreResponse> for ScoreResult {
    fn from(response: ExternalScoreResponse) -> Self {
        Self {
            overall_score: clamp_score(response.overall_score),
            skill_score: clamp_score(response.skill_score),
            experience_score: clamp_score(response.experience_score),
            project_score: clamp_score(response.project_score),
            communication_score: clamp_score(response.communication_score),
            strengths: response.strengths,
            weaknesses: response.weaknesses,
            note: Provenance::AiGenerated,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExternalErrorResponse {
    error: String,
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ExternalErrorResponse>(body) {
        Ok(error_response) => error_response.error,
        Err(_) => format!("API returned error {}: {}", status, body),
    }
}

#[derive(Clone)]
pub struct ExternalModelClient {
    client: Client,
    endpoint: String,
    credential: String,
}

impl std::fmt::Debug for ExternalModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExternalModelClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl ExternalModelClient {
    pub fn new(endpoint: String, credential: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            credential,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single attempt, no retries. The caller decides what a failure means.
    pub async fn score(&self, input: &ScoringInput) -> Result<ScoreResult> {
        let url = format!("{}{}", self.endpoint, SCORE_ENDPOINT);
        info!("Calling external scoring model: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.credential)
            .json(input)
            .send()
            .await
            .context("Failed to send request to scoring model")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            anyhow::bail!(
                "Scoring model error: {}",
                error_message(status, &response_text)
            );
        }

        let parsed: ExternalScoreResponse = serde_json::from_str(&response_text)
            .context("Scoring model returned an unexpected response shape")?;

        Ok(parsed.into())
    }
}
