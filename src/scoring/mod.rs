// src/scoring/mod.rs
//! Candidate scoring: input/output types, the heuristic scorer and the
//! provider gateway that decides who computes a score.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tokio::io::AsyncReadExt;

pub mod external;
pub mod gateway;
pub mod heuristic;

pub use external::ExternalModelClient;
pub use gateway::{ScoringGateway, ScoringProvider};
pub use heuristic::{clamp_score, HeuristicScorer};

/// Profile signals for one candidate. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringInput {
    #[serde(deserialize_with = "null_as_default")]
    pub resume_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experience_years: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub portfolio_links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_description: Option<String>,
}

/// Treat an explicit `null` the same as an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ScoringInput {
    pub fn with_job_description(mut self, description: Option<String>) -> Self {
        if description.is_some() {
            self.job_description = description;
        }
        self
    }
}

/// Read a profile from a JSON file, or from stdin when `file` is `-`.
pub async fn read_scoring_input(file: &Path) -> Result<ScoringInput> {
    let raw = if file.as_os_str() == "-" {
        let mut buffer = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buffer)
            .await
            .context("Failed to read stdin")?;
        buffer
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read file: {}", file.display()))?
    };

    serde_json::from_str(&raw).context("Input is not a valid scoring profile")
}

/// Which code path produced a [`ScoreResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    #[serde(rename = "mock-generated")]
    MockGenerated,
    #[serde(rename = "AI-generated")]
    AiGenerated,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::MockGenerated => "mock-generated",
            Provenance::AiGenerated => "AI-generated",
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub overall_score: u8,
    pub skill_score: u8,
    pub experience_score: u8,
    pub project_score: u8,
    pub communication_score: u8,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub note: Provenance,
}
