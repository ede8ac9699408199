// src/scoring/gateway.rs
//! Chooses between the heuristic scorer and an external model provider.

use super::{ExternalModelClient, HeuristicScorer, ScoreResult, ScoringInput};
use crate::config::{ProviderKind, ScoringConfig};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub enum ScoringProvider {
    Heuristic,
    ExternalModel(ExternalModelClient),
}

#[derive(Debug, Clone)]
pub struct ScoringGateway {
    provider: ScoringProvider,
}

impl Default for ScoringGateway {
    fn default() -> Self {
        Self::heuristic()
    }
}

impl ScoringGateway {
    pub fn heuristic() -> Self {
        Self {
            provider: ScoringProvider::Heuristic,
        }
    }

    pub fn with_provider(provider: ScoringProvider) -> Self {
        Self { provider }
    }

    /// Build the gateway from configuration. A credential alone never enables
    /// delegation: the provider must be set to `external` explicitly.
    pub fn from_config(config: &ScoringConfig) -> Self {
        if config.provider != ProviderKind::External {
            if config.api_key.is_some() {
                info!("Scoring credential present but provider is heuristic; not delegating");
            }
            return Self::heuristic();
        }

        let (endpoint, credential) = match (&config.api_url, &config.api_key) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                (url.clone(), key.clone())
            }
            _ => {
                warn!("External scoring requested without endpoint or credential; using heuristic");
                return Self::heuristic();
            }
        };

        match ExternalModelClient::new(
            endpoint,
            credential,
            Duration::from_secs(config.timeout_seconds),
        ) {
            Ok(client) => {
                info!("External scoring model enabled: {}", client.endpoint());
                Self::with_provider(ScoringProvider::ExternalModel(client))
            }
            Err(e) => {
                warn!("Failed to build scoring model client, using heuristic: {}", e);
                Self::heuristic()
            }
        }
    }

    pub fn provider(&self) -> &ScoringProvider {
        &self.provider
    }

    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            ScoringProvider::Heuristic => "heuristic",
            ScoringProvider::ExternalModel(_) => "external",
        }
    }

    /// Never fails: external errors degrade to the heuristic result.
    pub async fn compute_score(&self, input: &ScoringInput) -> ScoreResult {
        match &self.provider {
            ScoringProvider::Heuristic => HeuristicScorer::score(input),
            ScoringProvider::ExternalModel(client) => match client.score(input).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("External scoring failed, falling back to heuristic: {:#}", e);
                    HeuristicScorer::score(input)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Provenance;

    fn sample_input() -> ScoringInput {
        ScoringInput {
            resume_text: "Built marketplaces in Rust".to_string(),
            skills: vec!["rust".to_string(), "sql".to_string(), "react".to_string()],
            experience_years: 2.0,
            portfolio_links: vec!["https://github.com/someone".to_string()],
            job_description: None,
        }
    }

    #[tokio::test]
    async fn test_default_gateway_is_heuristic() {
        let gateway = ScoringGateway::default();
        let result = gateway.compute_score(&sample_input()).await;
        assert_eq!(gateway.provider_name(), "heuristic");
        assert_eq!(result, HeuristicScorer::score(&sample_input()));
        assert_eq!(result.note, Provenance::MockGenerated);
    }

    #[test]
    fn test_credential_without_opt_in_stays_heuristic() {
        let config = ScoringConfig {
            provider: ProviderKind::Heuristic,
            api_url: Some("http://models.internal".to_string()),
            api_key: Some("secret".to_string()),
            timeout_seconds: 30,
        };
        let gateway = ScoringGateway::from_config(&config);
        assert!(matches!(gateway.provider(), ScoringProvider::Heuristic));
    }

    #[test]
    fn test_external_without_credential_stays_heuristic() {
        let config = ScoringConfig {
            provider: ProviderKind::External,
            api_url: Some("http://models.internal".to_string()),
            api_key: Some("  ".to_string()),
            timeout_seconds: 30,
        };
        let gateway = ScoringGateway::from_config(&config);
        assert_eq!(gateway.provider_name(), "heuristic");
    }

    #[test]
    fn test_external_opt_in_selects_model() {
        let config = ScoringConfig {
            provider: ProviderKind::External,
            api_url: Some("http://models.internal".to_string()),
            api_key: Some("secret".to_string()),
            timeout_seconds: 5,
        };
        let gateway = ScoringGateway::from_config(&config);
        assert_eq!(gateway.provider_name(), "external");
    }

    /// Serve one canned HTTP response on an ephemeral port.
    async fn one_shot_server(status_line: &'static str, body: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = vec![0u8; 8192];
            let _ = socket.read(&mut buffer).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        });
        format!("http://{}", addr)
    }

    fn external_config(api_url: String) -> ScoringConfig {
        ScoringConfig {
            provider: ProviderKind::External,
            api_url: Some(api_url),
            api_key: Some("secret".to_string()),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_external_model_result_is_tagged() {
        let url = one_shot_server(
            "HTTP/1.1 200 OK",
            r#"{"overallScore":71,"skillScore":60,"experienceScore":80,"projectScore":75,"communicationScore":70,"strengths":["Relevant stack"]}"#,
        )
        .await;
        let gateway = ScoringGateway::from_config(&external_config(url));

        let result = gateway.compute_score(&sample_input()).await;
        assert_eq!(result.note, Provenance::AiGenerated);
        assert_eq!(result.overall_score, 71);
        assert_eq!(result.strengths, vec!["Relevant stack".to_string()]);
    }

    #[tokio::test]
    async fn test_external_model_error_falls_back() {
        let url = one_shot_server(
            "HTTP/1.1 503 Service Unavailable",
            r#"{"error":"overloaded"}"#,
        )
        .await;
        let gateway = ScoringGateway::from_config(&external_config(url));

        let result = gateway.compute_score(&sample_input()).await;
        assert_eq!(result, HeuristicScorer::score(&sample_input()));
    }

    #[tokio::test]
    async fn test_external_model_bad_shape_falls_back() {
        let url = one_shot_server("HTTP/1.1 200 OK", r#"{"score":"great"}"#).await;
        let gateway = ScoringGateway::from_config(&external_config(url));

        let result = gateway.compute_score(&sample_input()).await;
        assert_eq!(result.note, Provenance::MockGenerated);
    }

    #[tokio::test]
    async fn test_unreachable_model_falls_back_to_heuristic() {
        let config = ScoringConfig {
            provider: ProviderKind::External,
            // Port 9 (discard) is not expected to be listening locally.
            api_url: Some("http://127.0.0.1:9".to_string()),
            api_key: Some("secret".to_string()),
            timeout_seconds: 2,
        };
        let gateway = ScoringGateway::from_config(&config);
        let result = gateway.compute_score(&sample_input()).await;
        assert_eq!(result, HeuristicScorer::score(&sample_input()));
        assert_eq!(result.note, Provenance::MockGenerated);
    }
}
