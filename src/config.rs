// src/config.rs
//! Configuration: optional `config.yaml` sections overridden by environment variables.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentConfig {
    pub name: String,
    pub database_path: PathBuf,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Heuristic,
    External,
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" | "mock" | "" => Ok(ProviderKind::Heuristic),
            "external" | "ai" => Ok(ProviderKind::External),
            other => anyhow::bail!("Unknown scoring provider: {}. Use heuristic or external", other),
        }
    }
}

#[derive(Clone, PartialEq)]
pub struct ScoringConfig {
    pub provider: ProviderKind,
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Heuristic,
            api_url: None,
            api_key: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

// Keep the credential out of logs.
impl std::fmt::Debug for ScoringConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// One environment's section in `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigSection {
    pub database_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub scoring_provider: Option<ProviderKind>,
    pub scoring_api_url: Option<String>,
    pub scoring_timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    local: ConfigSection,
    production: ConfigSection,
}

impl ConfigManager {
    /// Load configuration for the current `ENVIRONMENT` (default `local`).
    pub fn load() -> Result<Self> {
        let env_name = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string());
        info!("Loading configuration for environment: {}", env_name);

        let section = Self::load_section(Path::new(CONFIG_FILE), &env_name)?;
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;

        Self::from_sources(&env_name, section, &base_dir, |key| std::env::var(key).ok())
    }

    fn load_section(path: &Path, env_name: &str) -> Result<ConfigSection> {
        if !path.exists() {
            info!("{} not found, using defaults and environment", path.display());
            return Ok(ConfigSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_section(&content, env_name)
    }

    pub fn parse_section(content: &str, env_name: &str) -> Result<ConfigSection> {
        let file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        Ok(match env_name {
            "production" => file.production,
            "local" => file.local,
            other => {
                warn!("Unknown environment '{}', using local configuration section", other);
                file.local
            }
        })
    }

    /// Merge a file section with variables from `lookup`; variables win.
    pub fn from_sources<F>(
        env_name: &str,
        section: ConfigSection,
        base_dir: &Path,
        lookup: F,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_path = lookup("DATABASE_PATH")
            .map(PathBuf::from)
            .or(section.database_path)
            .unwrap_or_else(|| PathBuf::from("data/gig_scorer.db"));

        let port = match lookup("ROCKET_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            None => section.port.unwrap_or(DEFAULT_PORT),
        };

        let provider = match lookup("SCORING_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => section.scoring_provider.unwrap_or_default(),
        };

        let timeout_seconds = match lookup("SCORING_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("SCORING_TIMEOUT_SECONDS must be a whole number"))?,
            None => section
                .scoring_timeout_seconds
                .unwrap_or(DEFAULT_TIMEOUT_SECONDS),
        };

        let environment = EnvironmentConfig {
            name: env_name.to_string(),
            database_path: Self::resolve_path(&database_path, base_dir),
            port,
        };

        let scoring = ScoringConfig {
            provider,
            api_url: lookup("SCORING_API_URL").or(section.scoring_api_url),
            api_key: lookup("SCORING_API_KEY").filter(|key| !key.is_empty()),
            timeout_seconds,
        };

        Ok(Self {
            environment,
            scoring,
        })
    }

    fn resolve_path(path: &Path, base_dir: &Path) -> PathBuf {
        if path.is_absolute() || path == Path::new(":memory:") {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Ensure the database parent directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            if !db_parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(db_parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", db_parent.display())
                })?;
            }
        }
        Ok(())
    }
}
