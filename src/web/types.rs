// src/web/types.rs
use crate::scoring::{ScoreResult, ScoringInput};
use rocket::serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ApplicationScoreRequest {
    #[serde(default)]
    pub application_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct GigMatchRequest {
    #[serde(default)]
    pub gig_id: Option<String>,
    #[serde(flatten)]
    pub candidate: ScoringInput,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde", rename_all = "camelCase")]
pub struct ScoreResponse {
    pub success: bool,
    pub score: ScoreResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gig_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persisted: Option<bool>,
}

impl ScoreResponse {
    pub fn success(score: ScoreResult) -> Self {
        Self {
            success: true,
            score,
            application_id: None,
            gig_id: None,
            persisted: None,
        }
    }

    pub fn with_application(mut self, application_id: String, persisted: bool) -> Self {
        self.application_id = Some(application_id);
        self.persisted = Some(persisted);
        self
    }

    pub fn with_gig(mut self, gig_id: String) -> Self {
        self.gig_id = Some(gig_id);
        self
    }
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub provider: String,
}

#[derive(Debug, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
