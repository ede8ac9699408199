// src/web/handlers/score_handlers.rs
use crate::database::{ApplicationRepository, DatabaseConfig, GigRepository};
use crate::scoring::{ScoringGateway, ScoringInput};
use crate::web::error::{required, ApiError};
use crate::web::types::{ApplicationScoreRequest, GigMatchRequest, ScoreResponse};

use rocket::serde::json::Json;
use rocket::State;
use tracing::{info, warn};

pub async fn score_candidate_handler(
    request: Json<ScoringInput>,
    gateway: &State<ScoringGateway>,
) -> Json<ScoreResponse> {
    let input = request.into_inner();
    let score = gateway.compute_score(&input).await;

    info!(
        "Scored candidate: overall {} ({} skills, {} links, note {})",
        score.overall_score,
        input.skills.len(),
        input.portfolio_links.len(),
        score.note
    );

    Json(ScoreResponse::success(score))
}

pub async fn score_application_handler(
    request: Json<ApplicationScoreRequest>,
    gateway: &State<ScoringGateway>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let application_id = required(request.application_id.as_deref(), "applicationId")?;

    let pool = db_config.pool()?;
    let applications = ApplicationRepository::new(pool);

    let application = applications
        .find_by_id(application_id)
        .await?
        .ok_or(ApiError::NotFound("application"))?;

    let job_description = match &application.gig_id {
        Some(gig_id) => GigRepository::new(pool)
            .find_by_id(gig_id)
            .await?
            .map(|gig| gig.description),
        None => None,
    };

    let input = application.scoring_input(job_description);
    let score = gateway.compute_score(&input).await;

    // Best effort: the computed score is returned even if the write fails.
    let persisted = match applications
        .update_score(application_id, score.overall_score)
        .await
    {
        Ok(true) => true,
        Ok(false) => {
            warn!(
                "Application {} vanished before its score could be saved",
                application_id
            );
            false
        }
        Err(e) => {
            warn!(
                "Failed to persist score for application {}: {:#}",
                application_id, e
            );
            false
        }
    };

    info!(
        "Scored application {}: overall {} (persisted: {})",
        application_id, score.overall_score, persisted
    );

    Ok(Json(
        ScoreResponse::success(score).with_application(application_id.to_string(), persisted),
    ))
}

pub async fn match_gig_handler(
    request: Json<GigMatchRequest>,
    gateway: &State<ScoringGateway>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ScoreResponse>, ApiError> {
    let request = request.into_inner();
    let gig_id = required(request.gig_id.as_deref(), "gigId")?.to_string();

    let pool = db_config.pool()?;
    let gig = GigRepository::new(pool)
        .find_by_id(&gig_id)
        .await?
        .ok_or(ApiError::NotFound("gig"))?;

    let input = request.candidate.with_job_description(Some(gig.description));
    let score = gateway.compute_score(&input).await;

    info!(
        "Matched candidate against gig {} ({}): overall {}",
        gig_id, gig.title, score.overall_score
    );

    Ok(Json(ScoreResponse::success(score).with_gig(gig_id)))
}
