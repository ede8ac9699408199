// src/web/handlers/system_handlers.rs
use crate::scoring::ScoringGateway;
use crate::web::types::HealthResponse;

use rocket::serde::json::Json;
use rocket::State;
use tracing::debug;

pub async fn health_handler(gateway: &State<ScoringGateway>) -> Json<HealthResponse> {
    debug!("Health check");
    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        provider: gateway.provider_name().to_string(),
    })
}
