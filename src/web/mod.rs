// src/web/mod.rs

pub mod error;
pub mod handlers;
pub mod types;

pub use error::ApiError;
pub use types::*;

use crate::database::DatabaseConfig;
use crate::scoring::{ScoringGateway, ScoringInput};
use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::figment::Figment;
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

#[post("/score", data = "<request>")]
pub async fn score_candidate(
    request: Json<ScoringInput>,
    gateway: &State<ScoringGateway>,
) -> Json<ScoreResponse> {
    handlers::score_candidate_handler(request, gateway).await
}

#[post("/resume/score", data = "<request>")]
pub async fn score_resume(
    request: Json<ScoringInput>,
    gateway: &State<ScoringGateway>,
) -> Json<ScoreResponse> {
    handlers::score_candidate_handler(request, gateway).await
}

#[post("/applications/score", data = "<request>")]
pub async fn score_application(
    request: Json<ApplicationScoreRequest>,
    gateway: &State<ScoringGateway>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ScoreResponse>, ApiError> {
    handlers::score_application_handler(request, gateway, db_config).await
}

#[post("/gigs/match", data = "<request>")]
pub async fn match_gig(
    request: Json<GigMatchRequest>,
    gateway: &State<ScoringGateway>,
    db_config: &State<DatabaseConfig>,
) -> Result<Json<ScoreResponse>, ApiError> {
    handlers::match_gig_handler(request, gateway, db_config).await
}

#[get("/health")]
pub async fn health(gateway: &State<ScoringGateway>) -> Json<HealthResponse> {
    handlers::health_handler(gateway).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("bad_request"))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<ErrorBody> {
    Json(ErrorBody::new("not_found"))
}

#[rocket::catch(422)]
pub fn invalid_request() -> Json<ErrorBody> {
    Json(ErrorBody::new("invalid_request"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorBody> {
    Json(ErrorBody::new("internal_error"))
}

/// Assemble the application with its managed state.
pub fn build_rocket(
    figment: Figment,
    db_config: DatabaseConfig,
    gateway: ScoringGateway,
) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(Cors)
        .manage(db_config)
        .manage(gateway)
        .register(
            "/api",
            catchers![bad_request, not_found, invalid_request, internal_error],
        )
        .mount(
            "/api",
            routes![
                score_candidate,
                score_resume,
                score_application,
                match_gig,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(
    db_config: DatabaseConfig,
    gateway: ScoringGateway,
    port: u16,
) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("address", "0.0.0.0"))
        .merge(("port", port));

    info!("Starting gig scorer API server on port {}", port);
    info!("Database: {}", db_config.database_path.display());
    info!("Scoring provider: {}", gateway.provider_name());

    let rocket = build_rocket(figment, db_config, gateway)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Rocket server failed: {}", e))?;

    if let Some(db_config) = rocket.state::<DatabaseConfig>() {
        db_config.close().await;
    }

    Ok(())
}
