pub mod config;
pub mod database;
pub mod records_cli;
pub mod scoring;
pub mod web;

pub use config::ConfigManager;
pub use scoring::{HeuristicScorer, Provenance, ScoreResult, ScoringGateway, ScoringInput};
pub use web::start_web_server;
