// src/web/error.rs
//! Handler error taxonomy and its JSON rendering.

use crate::web::types::ErrorBody;
use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::{Request, Response};
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    /// A required request field is absent or blank.
    Validation(&'static str),
    /// A referenced record does not exist.
    NotFound(&'static str),
    /// Anything else. The cause is logged, never returned.
    Internal(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Validation(_) => Status::BadRequest,
            ApiError::NotFound(_) => Status::NotFound,
            ApiError::Internal(_) => Status::InternalServerError,
        }
    }

    pub fn code(&self) -> String {
        match self {
            ApiError::Validation(field) => format!("{} required", field),
            ApiError::NotFound(entity) => format!("{}_not_found", entity),
            ApiError::Internal(_) => "internal_error".to_string(),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Internal(e)
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        if let ApiError::Internal(e) = &self {
            error!("Unhandled error on {}: {:#}", request.uri(), e);
        }

        let status = self.status();
        let body = Json(ErrorBody::new(self.code())).respond_to(request)?;

        Response::build_from(body).status(status).ok()
    }
}

/// Return the trimmed value of a required identifier, or a validation error.
pub fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(field)),
    }
}
