//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. Extractor failures (malformed JSON, bad query parameters) are routed
//! through the same mapping as validation errors.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode, web};
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::ToSchema;

pub use crate::domain::ApiResult;
use crate::domain::{Error, ErrorCode};
use crate::inbound::http::schemas::ErrorCodeSchema;
use crate::middleware::RequestContext;

/// `chrono` format for error timestamps (`yyyy-MM-dd HH:mm:ss`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Message returned in place of internal error details.
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Message returned in place of backend availability details.
pub const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// JSON body returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable machine-readable error code.
    #[schema(value_type = ErrorCodeSchema)]
    pub error_code: ErrorCode,
    /// Human-readable message.
    #[schema(example = "Product not found with UUID: 3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub message: String,
    /// Field-level messages; omitted when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    /// When the error was produced, `yyyy-MM-dd HH:mm:ss` in UTC.
    #[schema(example = "2026-01-15 09:30:00")]
    pub timestamp: String,
    /// Request path that failed.
    #[schema(example = "/api/v1/products/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub path: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ProductNotFound => StatusCode::NOT_FOUND,
        ErrorCode::InsufficientStock | ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact(error: &Error) -> (String, Vec<String>) {
    match error.code() {
        ErrorCode::InternalServerError => (INTERNAL_MESSAGE.to_owned(), Vec::new()),
        ErrorCode::ServiceUnavailable => (UNAVAILABLE_MESSAGE.to_owned(), Vec::new()),
        _ => (error.message().to_owned(), error.details().to_vec()),
    }
}

impl ErrorBody {
    /// Build the client-facing body for `error` raised at `at` while serving
    /// `path`.
    pub fn from_error(error: &Error, path: impl Into<String>, at: DateTime<Utc>) -> Self {
        let (message, details) = redact(error);
        Self {
            error_code: error.code(),
            message,
            details,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            path: path.into(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let context = RequestContext::current();
        let path = context
            .as_ref()
            .map(|ctx| ctx.path().to_owned())
            .unwrap_or_default();
        let at = context
            .as_ref()
            .map_or_else(|| DefaultClock.utc(), RequestContext::now);
        let trace_id = context.map(|ctx| ctx.trace_id().to_string());

        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = %self.code(),
                message = self.message(),
                path = %path,
                trace_id = ?trace_id,
                "request failed"
            );
        } else {
            warn!(
                code = %self.code(),
                message = self.message(),
                details = ?self.details(),
                path = %path,
                trace_id = ?trace_id,
                "request rejected"
            );
        }

        HttpResponse::build(status).json(ErrorBody::from_error(self, path, at))
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::validation([format!("Malformed request body: {err}")]).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    Error::validation([format!("Invalid query parameters: {err}")]).into()
}

/// JSON extractor configuration reporting failures as validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor configuration reporting failures as validation errors.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}

#[cfg(test)]
mod tests;
