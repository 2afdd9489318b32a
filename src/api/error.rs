use actix_web::{HttpResponse, ResponseError};
use std::fmt;
use tracing::{error, warn};

use crate::api::validation::ErrorResponse;

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Database operation failed
    DatabaseError(sqlx::Error),

    /// Validation failed
    ValidationError(String),

    /// Job not found (or owned by another user, which looks the same)
    NotFound(i64),

    /// Caller is not authenticated or presented bad credentials
    Unauthorized(String),

    /// Demo identity attempted a mutation
    ReadOnly,

    /// Caller exceeded the request budget for a rate-limited endpoint
    RateLimited,

    /// Internal failure outside the database, e.g. a blocking task
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::DatabaseError(e) => write!(f, "Database error: {}", e),
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::NotFound(id) => write!(f, "Job not found: {}", id),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::ReadOnly => write!(f, "Read-only user attempted a mutation"),
            ServiceError::RateLimited => write!(f, "Rate limit exceeded"),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::DatabaseError(e) => {
                error!("Database error: {}", e);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Database error occurred"}),
                })
            }
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::NotFound(id) => {
                warn!("Job not found: {}", id);
                HttpResponse::NotFound().json(ErrorResponse {
                    error: "Not found".to_string(),
                    fields: serde_json::json!({"message": format!("No job with id {}", id)}),
                })
            }
            ServiceError::Unauthorized(msg) => {
                warn!("Authentication failed: {}", msg);
                HttpResponse::Unauthorized().json(ErrorResponse {
                    error: "Authentication failed".to_string(),
                    fields: serde_json::json!({"message": msg}),
                })
            }
            ServiceError::ReadOnly => {
                warn!("Read-only user attempted a mutation");
                HttpResponse::BadRequest().json(ErrorResponse {
                    error: "Read-only user".to_string(),
                    fields: serde_json::json!({"message": "Test user, read-only"}),
                })
            }
            ServiceError::RateLimited => {
                warn!("Rate limit exceeded");
                HttpResponse::TooManyRequests().json(ErrorResponse {
                    error: "Too many requests".to_string(),
                    fields: serde_json::json!({"message": "too many requests, please try after 15 min"}),
                })
            }
            ServiceError::Internal(msg) => {
                error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: "Failed to process request".to_string(),
                    fields: serde_json::json!({"message": "Internal error occurred"}),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn variants_map_to_expected_status_codes() {
        assert_eq!(
            ServiceError::NotFound(1).error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::ValidationError("bad".into())
                .error_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unauthorized("no token".into())
                .error_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServiceError::ReadOnly.error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::RateLimited.error_response().status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ServiceError::Internal("oops".into()).error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[actix_web::test]
    async fn not_found_body_names_the_job_id() {
        let response = ServiceError::NotFound(42).error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fields"]["message"], "No job with id 42");
    }

    #[actix_web::test]
    async fn read_only_body_carries_the_demo_message() {
        let response = ServiceError::ReadOnly.error_response();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["fields"]["message"], "Test user, read-only");
    }
}
