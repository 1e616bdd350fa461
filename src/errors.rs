use actix_web::HttpResponse;
use thiserror::Error;

use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Order creation failed")]
    OrderCreationFailed(String),

    #[error("Dataset too large")]
    DatasetTooLarge { total: i64, ceiling: i64 },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Unauthenticated => AppError::Unauthenticated,
            DomainError::InvalidRequest(msg) => AppError::InvalidRequest(msg),
            DomainError::NotFound => AppError::NotFound,
            DomainError::OrderCreationFailed(msg) => AppError::OrderCreationFailed(msg),
            DomainError::DatasetTooLarge { total, ceiling } => {
                AppError::DatasetTooLarge { total, ceiling }
            }
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl actix_web::ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthenticated => HttpResponse::Unauthorized().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::Forbidden => HttpResponse::Forbidden().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::InvalidRequest(_) => HttpResponse::BadRequest().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::NotFound => HttpResponse::NotFound().json(serde_json::json!({
                "error": self.to_string()
            })),
            AppError::OrderCreationFailed(msg) => {
                log::error!("order creation failed: {msg}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Order creation failed"
                }))
            }
            AppError::DatasetTooLarge { total, ceiling } => {
                HttpResponse::PayloadTooLarge().json(serde_json::json!({
                    "error": "Dataset too large",
                    "message": format!(
                        "Dataset contains {total} records, which exceeds the export limit of {ceiling}"
                    ),
                    "total": total
                }))
            }
            AppError::Internal(msg) => {
                log::error!("internal error: {msg}");
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "error": "Internal server error"
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    use super::*;

    #[test]
    fn unauthenticated_returns_401() {
        assert_eq!(
            AppError::Unauthenticated.error_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn forbidden_returns_403() {
        assert_eq!(
            AppError::Forbidden.error_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn invalid_request_returns_400() {
        let err = AppError::InvalidRequest("cart is empty".to_string());
        assert_eq!(err.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_returns_404() {
        assert_eq!(
            AppError::NotFound.error_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn dataset_too_large_returns_413() {
        let err = AppError::DatasetTooLarge {
            total: 10_001,
            ceiling: 10_000,
        };
        assert_eq!(err.error_response().status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn order_creation_failure_returns_500() {
        let err = AppError::OrderCreationFailed("tx aborted".to_string());
        assert_eq!(
            err.error_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn domain_errors_map_onto_their_app_variants() {
        assert!(matches!(
            AppError::from(DomainError::Unauthenticated),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from(DomainError::NotFound),
            AppError::NotFound
        ));
        assert!(matches!(
            AppError::from(DomainError::DatasetTooLarge {
                total: 5,
                ceiling: 4
            }),
            AppError::DatasetTooLarge { total: 5, ceiling: 4 }
        ));
        assert!(matches!(
            AppError::from(DomainError::Internal("oops".to_string())),
            AppError::Internal(_)
        ));
    }
}
