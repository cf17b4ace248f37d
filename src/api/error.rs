use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    domain::{FieldError, ValidationErrors},
    services::{ServiceError, TokenError},
};

#[derive(Debug)]
pub struct ApiError {
    status_code: StatusCode,
    message: String,
    errors: Vec<FieldError>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody<'a> {
    status_code: u16,
    error: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "<[FieldError]>::is_empty")]
    errors: &'a [FieldError],
}

impl ApiError {
    pub fn public(status_code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::public(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::public(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    pub fn internal() -> Self {
        Self::public(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }

    pub fn status_code(&self) -> StatusCode {
        self.status_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        tracing::debug!(error = %errors, "request validation failed");
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message: "Validation failed".to_string(),
            errors: errors.errors().to_vec(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::NotFound(message) => Self::public(StatusCode::NOT_FOUND, message),
            ServiceError::AuthError => Self::public(StatusCode::UNAUTHORIZED, "Invalid credentials"),
            ServiceError::AlreadyExists(message) => Self::public(StatusCode::CONFLICT, message),
            e => {
                tracing::error!(error = %e, "service error");
                Self::internal()
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(error: TokenError) -> Self {
        tracing::debug!(error = %error, "rejected bearer token");
        Self::unauthorized()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            status_code: self.status_code.as_u16(),
            error: self.status_code.canonical_reason().unwrap_or("Error"),
            message: &self.message,
            errors: &self.errors,
        };

        (self.status_code, Json(body)).into_response()
    }
}
