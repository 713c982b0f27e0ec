//! Request-level error type shared by REST handlers and GraphQL resolvers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use juniper::{FieldError, IntoFieldError, Object, ScalarValue, Value};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use super::auth::AuthError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    TooManyRequests(String),

    #[error("Upstream service failed: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::TooManyRequests(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION",
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            AppError::Upstream(_) => "UPSTREAM",
            AppError::Database(_) | AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to return to clients. Internal details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn log_if_internal(&self) {
        if self.status().is_server_error() {
            error!(error = %self, code = self.code(), "Request failed");
        }
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthenticationRequired | AuthError::InvalidToken => AppError::Unauthenticated,
            AuthError::PermissionDenied(msg) => AppError::Forbidden(msg),
            AuthError::RoleRequired(role) => {
                AppError::Forbidden(format!("{} access required", role.label()))
            }
            AuthError::Suspended => AppError::Forbidden("Account is suspended".to_string()),
            AuthError::DatabaseError(e) => AppError::Database(e),
            AuthError::InternalError(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log_if_internal();
        let body = json!({
            "error": self.public_message(),
            "code": self.code(),
        });
        (self.status(), Json(body)).into_response()
    }
}

impl AppError {
    /// GraphQL error carrying the same `code` as the REST body, under
    /// `extensions.code`.
    pub fn into_field_error<S: ScalarValue>(self) -> FieldError<S> {
        self.log_if_internal();
        let mut extensions = Object::with_capacity(1);
        extensions.add_field("code", Value::scalar(self.code().to_string()));
        FieldError::new(self.public_message(), Value::Object(extensions))
    }
}

impl<S: ScalarValue> IntoFieldError<S> for AppError {
    fn into_field_error(self) -> FieldError<S> {
        AppError::into_field_error(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::profiles::models::Role;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::forbidden("no").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("Booking").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::Internal(anyhow::anyhow!("connection refused at 10.0.0.3"));
        assert_eq!(err.public_message(), "Internal server error");
        assert_eq!(AppError::NotFound("Booking").public_message(), "Booking not found");
    }

    #[test]
    fn test_role_required_maps_to_forbidden() {
        let err: AppError = AuthError::RoleRequired(Role::Admin).into();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "Admin access required");
    }

    fn extension_code(err: &FieldError<juniper::DefaultScalarValue>) -> Option<String> {
        err.extensions()
            .as_object_value()
            .and_then(|o| o.get_field_value("code"))
            .and_then(|v| v.as_string_value())
            .map(str::to_string)
    }

    #[test]
    fn test_field_error_carries_code() {
        let err: FieldError = AppError::forbidden("Admin access required").into_field_error();
        assert_eq!(err.message(), "Admin access required");
        assert_eq!(extension_code(&err).as_deref(), Some("FORBIDDEN"));

        let err: FieldError = IntoFieldError::into_field_error(AppError::Conflict("taken".into()));
        assert_eq!(extension_code(&err).as_deref(), Some("CONFLICT"));
    }

    #[test]
    fn test_field_error_hides_internal_detail() {
        let err: FieldError =
            AppError::Internal(anyhow::anyhow!("pool timed out")).into_field_error();
        assert_eq!(err.message(), "Internal server error");
        assert_eq!(extension_code(&err).as_deref(), Some("INTERNAL"));
    }
}
