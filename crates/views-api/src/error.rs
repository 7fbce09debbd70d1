use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use views_types::api::{ErrorBody, ValidationError};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,

    #[error("invalid bearer token")]
    InvalidToken,
}

/// Every failure a request can end in. The `Display` text is for the log;
/// clients only ever see [`ApiError::public_message`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("uniqueness violation")]
    Conflict,

    #[error("resource not found")]
    NotFound,

    #[error("credentials did not verify")]
    Credential,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("denied by authorization policy")]
    Forbidden,

    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn internal(context: &str, err: impl std::fmt::Display) -> Self {
        Self::Internal(format!("{}: {}", context, err))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Credential => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::Conflict => "resource already exists".into(),
            Self::NotFound => "not found".into(),
            // Same text whichever half of the pair was wrong.
            Self::Credential => "invalid username or password".into(),
            Self::Auth(_) => "unauthorized".into(),
            Self::Forbidden => "forbidden".into(),
            Self::Internal(_) => "internal server error".into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed ({}): {}", status, self);
        } else {
            warn!("Request rejected ({}): {}", status, self);
        }

        (
            status,
            Json(ErrorBody {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_detail_stays_out_of_the_body() {
        let err = ApiError::internal("creating account", "UNIQUE constraint failed: accounts.email");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.public_message().contains("accounts"));
        assert!(err.to_string().contains("accounts.email"));
    }

    #[test]
    fn taxonomy_status_codes() {
        assert_eq!(ApiError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Credential.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(AuthError::MissingToken).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
    }
}
