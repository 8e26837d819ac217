use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use gateway_engine::StoreError;
use log::error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("The requested endpoint does not exist")]
    NotFound,
    #[error("The origin policy for this server does not allow access from the specified origin")]
    OriginNotAllowed,
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("{0}")]
    AuthenticationError(#[from] AuthError),
}

impl ServerError {
    /// The stable, machine-readable code carried in the `error` field of every error response. Clients
    /// branch on this (e.g. to trigger a re-login on `Token expired`), so the values never change.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationError(AuthError::CredentialExpired) => "Token expired",
            Self::AuthenticationError(_) => "Unauthorized",
            Self::BadRequest(_) => "Bad request",
            Self::NotFound => "Not found",
            Self::OriginNotAllowed => "Forbidden",
            _ => "Internal server error",
        }
    }
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::OriginNotAllowed => StatusCode::FORBIDDEN,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💥️ {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.error_code(), "message": self.to_string() }).to_string())
    }
}

/// The authentication failure taxonomy. `CredentialExpired` is kept distinct from the other failures so
/// that clients can prompt for re-authentication instead of treating the denial as permanent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("No token provided or invalid format. Expected: Bearer <token>")]
    MalformedCredential,
    #[error("Your session has expired. Please sign in again.")]
    CredentialExpired,
    #[error("Invalid token")]
    CredentialInvalid,
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        ServerError::BackendError(e.to_string())
    }
}
