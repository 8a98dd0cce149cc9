use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Environment variable {0} is not set")]
    EnvironmentVariableNotSetError(String),
    #[error("File read error, {0}")]
    FileReadError(String),
    #[error("Database connection error")]
    DatabaseConnectionError,
    #[error("Failed to delete {resource} with ID {id}")]
    DatabaseDeleteError { resource: String, id: String },
    #[error("Sqlx error: {0}")]
    SqlxError(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Object storage error: {0}")]
    ObjectStorageError(#[from] object_store::Error),
    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),
    #[error("jsonwebtoken error")]
    JsonWebTokenError(#[from] jsonwebtoken::errors::Error),
    #[error("Token creation error")]
    TokenCreationError,
    #[error("Missing access token error")]
    MissingAccessToken,
    #[error("{0} token required")]
    Unauthorized(String),
    #[error("Wrong credentials")]
    WrongCredentials,
    #[error("Invalid form data, {0}")]
    InvalidFormData(String),
    #[error("Invalid image format error")]
    InvalidImageFormatError(String),
    #[error("Validation errors, {0}")]
    ValidatorValidationErrors(#[from] validator::ValidationErrors),
    #[error("Serde json error")]
    SerdejsonError(#[from] serde_json::Error),
    #[error("{0}")]
    NotFoundError(String),
    #[error("Internal error, {0}")]
    InternalError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::DatabaseDeleteError { .. }
            | Self::SerdejsonError(_)
            | Self::InvalidFormData(_)
            | Self::InvalidImageFormatError(_)
            | Self::ValidatorValidationErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::MissingAccessToken
            | Self::Unauthorized(_)
            | Self::WrongCredentials
            | Self::JsonWebTokenError(_) => StatusCode::UNAUTHORIZED,
            Self::NotFoundError(_) => StatusCode::NOT_FOUND,
            Self::EnvironmentVariableNotSetError(_)
            | Self::FileReadError(_)
            | Self::DatabaseConnectionError
            | Self::SqlxError(_)
            | Self::MigrateError(_)
            | Self::ObjectStorageError(_)
            | Self::BcryptError(_)
            | Self::TokenCreationError
            | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_message = match self {
            Self::SqlxError(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            Self::MissingAccessToken => "Missing access token".to_string(),
            Self::WrongCredentials => "Wrong credentials".to_string(),
            Self::InvalidImageFormatError(e) => e,
            Self::NotFoundError(e) => e,
            Self::JsonWebTokenError(e) => e.to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!("{status}: {error_message}");
        }

        let body = Json(json!({"error": error_message}));

        (status, body).into_response()
    }
}
