use std::sync::LazyLock;

use axum::{Json, extract::State, response::IntoResponse};
use bcrypt::{DEFAULT_COST, hash, verify};
use tracing::{info, warn};
use validator::Validate;

use crate::{
    features::admin::{
        repository::AdminRepository,
        schemas::{LoginIn, TokenOut},
    },
    services::database::Database,
    utilities::{
        config::Config,
        errors::AppError,
        jwt::{Claims, TokenType, create_token},
    },
};

/// Stand-in hash checked for unknown emails so both paths cost one bcrypt round.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash("realty-portal-unknown-admin", DEFAULT_COST).ok());

/// Runs the bcrypt check off the async workers. A missing hash never matches.
async fn password_matches(password: String, stored: Option<String>) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || -> Result<bool, AppError> {
        let known = stored.is_some();
        let Some(candidate) = stored.or_else(|| DUMMY_HASH.clone()) else {
            return Ok(false);
        };
        Ok(verify(password, &candidate)? && known)
    })
    .await
    .map_err(|e| AppError::InternalError(format!("password check failed, {e}")))?
}

pub async fn login_handler(
    State(database): State<Database>,
    State(config): State<Config>,
    Json(login_in): Json<LoginIn>,
) -> Result<impl IntoResponse, AppError> {
    login_in.validate()?;

    let admin = AdminRepository::get_by_email(&database.pool, &login_in.email).await?;
    let stored = admin.as_ref().map(|admin| admin.password_hash.clone());
    let matches = password_matches(login_in.password.clone(), stored).await?;

    let Some(admin) = admin else {
        warn!("login attempt for unknown admin {}", login_in.email);
        return Err(AppError::WrongCredentials);
    };
    if !matches {
        warn!("wrong password for admin {}", admin.id);
        return Err(AppError::WrongCredentials);
    }

    let access_token = create_token(&config, admin.id, TokenType::Access)?;
    info!("admin {} logged in", admin.id);

    Ok(Json(TokenOut {
        access_token,
        token_type: "Bearer",
        expires_in: config.access_token_expire_in_minute * 60,
    }))
}

pub async fn me_handler(
    claims: Claims,
    State(database): State<Database>,
) -> Result<impl IntoResponse, AppError> {
    let admin = AdminRepository::get_by_id(&database.pool, claims.sub).await?;

    Ok(Json(admin))
}
