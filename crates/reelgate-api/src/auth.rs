use std::fmt::Display;
use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info, warn};

use reelgate_types::api::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};

use crate::credentials::{CredentialError, CredentialStore};
use crate::error::ApiError;
use crate::library::VideoLibrary;
use crate::token::TokenKeys;

/// Longest accepted username, in bytes.
pub const MAX_USERNAME_LEN: usize = 64;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub credentials: CredentialStore,
    pub tokens: TokenKeys,
    pub library: VideoLibrary,
    /// Echo raw internal error text to clients in the `error` field.
    pub expose_errors: bool,
}

impl AppStateInner {
    /// Log `err` and turn it into a 500. The cause only reaches the client
    /// when `expose_errors` is set.
    pub fn internal(&self, message: &'static str, err: impl Display) -> ApiError {
        error!("{}: {}", message, err);
        let detail = if self.expose_errors {
            err.to_string()
        } else {
            "internal error".to_string()
        };
        ApiError::Internal { message, detail }
    }
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    validate_credentials(&req.username, &req.password)?;

    let username = req.username.clone();

    // Hashing and the insert both block
    let store = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.credentials.register(&req.username, &req.password)
    })
    .await
    .map_err(|e| state.internal("Error creating user", e))?;

    match result {
        Ok(user_id) => {
            info!("Registered user {} ({})", username, user_id);
            Ok((
                StatusCode::CREATED,
                Json(MessageResponse::new("User created successfully")),
            ))
        }
        Err(CredentialError::DuplicateUsername) => {
            warn!("Registration rejected, username taken: {}", username);
            Err(ApiError::Conflict)
        }
        Err(e) => Err(state.internal("Error creating user", e)),
    }
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let username = req.username.clone();

    let store = state.clone();
    let result = tokio::task::spawn_blocking(move || {
        store.credentials.verify(&req.username, &req.password)
    })
    .await
    .map_err(|e| state.internal("Error during login", e))?;

    let user = match result {
        Ok(user) => user,
        // Unknown user and wrong password look the same to the caller
        Err(CredentialError::NotFound | CredentialError::Mismatch) => {
            warn!("Failed login for {}", username);
            return Err(ApiError::InvalidCredentials);
        }
        Err(e) => return Err(state.internal("Error during login", e)),
    };

    let token = state
        .tokens
        .issue(user.id, &user.username)
        .map_err(|e| state.internal("Error during login", e))?;

    info!("User {} logged in", user.username);
    Ok(Json(LoginResponse { token }))
}

fn validate_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::Validation("Username is required".into()));
    }
    if username.len() > MAX_USERNAME_LEN {
        return Err(ApiError::Validation(format!(
            "Username must be at most {} bytes",
            MAX_USERNAME_LEN
        )));
    }
    if password.is_empty() {
        return Err(ApiError::Validation("Password is required".into()));
    }
    Ok(())
}
