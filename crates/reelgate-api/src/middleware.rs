use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::token::TokenError;

/// Extract and validate the bearer token, then attach its claims to the
/// request. No header or a malformed one is 401; a token that fails
/// verification is 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())?;

    let claims = state.tokens.verify(token).map_err(|e| {
        debug!("Rejected token for {} {}: {}", req.method(), req.uri().path(), e);
        match e {
            TokenError::Expired => ApiError::ExpiredToken,
            TokenError::Invalid(_) => ApiError::InvalidToken,
        }
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// The token part of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(ApiError::MissingToken)?
        .to_str()
        .map_err(|_| ApiError::MissingToken)?;

    let (scheme, token) = value.split_once(' ').ok_or(ApiError::MissingToken)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(ApiError::MissingToken);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }
    Ok(token)
}
