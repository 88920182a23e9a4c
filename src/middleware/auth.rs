use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::conversation::KEY_SEPARATOR;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's user id.
    pub sub: String,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`]. There is no anonymous fallback; a request either
/// carries a valid identity or is rejected.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
}

/// Validate an HS256 bearer token and extract its claims.
pub fn verify_jwt(secret: &str, token: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

fn user_from_claims(claims: Claims) -> Result<CurrentUser, AppError> {
    if claims.sub.trim().is_empty() || claims.sub.contains(KEY_SEPARATOR) {
        return Err(AppError::BadRequest("invalid user id in token".into()));
    }
    Ok(CurrentUser { id: claims.sub })
}

/// Middleware guarding the API surface: extract the bearer token, validate
/// it, and stash the caller identity for the handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(AppError::Unauthorized)?;

    let claims = verify_jwt(&state.config.jwt_secret, token)?;
    let user = user_from_claims(claims)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Token check for websocket upgrades, which may carry the token as a query
/// parameter instead of a header.
pub fn authenticate_ws(
    secret: &str,
    query_token: Option<&str>,
    headers: &axum::http::HeaderMap,
) -> Result<CurrentUser, AppError> {
    let token = query_token
        .map(|t| t.to_string())
        .or_else(|| {
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
                .map(|s| s.to_string())
        })
        .ok_or(AppError::Unauthorized)?;

    user_from_claims(verify_jwt(secret, &token)?)
}
