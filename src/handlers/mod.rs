pub mod appointments;
pub mod auth;
pub mod calendar;
pub mod health;
pub mod menu;
pub mod users;
pub mod vehicles;

use axum::http::HeaderMap;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::access;
use crate::session::Session;
use crate::state::AppState;

/// Resolve the bearer token to a session snapshot. Every gated handler calls
/// this first; no token or an unknown token is a hard 401.
pub fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, AppError> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let token = auth.strip_prefix("Bearer ").unwrap_or("");
    state.sessions.get(token).ok_or(AppError::Unauthorized)
}

/// Authenticate and additionally require one of `required` roles.
pub fn require_role(
    state: &AppState,
    headers: &HeaderMap,
    required: &[Role],
) -> Result<Session, AppError> {
    let session = authenticate(state, headers)?;
    if !access::is_allowed(Some(session.role), required) {
        return Err(AppError::Forbidden);
    }
    Ok(session)
}
