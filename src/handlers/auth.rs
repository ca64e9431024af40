use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{PasswordReset, Role};
use crate::services::credentials;
use crate::session::Session;
use crate::state::AppState;

/// How long a password reset token stays redeemable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserPayload,
}

#[derive(Serialize)]
pub struct UserPayload {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, body.email.trim())?
    };

    let user = match user {
        Some(u) if u.active => u,
        // Same response for unknown email, wrong password and disabled
        // account, so login probing learns nothing.
        _ => return Err(AppError::Unauthorized),
    };

    if !credentials::verify_password(&state.config.auth_secret, &body.password, &user.password_digest)
    {
        return Err(AppError::Unauthorized);
    }

    let token = uuid::Uuid::new_v4().to_string();
    state.sessions.insert(Session {
        token: token.clone(),
        user_id: user.id.clone(),
        role: user.role,
    });

    tracing::info!(user = %user.email, role = %user.role.as_str(), "login");

    Ok(Json(LoginResponse {
        token,
        user: UserPayload {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        },
    }))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    state.sessions.remove(&session.token);
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

// POST /api/auth/forgot-password — issues a one-shot reset token. Delivery to
// the account owner happens out of band; this only mints and stores it.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user_by_email(&db, body.email.trim())?
    };

    if let Some(user) = user.filter(|u| u.active) {
        let reset = PasswordReset {
            token: uuid::Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            expires_at: Utc::now().naive_utc() + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        };
        {
            let db = state.db.lock().unwrap();
            queries::delete_password_resets_for_user(&db, &user.id)?;
            queries::create_password_reset(&db, &reset)?;
        }
        tracing::info!(user = %user.email, "password reset token issued");
    }

    // Same answer whether or not the address matches an account.
    Ok(Json(serde_json::json!({ "ok": true })))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub password: String,
}

// PATCH /api/auth/reset-password/:token
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let db = state.db.lock().unwrap();

    let reset = queries::get_password_reset(&db, &token)?.ok_or(AppError::Unauthorized)?;
    if reset.expires_at <= Utc::now().naive_utc() {
        queries::delete_password_reset(&db, &token)?;
        return Err(AppError::Unauthorized);
    }

    let mut user =
        queries::get_user(&db, &reset.user_id)?.ok_or(AppError::Unauthorized)?;
    user.password_digest = credentials::password_digest(&state.config.auth_secret, &body.password);
    queries::update_user(&db, &user)?;
    queries::delete_password_reset(&db, &token)?;

    tracing::info!(user = %user.email, "password reset");
    Ok(Json(serde_json::json!({ "ok": true })))
}

// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<UserPayload>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let user = {
        let db = state.db.lock().unwrap();
        queries::get_user(&db, &session.user_id)?
    };
    let user = user.ok_or_else(|| AppError::NotFound("user".to_string()))?;
    Ok(Json(UserPayload {
        id: user.id,
        name: user.name,
        email: user.email,
        role: user.role,
    }))
}
