use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, User};
use crate::services::credentials;
use crate::state::AppState;

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub active: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            active: u.active,
        }
    }
}

// GET /api/users
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let users = {
        let db = state.db.lock().unwrap();
        queries::list_users(&db)?
    };
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// POST /api/users
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<CreateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        name: body.name.trim().to_string(),
        email: body.email.trim().to_lowercase(),
        password_digest: credentials::password_digest(&state.config.auth_secret, &body.password),
        role: body.role,
        active: true,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_user(&db, &user)?;
    }

    tracing::info!(email = %user.email, role = %user.role.as_str(), "user created");
    Ok(Json(user.into()))
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub active: Option<bool>,
}

// PUT /api/users/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let db = state.db.lock().unwrap();
    let mut user =
        queries::get_user(&db, &id)?.ok_or_else(|| AppError::NotFound(format!("user {id}")))?;

    if let Some(name) = body.name {
        user.name = name.trim().to_string();
    }
    if let Some(email) = body.email {
        user.email = email.trim().to_lowercase();
    }
    if let Some(password) = body.password {
        user.password_digest = credentials::password_digest(&state.config.auth_secret, &password);
    }
    if let Some(role) = body.role {
        // Takes effect at the next login; live sessions keep the role they
        // were issued with.
        user.role = role;
    }
    if let Some(active) = body.active {
        user.active = active;
    }

    queries::update_user(&db, &user)?;
    Ok(Json(user.into()))
}

// DELETE /api/users/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = super::require_role(&state, &headers, &[Role::Admin])?;

    if session.user_id == id {
        return Err(AppError::Conflict(
            "cannot delete the account you are logged in with".to_string(),
        ));
    }

    let removed = {
        let db = state.db.lock().unwrap();
        queries::delete_user(&db, &id)?
    };

    if removed {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("user {id}")))
    }
}
