use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Role, Vehicle};
use crate::state::AppState;

// Vehicle records are admin territory; regular users only reference them
// from appointment forms.

// GET /api/vehicles
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    super::authenticate(&state, &headers)?;

    let vehicles = {
        let db = state.db.lock().unwrap();
        queries::list_vehicles(&db)?
    };
    Ok(Json(vehicles))
}

#[derive(Deserialize)]
pub struct VehicleRequest {
    pub plate: String,
    pub model: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

// POST /api/vehicles
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<VehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let vehicle = Vehicle {
        id: uuid::Uuid::new_v4().to_string(),
        plate: body.plate.trim().to_string(),
        model: body.model.trim().to_string(),
        active: body.active,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_vehicle(&db, &vehicle)?;
    }

    tracing::info!(plate = %vehicle.plate, "vehicle registered");
    Ok(Json(vehicle))
}

// PUT /api/vehicles/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<VehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let db = state.db.lock().unwrap();
    let mut vehicle = queries::get_vehicle(&db, &id)?
        .ok_or_else(|| AppError::NotFound(format!("vehicle {id}")))?;

    vehicle.plate = body.plate.trim().to_string();
    vehicle.model = body.model.trim().to_string();
    vehicle.active = body.active;
    queries::update_vehicle(&db, &vehicle)?;

    Ok(Json(vehicle))
}

// DELETE /api/vehicles/:id
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    super::require_role(&state, &headers, &[Role::Admin])?;

    let removed = {
        let db = state.db.lock().unwrap();
        queries::delete_vehicle(&db, &id)?
    };

    if removed {
        Ok(Json(serde_json::json!({ "ok": true })))
    } else {
        Err(AppError::NotFound(format!("vehicle {id}")))
    }
}
