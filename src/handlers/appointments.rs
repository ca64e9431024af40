use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Role};
use crate::services::scheduling::{self, AppointmentDraft};
use crate::session::Session;
use crate::state::AppState;

fn can_touch(session: &Session, apt: &Appointment) -> bool {
    session.role == Role::Admin || apt.owner_ref == session.user_id
}

fn load_owned(
    state: &AppState,
    session: &Session,
    id: &str,
) -> Result<Appointment, AppError> {
    let apt = {
        let db = state.db.lock().unwrap();
        queries::get_appointment(&db, id)?
    };
    let apt = apt.ok_or_else(|| AppError::NotFound(format!("appointment {id}")))?;
    if !can_touch(session, &apt) {
        return Err(AppError::Forbidden);
    }
    Ok(apt)
}

// GET /api/appointments — admins see the whole fleet, users their own
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let session = super::authenticate(&state, &headers)?;

    let appointments = {
        let db = state.db.lock().unwrap();
        match session.role {
            Role::Admin => queries::list_appointments(&db)?,
            Role::User => queries::list_appointments_for_owner(&db, &session.user_id)?,
        }
    };

    Ok(Json(appointments))
}

// POST /api/appointments
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Appointment>, AppError> {
    let session = super::authenticate(&state, &headers)?;

    let now = Utc::now().naive_utc();
    let errors = scheduling::validate(&draft, now);
    let (departure_at, return_at) = match (draft.departure_at, draft.return_at) {
        (Some(departure), Some(ret)) if errors.is_empty() => (departure, ret),
        _ => return Err(AppError::Validation(errors)),
    };

    let apt = Appointment {
        id: uuid::Uuid::new_v4().to_string(),
        vehicle_ref: draft.vehicle_ref.trim().to_string(),
        departure_at,
        return_at,
        destination: draft.destination.trim().to_string(),
        reason: draft.reason.trim().to_string(),
        status: AppointmentStatus::Scheduled,
        owner_ref: session.user_id.clone(),
        completion_note: None,
        created_at: now,
        updated_at: now,
    };

    {
        let db = state.db.lock().unwrap();
        queries::create_appointment(&db, &apt)?;
    }

    tracing::info!(id = %apt.id, vehicle = %apt.vehicle_ref, "appointment created");
    Ok(Json(apt))
}

// PUT /api/appointments/:id — editable only while still scheduled
pub async fn update(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<AppointmentDraft>,
) -> Result<Json<Appointment>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let mut apt = load_owned(&state, &session, &id)?;

    if apt.status != AppointmentStatus::Scheduled {
        return Err(AppError::Conflict(format!(
            "appointment is {}, only scheduled appointments can be edited",
            apt.status.as_str()
        )));
    }

    let now = Utc::now().naive_utc();
    let errors = scheduling::validate(&draft, now);
    let (departure_at, return_at) = match (draft.departure_at, draft.return_at) {
        (Some(departure), Some(ret)) if errors.is_empty() => (departure, ret),
        _ => return Err(AppError::Validation(errors)),
    };

    apt.vehicle_ref = draft.vehicle_ref.trim().to_string();
    apt.departure_at = departure_at;
    apt.return_at = return_at;
    apt.destination = draft.destination.trim().to_string();
    apt.reason = draft.reason.trim().to_string();
    apt.updated_at = now;

    {
        let db = state.db.lock().unwrap();
        queries::save_appointment(&db, &apt)?;
    }

    Ok(Json(apt))
}

// POST /api/appointments/:id/start
pub async fn start(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let mut apt = load_owned(&state, &session, &id)?;

    apt.start()?;
    apt.updated_at = Utc::now().naive_utc();

    {
        let db = state.db.lock().unwrap();
        queries::save_appointment(&db, &apt)?;
    }

    tracing::info!(id = %apt.id, "appointment started");
    Ok(Json(apt))
}

#[derive(Deserialize, Default)]
pub struct FinishRequest {
    pub note: Option<String>,
}

// POST /api/appointments/:id/finish
pub async fn finish(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Option<Json<FinishRequest>>,
) -> Result<Json<Appointment>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let mut apt = load_owned(&state, &session, &id)?;

    let note = body.as_ref().and_then(|b| b.note.as_deref());
    apt.finish(note)?;
    apt.updated_at = Utc::now().naive_utc();

    {
        let db = state.db.lock().unwrap();
        queries::save_appointment(&db, &apt)?;
    }

    tracing::info!(id = %apt.id, "appointment finished");
    Ok(Json(apt))
}

// POST /api/appointments/:id/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Appointment>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let mut apt = load_owned(&state, &session, &id)?;

    apt.cancel()?;
    apt.updated_at = Utc::now().naive_utc();

    {
        let db = state.db.lock().unwrap();
        queries::save_appointment(&db, &apt)?;
    }

    tracing::info!(id = %apt.id, "appointment cancelled");
    Ok(Json(apt))
}

// DELETE /api/appointments/:id — purge of terminal records only; an active
// appointment has to go through cancel first
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let apt = load_owned(&state, &session, &id)?;

    if !apt.status.is_terminal() {
        return Err(AppError::Conflict(format!(
            "appointment is {}, only completed or cancelled appointments can be deleted",
            apt.status.as_str()
        )));
    }

    {
        let db = state.db.lock().unwrap();
        queries::delete_appointment(&db, &id)?;
    }

    Ok(Json(serde_json::json!({ "ok": true })))
}
