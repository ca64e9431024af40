use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Appointment, Role};
use crate::services::calendar::{self, CalendarDay};
use crate::session::Session;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct GridQuery {
    /// Any date inside the month/week to display; defaults to today.
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct DayCell {
    #[serde(flatten)]
    pub day: CalendarDay,
    pub appointment_count: usize,
}

#[derive(Serialize)]
pub struct MonthGridResponse {
    pub weeks: Vec<Vec<DayCell>>,
}

#[derive(Serialize)]
pub struct WeekGridResponse {
    pub days: Vec<DayCell>,
}

fn visible_appointments(
    state: &AppState,
    session: &Session,
) -> Result<Vec<Appointment>, AppError> {
    let db = state.db.lock().unwrap();
    let appointments = match session.role {
        Role::Admin => queries::list_appointments(&db)?,
        Role::User => queries::list_appointments_for_owner(&db, &session.user_id)?,
    };
    Ok(appointments)
}

fn decorate(day: CalendarDay, appointments: &[Appointment]) -> DayCell {
    DayCell {
        appointment_count: calendar::on_date(day.date, appointments).len(),
        day,
    }
}

// GET /api/calendar/month?date=2025-01-15
pub async fn month(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GridQuery>,
) -> Result<Json<MonthGridResponse>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let reference = query.date.unwrap_or_else(|| Utc::now().naive_utc().date());

    let appointments = visible_appointments(&state, &session)?;
    let weeks = calendar::month_grid(reference)
        .into_iter()
        .map(|week| {
            week.into_iter()
                .map(|day| decorate(day, &appointments))
                .collect()
        })
        .collect();

    Ok(Json(MonthGridResponse { weeks }))
}

// GET /api/calendar/week?date=2025-01-15
pub async fn week(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<GridQuery>,
) -> Result<Json<WeekGridResponse>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    let reference = query.date.unwrap_or_else(|| Utc::now().naive_utc().date());

    let appointments = visible_appointments(&state, &session)?;
    let days = calendar::week_grid(reference)
        .into_iter()
        .map(|day| decorate(day, &appointments))
        .collect();

    Ok(Json(WeekGridResponse { days }))
}

#[derive(Deserialize)]
pub struct DayQuery {
    pub date: NaiveDate,
}

// GET /api/calendar/day?date=2025-01-15 — the day-detail listing
pub async fn day(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<Appointment>>, AppError> {
    let session = super::authenticate(&state, &headers)?;

    let appointments = visible_appointments(&state, &session)?;
    let on_day: Vec<Appointment> = calendar::on_date(query.date, &appointments)
        .into_iter()
        .cloned()
        .collect();

    Ok(Json(on_day))
}
