use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::errors::AppError;
use crate::models::MenuSection;
use crate::services::access;
use crate::state::AppState;

// GET /api/menu — the navigation entries the current role may see
pub async fn filtered_menu(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<MenuSection>>, AppError> {
    let session = super::authenticate(&state, &headers)?;
    Ok(Json(access::filter_menu(Some(session.role), &state.menu)))
}
