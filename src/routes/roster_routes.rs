use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::dto::roster_dto::{
    ApplyFiltersPayload, CreateSessionPayload, ScrollPayload, SessionCreatedResponse,
    UpdateStatusPayload,
};
use crate::error::{Error, Result};
use crate::services::roster_service::{RosterSession, RosterView};
use crate::AppState;

fn session(state: &AppState, id: Uuid) -> Result<Arc<RosterSession>> {
    state
        .sessions
        .lock()
        .expect("sessions mutex poisoned")
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("Roster session {} not found", id)))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionPayload>,
) -> Result<Json<SessionCreatedResponse>> {
    payload.validate()?;

    let session = Arc::new(RosterSession::new(
        state.metadata_api.clone(),
        state.assignment_store.clone(),
        payload.company_id,
    ));
    let session_id = Uuid::new_v4();
    state
        .sessions
        .lock()
        .expect("sessions mutex poisoned")
        .insert(session_id, session);

    tracing::info!(%session_id, "Created roster session");
    Ok(Json(SessionCreatedResponse { session_id }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let removed = state
        .sessions
        .lock()
        .expect("sessions mutex poisoned")
        .remove(&id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(Error::NotFound(format!("Roster session {} not found", id))),
    }
}

pub async fn get_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterView>> {
    Ok(Json(session(&state, id)?.view()))
}

pub async fn apply_filters(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApplyFiltersPayload>,
) -> Result<Json<RosterView>> {
    payload.validate()?;
    let session = session(&state, id)?;
    session.apply_filters(payload.into_filters()).await?;
    Ok(Json(session.view()))
}

pub async fn refresh_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RosterView>> {
    let session = session(&state, id)?;
    session.refresh().await?;
    Ok(Json(session.view()))
}

pub async fn scroll(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScrollPayload>,
) -> Result<Json<RosterView>> {
    let session = session(&state, id)?;
    session.on_scroll_near_end(payload.visible_stop_index).await?;
    Ok(Json(session.view()))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path((id, candidate_id)): Path<(Uuid, String)>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<serde_json::Value>> {
    let status = payload.parsed()?;
    session(&state, id)?
        .update_hiring_status(&candidate_id, status)
        .await?;
    Ok(Json(json!({ "status": "ok" })))
}
