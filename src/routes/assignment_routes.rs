use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::dto::roster_dto::{AssignmentScopeQuery, CreateAssignmentPayload};
use crate::error::Result;
use crate::models::assignment::AssignmentRecord;
use crate::AppState;

pub async fn create_assignment(
    State(state): State<AppState>,
    Json(payload): Json<CreateAssignmentPayload>,
) -> Result<(StatusCode, Json<AssignmentRecord>)> {
    payload.validate()?;
    let created = state.assignment_store.create(payload.into_new()).await?;
    tracing::info!(
        resume_id = %created.resume_id,
        recruiter_id = %created.recruiter_id,
        "Tagged recruiter assignment"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list_assignments(
    State(state): State<AppState>,
    Query(scope): Query<AssignmentScopeQuery>,
) -> Result<Json<Vec<AssignmentRecord>>> {
    let assignments = state
        .assignment_store
        .list_for_company(scope.company_id)
        .await?;
    Ok(Json(assignments))
}
