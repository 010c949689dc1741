use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::developer::{DeveloperRow, DeveloperSkillRow, SubmissionRow};
use crate::models::project::{InvitationRow, InvitationStatus};
use crate::state::AppState;
use crate::talent::onboarding::{onboard_developer, DeveloperForm, OnboardResponse};
use crate::talent::repository;
use crate::talent::resume::extract_resume_text;
use crate::talent::submissions::{submit_challenge, SubmitRequest, SubmitResponse};

#[derive(Serialize)]
pub struct DeveloperResponse {
    pub developer: DeveloperRow,
    pub skills: Vec<DeveloperSkillRow>,
}

/// POST /api/v1/developers (multipart)
pub async fn handle_create_developer(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<OnboardResponse>), AppError> {
    let mut form = DeveloperForm::default();
    let mut resume: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "resume" {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Could not read resume: {e}")))?;
            resume = Some(data);
            continue;
        }
        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read field {name}: {e}")))?;
        if !form.set(&name, value) {
            debug!("Ignoring unknown multipart field {name}");
        }
    }

    let resume = resume
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::Validation("resume file is required".to_string()))?;
    let profile = form.validate()?;

    let resume_text = tokio::task::spawn_blocking(move || extract_resume_text(&resume))
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

    let response = onboard_developer(&state.db, state.oracle.as_ref(), profile, resume_text).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/developers/:id
pub async fn handle_get_developer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeveloperResponse>, AppError> {
    let developer = repository::find_developer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Developer {id} not found")))?;
    let skills = repository::list_developer_skills(&state.db, id).await?;
    Ok(Json(DeveloperResponse { developer, skills }))
}

/// GET /api/v1/developers/:id/invitations
pub async fn handle_list_invitations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<InvitationRow>>, AppError> {
    repository::find_developer(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Developer {id} not found")))?;
    Ok(Json(repository::list_invitations(&state.db, id).await?))
}

/// POST /api/v1/developers/:id/invitations/:invitation_id/accept
pub async fn handle_accept_invitation(
    State(state): State<AppState>,
    Path((developer_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<InvitationRow>, AppError> {
    respond(&state, developer_id, invitation_id, InvitationStatus::Accepted).await
}

/// POST /api/v1/developers/:id/invitations/:invitation_id/decline
pub async fn handle_decline_invitation(
    State(state): State<AppState>,
    Path((developer_id, invitation_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<InvitationRow>, AppError> {
    respond(&state, developer_id, invitation_id, InvitationStatus::Declined).await
}

async fn respond(
    state: &AppState,
    developer_id: Uuid,
    invitation_id: Uuid,
    status: InvitationStatus,
) -> Result<Json<InvitationRow>, AppError> {
    let invitation =
        repository::respond_to_invitation(&state.db, developer_id, invitation_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Invitation {invitation_id} not found")))?;
    Ok(Json(invitation))
}

/// POST /api/v1/submissions
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<SubmitResponse>), AppError> {
    let response = submit_challenge(&state.db, state.oracle.as_ref(), req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/submissions
pub async fn handle_list_submissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<SubmissionRow>>, AppError> {
    Ok(Json(repository::list_submissions(&state.db).await?))
}
