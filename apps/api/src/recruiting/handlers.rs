use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{CandidateRecommendationRow, InvitationRow};
use crate::recruiting::fit_scoring::FitResult;
use crate::recruiting::projects::{
    create_project, fit_report, invite_developer, list_recommendations, refresh_recommendations,
    CreateProjectRequest, CreateProjectResponse, InviteRequest,
};
use crate::state::AppState;

/// POST /api/v1/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<CreateProjectResponse>), AppError> {
    let response = create_project(
        &state.db,
        state.oracle.as_ref(),
        state.fit_scorer.as_ref(),
        state.config.ranking,
        req,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/projects/:id/recommendations
pub async fn handle_get_recommendations(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateRecommendationRow>>, AppError> {
    let rows = list_recommendations(&state.db, project_id, state.config.ranking.creation).await?;
    Ok(Json(rows))
}

/// POST /api/v1/projects/:id/recommendations/refresh
pub async fn handle_refresh_recommendations(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<CandidateRecommendationRow>>, AppError> {
    let rows = refresh_recommendations(
        &state.db,
        state.fit_scorer.as_ref(),
        project_id,
        state.config.ranking.default,
    )
    .await?;
    Ok(Json(rows))
}

/// GET /api/v1/projects/:id/fit/:developer_id
pub async fn handle_fit_report(
    State(state): State<AppState>,
    Path((project_id, developer_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<FitResult>, AppError> {
    let fit = fit_report(&state.db, state.fit_scorer.as_ref(), project_id, developer_id).await?;
    Ok(Json(fit))
}

/// POST /api/v1/projects/:id/invitations
pub async fn handle_invite(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(req): Json<InviteRequest>,
) -> Result<(StatusCode, Json<InvitationRow>), AppError> {
    let (invitation, created) = invite_developer(&state.db, project_id, req).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(invitation)))
}
