//! Project workflows: creation with initial ranking, recommendation refresh,
//! single fit reports and invitations.

use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::{CandidateRecommendationRow, InvitationRow, ProjectRow, ProjectSkillRow};
use crate::recruiting::fit_scoring::{collapse_requirements, FitResult, FitScorer, SkillRequirement};
use crate::recruiting::ranking::{rank_candidates, RankingLimits};
use crate::recruiting::repository;
use crate::recruiting::suggestions::{suggest_for_project, ProjectBrief};
use crate::scoring::normalize::clamp_int;
use crate::talent::models::ChallengeSuggestions;
use crate::talent::oracle::TalentOracle;
use crate::talent::repository as talent_repository;

/// Level assumed for a requirement submitted without one.
pub const DEFAULT_REQUIRED_LEVEL: i32 = 70;

#[derive(Debug, Deserialize)]
pub struct RequiredSkillInput {
    pub name: String,
    #[serde(default = "default_required_level")]
    pub required_level: i64,
}

fn default_required_level() -> i64 {
    DEFAULT_REQUIRED_LEVEL as i64
}

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub project_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub automation_enabled: bool,
    #[serde(default)]
    pub required_skills: Vec<RequiredSkillInput>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub project: ProjectRow,
    pub required_skills: Vec<ProjectSkillRow>,
    pub recommendations: Vec<CandidateRecommendationRow>,
    pub suggestions: ChallengeSuggestions,
}

#[derive(Debug, Deserialize)]
pub struct InviteRequest {
    pub developer_id: Uuid,
    pub challenge_id: Option<Uuid>,
    pub message: Option<String>,
}

/// Trims names, clamps levels and collapses duplicates. Blank names are rejected.
pub fn normalize_requirements(
    inputs: Vec<RequiredSkillInput>,
) -> Result<Vec<SkillRequirement>, AppError> {
    let mut requirements = Vec::with_capacity(inputs.len());
    for input in inputs {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AppError::Validation(
                "Required skill names must not be blank".to_string(),
            ));
        }
        let level = clamp_int(input.required_level, 0, 100) as i32;
        requirements.push(SkillRequirement::new(name, level));
    }
    Ok(collapse_requirements(requirements))
}

pub async fn create_project(
    pool: &PgPool,
    oracle: &dyn TalentOracle,
    scorer: &dyn FitScorer,
    limits: RankingLimits,
    req: CreateProjectRequest,
) -> Result<CreateProjectResponse, AppError> {
    let project_name = req.project_name.trim();
    if project_name.is_empty() {
        return Err(AppError::Validation("project_name is required".to_string()));
    }
    let requirements = normalize_requirements(req.required_skills)?;

    // Project, requirements and the initial recommendation set commit together.
    let mut tx = pool.begin().await?;
    let (project, required_skills) = repository::insert_project(
        &mut *tx,
        project_name,
        &req.description,
        req.automation_enabled,
        &requirements,
    )
    .await?;
    let stored =
        rank_and_store(&mut *tx, scorer, project.id, &requirements, limits.creation).await?;
    tx.commit().await?;

    let recommendations: Vec<_> = stored.into_iter().take(limits.summary).collect();

    let brief = ProjectBrief {
        project_name: project.project_name.clone(),
        description: project.description.clone(),
        required_skills: requirements,
    };
    let suggestions = suggest_for_project(oracle, &brief).await;

    Ok(CreateProjectResponse {
        project,
        required_skills,
        recommendations,
        suggestions,
    })
}

pub async fn refresh_recommendations(
    pool: &PgPool,
    scorer: &dyn FitScorer,
    project_id: Uuid,
    limit: usize,
) -> Result<Vec<CandidateRecommendationRow>, AppError> {
    let mut tx = pool.begin().await?;
    repository::lock_project(&mut *tx, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))?;
    let requirements = load_requirements(&mut *tx, project_id).await?;
    let stored = rank_and_store(&mut *tx, scorer, project_id, &requirements, limit).await?;
    tx.commit().await?;
    Ok(stored)
}

pub async fn list_recommendations(
    pool: &PgPool,
    project_id: Uuid,
    limit: usize,
) -> Result<Vec<CandidateRecommendationRow>, AppError> {
    require_project(pool, project_id).await?;
    Ok(repository::list_recommendations(pool, project_id, limit).await?)
}

pub async fn fit_report(
    pool: &PgPool,
    scorer: &dyn FitScorer,
    project_id: Uuid,
    developer_id: Uuid,
) -> Result<FitResult, AppError> {
    require_project(pool, project_id).await?;
    let developer = talent_repository::find_developer(pool, developer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Developer {developer_id} not found")))?;

    let requirements = load_requirements(pool, project_id).await?;
    let profile = talent_repository::load_developer_profile(pool, &developer).await?;
    Ok(scorer.score(&requirements, &profile))
}

pub async fn invite_developer(
    pool: &PgPool,
    project_id: Uuid,
    req: InviteRequest,
) -> Result<(InvitationRow, bool), AppError> {
    require_project(pool, project_id).await?;

    if talent_repository::find_developer(pool, req.developer_id)
        .await?
        .is_none()
    {
        return Err(AppError::Validation(format!(
            "Unknown developer {}",
            req.developer_id
        )));
    }
    if let Some(challenge_id) = req.challenge_id {
        if talent_repository::find_challenge(pool, challenge_id)
            .await?
            .is_none()
        {
            return Err(AppError::Validation(format!(
                "Unknown challenge {challenge_id}"
            )));
        }
    }

    let (invitation, created) = repository::upsert_invitation(
        pool,
        project_id,
        req.developer_id,
        req.challenge_id,
        req.message.as_deref(),
    )
    .await?;

    info!(
        project_id = %project_id,
        developer_id = %req.developer_id,
        created,
        "Invitation sent"
    );
    Ok((invitation, created))
}

async fn rank_and_store(
    conn: &mut PgConnection,
    scorer: &dyn FitScorer,
    project_id: Uuid,
    requirements: &[SkillRequirement],
    limit: usize,
) -> Result<Vec<CandidateRecommendationRow>, AppError> {
    let developers = talent_repository::load_developer_profiles(&mut *conn).await?;
    let ranked = rank_candidates(scorer, requirements, &developers, limit);
    info!(
        project_id = %project_id,
        population = developers.len(),
        stored = ranked.len(),
        "Recommendations computed"
    );
    Ok(repository::replace_recommendations(conn, project_id, &ranked).await?)
}

async fn load_requirements<'e>(
    executor: impl PgExecutor<'e>,
    project_id: Uuid,
) -> Result<Vec<SkillRequirement>, AppError> {
    let rows = repository::list_project_skills(executor, project_id).await?;
    Ok(collapse_requirements(rows.iter().map(ProjectSkillRow::requirement)))
}

async fn require_project(pool: &PgPool, project_id: Uuid) -> Result<ProjectRow, AppError> {
    repository::find_project(pool, project_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project {project_id} not found")))
}
