//! Postgres access for projects, their skill requirements, stored recommendations
//! and invitations.
//!
//! Writes to a project's recommendation set run on a caller-owned transaction that
//! holds the project row lock (`lock_project`), so concurrent refreshes serialize.

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::models::project::{
    CandidateRecommendationRow, InvitationRow, InvitationStatus, ProjectRow, ProjectSkillRow,
    ProjectStatus,
};
use crate::recruiting::fit_scoring::SkillRequirement;
use crate::recruiting::ranking::RankedCandidate;

const LOCK_PROJECT_SQL: &str = "SELECT * FROM projects WHERE id = $1 FOR UPDATE";

/// Inserts the project and its requirements. The new row stays locked until `conn`'s
/// transaction ends.
pub async fn insert_project(
    conn: &mut PgConnection,
    project_name: &str,
    description: &str,
    automation_enabled: bool,
    requirements: &[SkillRequirement],
) -> Result<(ProjectRow, Vec<ProjectSkillRow>), sqlx::Error> {
    let project = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects (id, project_name, description, status, automation_enabled)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project_name)
    .bind(description)
    .bind(ProjectStatus::Matching.as_str())
    .bind(automation_enabled)
    .fetch_one(&mut *conn)
    .await?;

    for requirement in requirements {
        sqlx::query(
            r#"
            INSERT INTO project_skills (id, project_id, name, required_level)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id, name, required_level) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(project.id)
        .bind(&requirement.name)
        .bind(requirement.required_level)
        .execute(&mut *conn)
        .await?;
    }

    let skills = list_project_skills(&mut *conn, project.id).await?;
    Ok((project, skills))
}

pub async fn find_project(pool: &PgPool, id: Uuid) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Locks the project row for the rest of the transaction.
pub async fn lock_project(
    conn: &mut PgConnection,
    id: Uuid,
) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(LOCK_PROJECT_SQL)
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn list_project_skills<'e>(
    executor: impl PgExecutor<'e>,
    project_id: Uuid,
) -> Result<Vec<ProjectSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectSkillRow>(
        "SELECT * FROM project_skills WHERE project_id = $1 ORDER BY name, required_level",
    )
    .bind(project_id)
    .fetch_all(executor)
    .await
}

/// Replaces the stored recommendation set and records its size on the project.
/// The caller must hold the project lock on `conn`.
pub async fn replace_recommendations(
    conn: &mut PgConnection,
    project_id: Uuid,
    ranked: &[RankedCandidate],
) -> Result<Vec<CandidateRecommendationRow>, sqlx::Error> {
    sqlx::query("DELETE FROM candidate_recommendations WHERE project_id = $1")
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    for candidate in ranked {
        sqlx::query(
            r#"
            INSERT INTO candidate_recommendations (id, project_id, developer_id, fit_score, rationale)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(project_id)
        .bind(candidate.developer_id)
        .bind(candidate.fit.score)
        .bind(candidate.rationale())
        .execute(&mut *conn)
        .await?;
    }

    sqlx::query("UPDATE projects SET target_count = $1 WHERE id = $2")
        .bind(ranked.len() as i32)
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    sqlx::query_as::<_, CandidateRecommendationRow>(
        r#"
        SELECT * FROM candidate_recommendations
        WHERE project_id = $1
        ORDER BY fit_score DESC, developer_id
        "#,
    )
    .bind(project_id)
    .fetch_all(&mut *conn)
    .await
}

pub async fn list_recommendations(
    pool: &PgPool,
    project_id: Uuid,
    limit: usize,
) -> Result<Vec<CandidateRecommendationRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRecommendationRow>(
        r#"
        SELECT * FROM candidate_recommendations
        WHERE project_id = $1
        ORDER BY fit_score DESC, developer_id
        LIMIT $2
        "#,
    )
    .bind(project_id)
    .bind(limit as i64)
    .fetch_all(pool)
    .await
}

/// Creates the invitation, or re-sends an existing one for the same pair.
/// The flag is `true` when a new invitation was created.
pub async fn upsert_invitation(
    pool: &PgPool,
    project_id: Uuid,
    developer_id: Uuid,
    challenge_id: Option<Uuid>,
    message: Option<&str>,
) -> Result<(InvitationRow, bool), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let existing: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM invitations WHERE project_id = $1 AND developer_id = $2 FOR UPDATE",
    )
    .bind(project_id)
    .bind(developer_id)
    .fetch_optional(&mut *tx)
    .await?;

    let invitation = sqlx::query_as::<_, InvitationRow>(
        r#"
        INSERT INTO invitations (id, project_id, developer_id, challenge_id, status, message)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, ''))
        ON CONFLICT (project_id, developer_id) DO UPDATE
        SET challenge_id = COALESCE(EXCLUDED.challenge_id, invitations.challenge_id),
            message = COALESCE($6, invitations.message),
            status = EXCLUDED.status,
            sent_at = now(),
            responded_at = NULL
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(project_id)
    .bind(developer_id)
    .bind(challenge_id)
    .bind(InvitationStatus::Sent.as_str())
    .bind(message)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((invitation, existing.is_none()))
}
