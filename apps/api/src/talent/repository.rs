//! Postgres access for developers, skills, challenges, submissions and invitations.
//!
//! Aptitude is only ever written inside a transaction that holds the developer row lock.

use std::collections::HashMap;

use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::developer::{
    ChallengeRow, DeveloperRow, DeveloperSkillRow, SubmissionRow, SubmissionStatus,
    ValidationStatus,
};
use crate::models::project::{InvitationRow, InvitationStatus};
use crate::recruiting::fit_scoring::{skill_key, DeveloperProfile, DeveloperSkill};
use crate::scoring::aptitude::{evolve_aptitude, AptitudeWeights};
use crate::talent::models::{ChallengeSpec, GradingResult, SkillExtraction};

pub struct NewDeveloper<'a> {
    pub full_name: &'a str,
    pub email: &'a str,
    pub bio: &'a str,
    pub location: &'a str,
    pub experience_level: &'a str,
    pub availability: &'a str,
    pub portfolio_links: serde_json::Value,
    pub resume_text: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// Developers
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_developer(pool: &PgPool, id: Uuid) -> Result<Option<DeveloperRow>, sqlx::Error> {
    sqlx::query_as::<_, DeveloperRow>("SELECT * FROM developers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_developer_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<DeveloperRow>, sqlx::Error> {
    sqlx::query_as::<_, DeveloperRow>("SELECT * FROM developers WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn insert_developer(
    pool: &PgPool,
    new: &NewDeveloper<'_>,
) -> Result<DeveloperRow, sqlx::Error> {
    sqlx::query_as::<_, DeveloperRow>(
        r#"
        INSERT INTO developers
            (id, full_name, email, bio, location, experience_level, availability,
             portfolio_links, resume_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.full_name)
    .bind(new.email)
    .bind(new.bio)
    .bind(new.location)
    .bind(new.experience_level)
    .bind(new.availability)
    .bind(&new.portfolio_links)
    .bind(new.resume_text)
    .fetch_one(pool)
    .await
}

pub async fn update_resume_text(
    pool: &PgPool,
    developer_id: Uuid,
    resume_text: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE developers SET resume_text = $1 WHERE id = $2")
        .bind(resume_text)
        .bind(developer_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_developer_skills(
    pool: &PgPool,
    developer_id: Uuid,
) -> Result<Vec<DeveloperSkillRow>, sqlx::Error> {
    sqlx::query_as::<_, DeveloperSkillRow>(
        "SELECT * FROM developer_skills WHERE developer_id = $1 ORDER BY name_key",
    )
    .bind(developer_id)
    .fetch_all(pool)
    .await
}

/// Stores an extraction: aptitude seed, validation status, challenges and skills,
/// all in one transaction.
pub async fn apply_extraction(
    pool: &PgPool,
    developer_id: Uuid,
    extraction: &SkillExtraction,
) -> Result<(DeveloperRow, Vec<DeveloperSkillRow>), sqlx::Error> {
    let mut tx = pool.begin().await?;

    let status = if extraction.skills.is_empty() {
        ValidationStatus::NotValidated
    } else {
        ValidationStatus::PartiallyValidated
    };

    let developer = sqlx::query_as::<_, DeveloperRow>(
        "UPDATE developers SET aptitude = $1, validation_status = $2 WHERE id = $3 RETURNING *",
    )
    .bind(extraction.aptitude)
    .bind(status.as_str())
    .bind(developer_id)
    .fetch_one(&mut *tx)
    .await?;

    for skill in &extraction.skills {
        let challenge_id = get_or_create_challenge(&mut tx, &skill.challenge).await?;
        sqlx::query(
            r#"
            INSERT INTO developer_skills (developer_id, name_key, name, level, validated, challenge_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (developer_id, name_key) DO UPDATE
            SET name = EXCLUDED.name,
                level = EXCLUDED.level,
                validated = EXCLUDED.validated,
                challenge_id = EXCLUDED.challenge_id
            "#,
        )
        .bind(developer_id)
        .bind(skill_key(&skill.name))
        .bind(&skill.name)
        .bind(skill.level)
        .bind(skill.validated)
        .bind(challenge_id)
        .execute(&mut *tx)
        .await?;
    }

    let skills = sqlx::query_as::<_, DeveloperSkillRow>(
        "SELECT * FROM developer_skills WHERE developer_id = $1 ORDER BY name_key",
    )
    .bind(developer_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((developer, skills))
}

/// Challenges are shared by title; an existing title keeps its stored definition.
async fn get_or_create_challenge(
    tx: &mut Transaction<'_, Postgres>,
    spec: &ChallengeSpec,
) -> Result<Uuid, sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO challenges
            (id, title, description, difficulty, time_limit, challenge_type, challenge_question, max_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (title) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(&spec.title)
    .bind(&spec.description)
    .bind(spec.difficulty.as_str())
    .bind(spec.time_limit)
    .bind(spec.challenge_type.as_str())
    .bind(&spec.challenge_question)
    .bind(spec.max_score)
    .execute(&mut **tx)
    .await?;

    let (id,): (Uuid,) = sqlx::query_as("SELECT id FROM challenges WHERE title = $1")
        .bind(&spec.title)
        .fetch_one(&mut **tx)
        .await?;
    Ok(id)
}

/// Snapshot of every developer's aptitude and skills, for ranking.
pub async fn load_developer_profiles(
    conn: &mut PgConnection,
) -> Result<Vec<DeveloperProfile>, sqlx::Error> {
    let developers: Vec<(Uuid, i32)> =
        sqlx::query_as("SELECT id, aptitude FROM developers ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
    let skills = sqlx::query_as::<_, DeveloperSkillRow>("SELECT * FROM developer_skills")
        .fetch_all(&mut *conn)
        .await?;
    Ok(build_profiles(developers, skills))
}

pub async fn load_developer_profile(
    pool: &PgPool,
    developer: &DeveloperRow,
) -> Result<DeveloperProfile, sqlx::Error> {
    let skills = list_developer_skills(pool, developer.id).await?;
    Ok(build_profiles(vec![(developer.id, developer.aptitude)], skills)
        .pop()
        .unwrap_or_else(|| DeveloperProfile::new(developer.id, developer.aptitude)))
}

fn build_profiles(
    developers: Vec<(Uuid, i32)>,
    skills: Vec<DeveloperSkillRow>,
) -> Vec<DeveloperProfile> {
    let mut by_developer: HashMap<Uuid, Vec<DeveloperSkill>> = HashMap::new();
    for row in skills {
        by_developer
            .entry(row.developer_id)
            .or_default()
            .push(DeveloperSkill {
                name: row.name,
                level: row.level,
                validated: row.validated,
            });
    }

    developers
        .into_iter()
        .map(|(id, aptitude)| {
            DeveloperProfile::with_skills(id, aptitude, by_developer.remove(&id).unwrap_or_default())
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Challenges & submissions
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_challenge(pool: &PgPool, id: Uuid) -> Result<Option<ChallengeRow>, sqlx::Error> {
    sqlx::query_as::<_, ChallengeRow>("SELECT * FROM challenges WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn insert_submission(
    pool: &PgPool,
    developer_id: Uuid,
    challenge_id: Uuid,
    bug_analysis: &str,
    answer: &str,
) -> Result<SubmissionRow, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>(
        r#"
        INSERT INTO submissions (id, developer_id, challenge_id, bug_analysis, answer, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(developer_id)
    .bind(challenge_id)
    .bind(bug_analysis)
    .bind(answer)
    .bind(SubmissionStatus::Evaluating.as_str())
    .fetch_one(pool)
    .await
}

pub async fn mark_submission_failed(pool: &PgPool, submission_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE submissions SET status = $1 WHERE id = $2")
        .bind(SubmissionStatus::Failed.as_str())
        .bind(submission_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub struct CompletedSubmission {
    pub submission: SubmissionRow,
    pub previous_aptitude: i32,
    pub aptitude: i32,
}

/// Stores the grading result and evolves the developer's aptitude under a row lock.
pub async fn complete_submission(
    pool: &PgPool,
    submission_id: Uuid,
    developer_id: Uuid,
    max_score: i32,
    grading: &GradingResult,
) -> Result<CompletedSubmission, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let (previous_aptitude,): (i32,) =
        sqlx::query_as("SELECT aptitude FROM developers WHERE id = $1 FOR UPDATE")
            .bind(developer_id)
            .fetch_one(&mut *tx)
            .await?;

    let aptitude = evolve_aptitude(
        previous_aptitude,
        grading.outcome(max_score),
        AptitudeWeights::default(),
    );

    sqlx::query("UPDATE developers SET aptitude = $1 WHERE id = $2")
        .bind(aptitude)
        .bind(developer_id)
        .execute(&mut *tx)
        .await?;

    let submission = sqlx::query_as::<_, SubmissionRow>(
        r#"
        UPDATE submissions
        SET score = $1, accuracy_rate = $2, bugs_found = $3, bugs_missed = $4,
            false_positives = $5, ai_feedback = $6, evaluation_details = $7, status = $8
        WHERE id = $9
        RETURNING *
        "#,
    )
    .bind(grading.score)
    .bind(grading.accuracy_rate)
    .bind(grading.bugs_found)
    .bind(grading.bugs_missed)
    .bind(grading.false_positives)
    .bind(&grading.feedback)
    .bind(&grading.evaluation_details)
    .bind(SubmissionStatus::Completed.as_str())
    .bind(submission_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(CompletedSubmission {
        submission,
        previous_aptitude,
        aptitude,
    })
}

pub async fn list_submissions(pool: &PgPool) -> Result<Vec<SubmissionRow>, sqlx::Error> {
    sqlx::query_as::<_, SubmissionRow>("SELECT * FROM submissions ORDER BY created_at DESC, id")
        .fetch_all(pool)
        .await
}

// ────────────────────────────────────────────────────────────────────────────
// Invitations (developer side)
// ────────────────────────────────────────────────────────────────────────────

pub async fn list_invitations(
    pool: &PgPool,
    developer_id: Uuid,
) -> Result<Vec<InvitationRow>, sqlx::Error> {
    sqlx::query_as::<_, InvitationRow>(
        "SELECT * FROM invitations WHERE developer_id = $1 ORDER BY sent_at DESC",
    )
    .bind(developer_id)
    .fetch_all(pool)
    .await
}

/// Returns `None` when the invitation does not exist or belongs to someone else.
pub async fn respond_to_invitation(
    pool: &PgPool,
    developer_id: Uuid,
    invitation_id: Uuid,
    status: InvitationStatus,
) -> Result<Option<InvitationRow>, sqlx::Error> {
    sqlx::query_as::<_, InvitationRow>(
        r#"
        UPDATE invitations SET status = $1, responded_at = $2
        WHERE id = $3 AND developer_id = $4
        RETURNING *
        "#,
    )
    .bind(status.as_str())
    .bind(Utc::now())
    .bind(invitation_id)
    .bind(developer_id)
    .fetch_optional(pool)
    .await
}
