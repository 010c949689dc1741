//! Challenge submission: record, grade, then evolve aptitude under a row lock.
//!
//! The grading call happens outside any transaction so no lock is held while waiting
//! on the oracle.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::developer::SubmissionRow;
use crate::talent::models::{GradingResult, SubmissionAnswer};
use crate::talent::oracle::{OracleError, TalentOracle};
use crate::talent::repository;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub developer_id: Uuid,
    pub challenge_id: Uuid,
    #[serde(default)]
    pub bug_analysis: String,
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub submission: SubmissionRow,
    pub previous_aptitude: i32,
    pub aptitude: i32,
}

pub async fn submit_challenge(
    pool: &PgPool,
    oracle: &dyn TalentOracle,
    req: SubmitRequest,
) -> Result<SubmitResponse, AppError> {
    repository::find_developer(pool, req.developer_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Developer {} not found", req.developer_id)))?;
    let challenge = repository::find_challenge(pool, req.challenge_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Challenge {} not found", req.challenge_id)))?;

    let submission = repository::insert_submission(
        pool,
        req.developer_id,
        req.challenge_id,
        &req.bug_analysis,
        &req.answer,
    )
    .await?;

    let spec = challenge.spec();
    let answer = SubmissionAnswer {
        bug_analysis: req.bug_analysis,
        answer: req.answer,
    };

    let result = oracle.grade_submission(&spec, &answer).await;
    let grading = match grading_or_failure(submission.id, result) {
        Ok(grading) => grading,
        Err(e) => {
            repository::mark_submission_failed(pool, submission.id).await?;
            return Err(e);
        }
    };

    let completed = repository::complete_submission(
        pool,
        submission.id,
        req.developer_id,
        spec.max_score,
        &grading,
    )
    .await?;

    info!(
        submission_id = %submission.id,
        developer_id = %req.developer_id,
        score = grading.score,
        previous = completed.previous_aptitude,
        aptitude = completed.aptitude,
        "Submission graded"
    );

    Ok(SubmitResponse {
        submission: completed.submission,
        previous_aptitude: completed.previous_aptitude,
        aptitude: completed.aptitude,
    })
}

/// A grading failure is never a zero score: it surfaces as an oracle error naming the
/// submission, which the caller records as failed.
pub fn grading_or_failure(
    submission_id: Uuid,
    result: Result<GradingResult, OracleError>,
) -> Result<GradingResult, AppError> {
    result.map_err(|e| {
        warn!(submission_id = %submission_id, "Grading failed: {e}");
        AppError::Oracle(format!("Grading failed for submission {submission_id}"))
    })
}
