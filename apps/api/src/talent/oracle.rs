//! Oracle seam: the three model-backed operations the service depends on.
//!
//! Default: `LlmTalentOracle` (prompt substitution + `LlmClient` + result validation).
//!
//! `AppState` holds an `Arc<dyn TalentOracle>`; workflows receive it as `&dyn TalentOracle`
//! so each request owns its call and nothing is shared between calls.

use async_trait::async_trait;
use thiserror::Error;

use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};
use crate::llm_client::{LlmClient, LlmError};
use crate::recruiting::prompts::{SUGGEST_CHALLENGES_PROMPT, SUGGEST_CHALLENGES_SYSTEM};
use crate::recruiting::suggestions::ProjectBrief;
use crate::talent::models::{
    ChallengeSpec, ChallengeSuggestions, GradingResult, ResumeProfile, SkillExtraction,
    SubmissionAnswer,
};
use crate::talent::prompts::{
    RESUME_EXTRACT_PROMPT, RESUME_EXTRACT_SYSTEM, RESUME_EXTRACT_USER, SUBMISSION_GRADE_PROMPT,
    SUBMISSION_GRADE_SYSTEM, SUBMISSION_GRADE_USER,
};
use crate::talent::validation::{validate_extraction, validate_grading, validate_suggestions};

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("oracle call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("could not encode oracle input: {0}")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait TalentOracle: Send + Sync {
    /// Resume text + profile → aptitude seed and skills with validation challenges.
    async fn extract_skills(
        &self,
        resume_text: &str,
        profile: &ResumeProfile,
    ) -> Result<SkillExtraction, OracleError>;

    /// Challenge + submission → bounded grading result.
    async fn grade_submission(
        &self,
        challenge: &ChallengeSpec,
        submission: &SubmissionAnswer,
    ) -> Result<GradingResult, OracleError>;

    /// Project brief → recruiter challenge suggestions.
    async fn suggest_challenges(
        &self,
        project: &ProjectBrief,
    ) -> Result<ChallengeSuggestions, OracleError>;
}

pub struct LlmTalentOracle(pub LlmClient);

#[async_trait]
impl TalentOracle for LlmTalentOracle {
    async fn extract_skills(
        &self,
        resume_text: &str,
        profile: &ResumeProfile,
    ) -> Result<SkillExtraction, OracleError> {
        let system = extraction_prompt(resume_text, profile)?;
        let raw = self.0.call_json(&system, RESUME_EXTRACT_USER).await?;
        Ok(validate_extraction(&raw))
    }

    async fn grade_submission(
        &self,
        challenge: &ChallengeSpec,
        submission: &SubmissionAnswer,
    ) -> Result<GradingResult, OracleError> {
        let system = grading_prompt(challenge, submission)?;
        let raw = self.0.call_json(&system, SUBMISSION_GRADE_USER).await?;
        Ok(validate_grading(&raw, challenge.max_score))
    }

    async fn suggest_challenges(
        &self,
        project: &ProjectBrief,
    ) -> Result<ChallengeSuggestions, OracleError> {
        let project_json = serde_json::to_string_pretty(project)?;
        let user = fill_template(SUGGEST_CHALLENGES_PROMPT, &[("project_json", &project_json)]);
        let system = system_prompt(SUGGEST_CHALLENGES_SYSTEM, None);
        let raw = self.0.call_json(&system, &user).await?;
        Ok(validate_suggestions(&raw))
    }
}

fn extraction_prompt(resume_text: &str, profile: &ResumeProfile) -> Result<String, OracleError> {
    let profile_json = serde_json::to_string(profile)?;
    let body = fill_template(
        RESUME_EXTRACT_PROMPT,
        &[("profile_json", &profile_json), ("resume_text", resume_text)],
    );
    Ok(system_prompt(RESUME_EXTRACT_SYSTEM, Some(&body)))
}

fn grading_prompt(
    challenge: &ChallengeSpec,
    submission: &SubmissionAnswer,
) -> Result<String, OracleError> {
    let payload = serde_json::to_string(&serde_json::json!({
        "challenge": challenge,
        "submission": submission,
    }))?;
    let body = fill_template(SUBMISSION_GRADE_PROMPT, &[("submission_json", &payload)]);
    Ok(system_prompt(SUBMISSION_GRADE_SYSTEM, Some(&body)))
}

fn system_prompt(role: &str, body: Option<&str>) -> String {
    match body {
        Some(body) => format!("{role}\n\n{body}\n{JSON_ONLY_SYSTEM}"),
        None => format!("{role}\n\n{JSON_ONLY_SYSTEM}"),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{RetryPolicy, DEFAULT_MODEL};
    use crate::talent::models::{ChallengeType, Difficulty};

    fn profile() -> ResumeProfile {
        ResumeProfile {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            bio: "Analytical engines".to_string(),
            location: "London".to_string(),
            experience_level: "senior".to_string(),
            availability: "available".to_string(),
            portfolio_links: vec!["https://example.com/ada".to_string()],
        }
    }

    fn challenge() -> ChallengeSpec {
        ChallengeSpec {
            title: "Fix the scheduler".to_string(),
            description: "Three bugs hide in a job scheduler.".to_string(),
            difficulty: Difficulty::Advanced,
            time_limit: 90,
            challenge_type: ChallengeType::Debugging,
            challenge_question: "Find the bugs.".to_string(),
            max_score: 100,
        }
    }

    #[test]
    fn test_extraction_prompt_embeds_resume_and_profile() {
        let prompt = extraction_prompt("Built <b>compilers</b> in Rust", &profile()).unwrap();
        assert!(prompt.contains("Built <b>compilers</b> in Rust"));
        assert!(prompt.contains("\"email\":\"ada@example.com\""));
        assert!(!prompt.contains("<resume_text>"));
        assert!(!prompt.contains("<profile_json>"));
        assert!(prompt.ends_with(JSON_ONLY_SYSTEM));
    }

    #[test]
    fn test_extraction_prompt_keeps_slot_text_in_bio_literal() {
        let mut profile = profile();
        profile.bio = "I write <resume_text> tags".to_string();
        let prompt = extraction_prompt("SECRET RESUME", &profile).unwrap();
        assert!(prompt.contains("I write <resume_text> tags"));
        assert_eq!(prompt.matches("SECRET RESUME").count(), 1);
    }

    #[test]
    fn test_grading_prompt_embeds_challenge_and_answer() {
        let answer = SubmissionAnswer {
            bug_analysis: "Off-by-one in the retry loop".to_string(),
            answer: "patch attached".to_string(),
        };
        let prompt = grading_prompt(&challenge(), &answer).unwrap();
        assert!(prompt.contains("Off-by-one in the retry loop"));
        assert!(prompt.contains("\"challenge_type\":\"debugging\""));
        assert!(prompt.contains("\"max_score\":100"));
        assert!(!prompt.contains("<submission_json>"));
    }

    #[tokio::test]
    async fn test_llm_oracle_without_credentials_fails() {
        let client = LlmClient::new(None, DEFAULT_MODEL.to_string(), RetryPolicy::default()).unwrap();
        let oracle = LlmTalentOracle(client);
        let result = oracle.extract_skills("resume", &profile()).await;
        assert!(matches!(result, Err(OracleError::Llm(LlmError::MissingApiKey))));
    }
}
