//! Recruiter challenge suggestions for a newly created project.
//!
//! Advisory only: an oracle failure yields an empty suggestion set, never an error.

use serde::Serialize;
use tracing::{info, warn};

use crate::recruiting::fit_scoring::SkillRequirement;
use crate::talent::models::ChallengeSuggestions;
use crate::talent::oracle::TalentOracle;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectBrief {
    pub project_name: String,
    pub description: String,
    pub required_skills: Vec<SkillRequirement>,
}

pub async fn suggest_for_project(
    oracle: &dyn TalentOracle,
    brief: &ProjectBrief,
) -> ChallengeSuggestions {
    match oracle.suggest_challenges(brief).await {
        Ok(suggestions) => {
            info!(
                project = %brief.project_name,
                count = suggestions.challenges.len(),
                "Challenge suggestions generated"
            );
            suggestions
        }
        Err(e) => {
            warn!(project = %brief.project_name, "Challenge suggestion failed: {e}");
            ChallengeSuggestions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::models::{ChallengeSpec, ChallengeType, Difficulty};
    use crate::talent::oracle::fake::FakeOracle;

    fn brief() -> ProjectBrief {
        ProjectBrief {
            project_name: "Payments rewrite".to_string(),
            description: "Move billing to Rust".to_string(),
            required_skills: vec![SkillRequirement::new("Rust", 80)],
        }
    }

    #[tokio::test]
    async fn test_oracle_failure_yields_empty_suggestions() {
        let oracle = FakeOracle::default();
        let suggestions = suggest_for_project(&oracle, &brief()).await;
        assert_eq!(suggestions, ChallengeSuggestions::default());
    }

    #[tokio::test]
    async fn test_oracle_suggestions_pass_through() {
        let expected = ChallengeSuggestions {
            challenges: vec![ChallengeSpec {
                title: "Idempotent ledger".to_string(),
                description: "Make ledger writes idempotent.".to_string(),
                difficulty: Difficulty::Advanced,
                time_limit: 90,
                challenge_type: ChallengeType::Coding,
                challenge_question: "Implement an idempotent append.".to_string(),
                max_score: 100,
            }],
            rationale: "Exercises correctness under retries".to_string(),
        };
        let oracle = FakeOracle {
            suggestions: Some(expected.clone()),
            ..FakeOracle::default()
        };
        assert_eq!(suggest_for_project(&oracle, &brief()).await, expected);
    }
}
