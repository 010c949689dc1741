use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::aptitude::ChallengeOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    #[default]
    Coding,
    SystemDesign,
    Algorithm,
    Debugging,
    Architecture,
}

impl ChallengeType {
    /// Accepts loose spellings such as `"System Design"` or `"system-design"`.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "coding" => Some(Self::Coding),
            "system_design" => Some(Self::SystemDesign),
            "algorithm" => Some(Self::Algorithm),
            "debugging" => Some(Self::Debugging),
            "architecture" => Some(Self::Architecture),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::SystemDesign => "system_design",
            Self::Algorithm => "algorithm",
            Self::Debugging => "debugging",
            Self::Architecture => "architecture",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            "expert" => Some(Self::Expert),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }
}

/// A fully-typed challenge descriptor, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSpec {
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub time_limit: i32, // minutes
    pub challenge_type: ChallengeType,
    pub challenge_question: String,
    pub max_score: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedSkill {
    pub name: String,
    pub level: i32, // 0 – 100
    pub validated: bool,
    pub challenge: ChallengeSpec,
}

/// Validated output of the resume extraction oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillExtraction {
    pub aptitude: i32, // 0 – 1000 seed
    pub skills: Vec<ExtractedSkill>,
}

/// Validated output of the grading oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingResult {
    pub score: i32, // 0 – challenge.max_score
    pub accuracy_rate: f64,
    pub bugs_found: i32,
    pub bugs_missed: i32,
    pub false_positives: i32,
    pub feedback: String,
    /// Free-form and untrusted; stored as-is.
    pub evaluation_details: Value,
}

impl GradingResult {
    pub fn outcome(&self, max_score: i32) -> ChallengeOutcome {
        ChallengeOutcome::new(self.score, max_score)
    }
}

/// Validated output of the recruiter suggestion oracle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeSuggestions {
    pub challenges: Vec<ChallengeSpec>,
    pub rationale: String,
}

/// Profile fields sent alongside resume text to the extraction oracle.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeProfile {
    pub full_name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub experience_level: String,
    pub availability: String,
    pub portfolio_links: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionAnswer {
    pub bug_analysis: String,
    pub answer: String,
}
