#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

use crate::talent::models::{ChallengeSpec, ChallengeType, Difficulty};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeveloperRow {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub experience_level: String,
    pub availability: String,
    #[serde(skip_serializing)]
    pub resume_text: Option<String>,
    pub aptitude: i32,
    pub validation_status: String,
    pub portfolio_links: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeveloperSkillRow {
    pub developer_id: Uuid,
    pub name_key: String,
    pub name: String,
    pub level: i32,
    pub validated: bool,
    pub challenge_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChallengeRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub time_limit: i32,
    pub challenge_type: String,
    pub challenge_question: String,
    pub max_score: i32,
}

impl ChallengeRow {
    /// Typed view handed to the grading oracle. Unknown stored labels fall back to defaults.
    pub fn spec(&self) -> ChallengeSpec {
        ChallengeSpec {
            title: self.title.clone(),
            description: self.description.clone(),
            difficulty: Difficulty::parse(&self.difficulty).unwrap_or_default(),
            time_limit: self.time_limit,
            challenge_type: ChallengeType::parse(&self.challenge_type).unwrap_or_default(),
            challenge_question: self.challenge_question.clone(),
            max_score: self.max_score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubmissionRow {
    pub id: Uuid,
    pub developer_id: Uuid,
    pub challenge_id: Uuid,
    pub bug_analysis: String,
    pub answer: String,
    pub score: Option<i32>,
    pub accuracy_rate: Option<f64>,
    pub bugs_found: Option<i32>,
    pub bugs_missed: Option<i32>,
    pub false_positives: Option<i32>,
    pub status: String,
    pub ai_feedback: String,
    pub evaluation_details: Option<Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    Pending,
    Evaluating,
    Completed,
    /// Grading oracle failed; the submission can be retried.
    Failed,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Evaluating => "evaluating",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    NotValidated,
    PartiallyValidated,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotValidated => "not_validated",
            Self::PartiallyValidated => "partially_validated",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    #[default]
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
}

impl ExperienceLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "junior" => Some(Self::Junior),
            "mid" => Some(Self::Mid),
            "senior" => Some(Self::Senior),
            "lead" => Some(Self::Lead),
            "principal" => Some(Self::Principal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Lead => "lead",
            Self::Principal => "principal",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    Available,
    OpenToOffers,
    NotAvailable,
}

impl Availability {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "available" => Some(Self::Available),
            "open_to_offers" => Some(Self::OpenToOffers),
            "not_available" => Some(Self::NotAvailable),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::OpenToOffers => "open_to_offers",
            Self::NotAvailable => "not_available",
        }
    }
}
