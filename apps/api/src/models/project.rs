#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::recruiting::fit_scoring::SkillRequirement;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub project_name: String,
    pub description: String,
    pub status: String,
    pub automation_enabled: bool,
    pub target_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectSkillRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub name: String,
    pub required_level: i32,
}

impl ProjectSkillRow {
    pub fn requirement(&self) -> SkillRequirement {
        SkillRequirement::new(self.name.clone(), self.required_level)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRecommendationRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub developer_id: Uuid,
    pub fit_score: f64,
    pub rationale: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvitationRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub developer_id: Uuid,
    pub challenge_id: Option<Uuid>,
    pub status: String,
    pub message: String,
    pub sent_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Draft,
    Matching,
    Challenging,
    Closed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Matching => "matching",
            Self::Challenging => "challenging",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    Sent,
    Accepted,
    Declined,
    Expired,
    Completed,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
            Self::Completed => "completed",
        }
    }
}
