//! Fit Scoring: pluggable, trait-based scorer that measures a developer against a
//! project's weighted skill requirements.
//!
//! Default: `WeightedSkillFitScorer` (pure, deterministic, no I/O).
//!
//! `AppState` holds an `Arc<dyn FitScorer>`; the ranking service only sees the trait.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::aptitude::{APTITUDE_MAX, APTITUDE_MIN};
use crate::scoring::normalize::{clamp_float, clamp_int, round_to};

/// Requirements configured below this level still carry this much weight.
pub const MIN_REQUIREMENT_WEIGHT: i32 = 10;
/// Additive ratio credit for a skill claim backed by external evidence.
pub const VALIDATION_BONUS: f64 = 0.10;
/// Maximum number of fit points the aptitude adjustment can add.
pub const APTITUDE_POINTS: f64 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Input data models
// ────────────────────────────────────────────────────────────────────────────

/// A project's need for a named skill at a minimum proficiency (0–100).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillRequirement {
    pub name: String,
    pub required_level: i32,
}

impl SkillRequirement {
    pub fn new(name: impl Into<String>, required_level: i32) -> Self {
        Self {
            name: name.into(),
            required_level,
        }
    }

    pub fn weight(&self) -> i32 {
        self.required_level.max(MIN_REQUIREMENT_WEIGHT)
    }
}

/// Collapses duplicate `(name, required_level)` pairs, keeping first-seen order.
pub fn collapse_requirements(
    requirements: impl IntoIterator<Item = SkillRequirement>,
) -> Vec<SkillRequirement> {
    let mut seen = HashSet::new();
    requirements
        .into_iter()
        .filter(|r| seen.insert((r.name.clone(), r.required_level)))
        .collect()
}

/// Canonical lookup key for skill names: trimmed, lowercased.
pub fn skill_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A developer's assessed proficiency in one named skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperSkill {
    pub name: String,
    pub level: i32,
    pub validated: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkillClaim {
    pub level: i32,
    pub validated: bool,
}

/// Immutable snapshot of everything the scorer needs about one developer.
#[derive(Debug, Clone)]
pub struct DeveloperProfile {
    pub developer_id: Uuid,
    pub aptitude: i32,
    skills: HashMap<String, SkillClaim>,
}

impl DeveloperProfile {
    pub fn new(developer_id: Uuid, aptitude: i32) -> Self {
        Self {
            developer_id,
            aptitude,
            skills: HashMap::new(),
        }
    }

    pub fn with_skills(
        developer_id: Uuid,
        aptitude: i32,
        skills: impl IntoIterator<Item = DeveloperSkill>,
    ) -> Self {
        let mut profile = Self::new(developer_id, aptitude);
        for skill in skills {
            profile.insert_skill(skill);
        }
        profile
    }

    /// Last write wins on names that normalize to the same key.
    pub fn insert_skill(&mut self, skill: DeveloperSkill) {
        self.skills.insert(
            skill_key(&skill.name),
            SkillClaim {
                level: skill.level,
                validated: skill.validated,
            },
        );
    }

    pub fn skill(&self, name: &str) -> Option<SkillClaim> {
        self.skills.get(&skill_key(name)).copied()
    }

    pub fn skill_count(&self) -> usize {
        self.skills.len()
    }

    fn bounded_aptitude(&self) -> f64 {
        clamp_int(self.aptitude as i64, APTITUDE_MIN as i64, APTITUDE_MAX as i64) as f64
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    SkillWeighted,
    /// The project has no requirements; aptitude alone decides.
    AptitudeOnly,
}

/// One requirement's row in the breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillContribution {
    pub skill: String,
    pub required_level: i32,
    pub developer_level: i32,
    pub validated: bool,
    pub ratio: f64,        // 3 decimals
    pub weight: i32,
    pub contribution: f64, // 3 decimals
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitBreakdown {
    pub mode: FitMode,
    pub skills: Vec<SkillContribution>,
    pub skill_score: f64,        // 0 – 100, 2 decimals
    pub aptitude_component: f64, // 0 – 10 (0 – 100 in aptitude-only mode), 2 decimals
    pub note: Option<String>,
}

/// Fit report for one (project, developer) pair. Computed on demand, never a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub score: f64, // 0 – 100, 2 decimals
    /// Unrounded score used for ordering.
    #[serde(skip)]
    pub raw_score: f64,
    pub breakdown: FitBreakdown,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to swap scoring backends without touching ranking or handlers.
pub trait FitScorer: Send + Sync {
    fn score(&self, requirements: &[SkillRequirement], developer: &DeveloperProfile) -> FitResult;
}

/// Weighted skill-gap scorer with a validation bonus and an aptitude adjustment.
///
/// Per requirement `r`:
/// - `weight = max(10, r.required_level)`
/// - `ratio = min(1, level / max(1, r.required_level))`
/// - `contribution = (ratio + 0.10 if validated) * weight`
///
/// `skill_score = Σ contribution / Σ weight × 100`, then
/// `final = clamp(skill_score + aptitude / 1000 × 10, 0, 100)`.
pub struct WeightedSkillFitScorer;

impl FitScorer for WeightedSkillFitScorer {
    fn score(&self, requirements: &[SkillRequirement], developer: &DeveloperProfile) -> FitResult {
        compute_fit_score(requirements, developer)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core algorithm
// ────────────────────────────────────────────────────────────────────────────

pub fn compute_fit_score(
    requirements: &[SkillRequirement],
    developer: &DeveloperProfile,
) -> FitResult {
    let aptitude = developer.bounded_aptitude();

    if requirements.is_empty() {
        let base = clamp_float(aptitude / 10.0, 0.0, 100.0);
        return FitResult {
            score: round_to(base, 2),
            raw_score: base,
            breakdown: FitBreakdown {
                mode: FitMode::AptitudeOnly,
                skills: vec![],
                skill_score: 0.0,
                aptitude_component: round_to(base, 2),
                note: Some("No project skills; using aptitude only.".to_string()),
            },
        };
    }

    let mut total_weight = 0.0_f64;
    let mut skill_component = 0.0_f64;
    let mut rows = Vec::with_capacity(requirements.len());

    for req in requirements {
        let weight = req.weight();
        let claim = developer.skill(&req.name).unwrap_or_default();

        let ratio = (claim.level as f64 / (req.required_level as f64).max(1.0)).min(1.0);
        let bonus = if claim.validated { VALIDATION_BONUS } else { 0.0 };
        let contribution = (ratio + bonus) * weight as f64;

        total_weight += weight as f64;
        skill_component += contribution;

        rows.push(SkillContribution {
            skill: req.name.clone(),
            required_level: req.required_level,
            developer_level: claim.level,
            validated: claim.validated,
            ratio: round_to(ratio, 3),
            weight,
            contribution: round_to(contribution, 3),
        });
    }

    let skill_score = if total_weight > 0.0 {
        clamp_float((skill_component / total_weight) * 100.0, 0.0, 100.0)
    } else {
        0.0
    };
    let aptitude_component = (aptitude / APTITUDE_MAX as f64) * APTITUDE_POINTS;
    let final_score = clamp_float(skill_score + aptitude_component, 0.0, 100.0);

    FitResult {
        score: round_to(final_score, 2),
        raw_score: final_score,
        breakdown: FitBreakdown {
            mode: FitMode::SkillWeighted,
            skills: rows,
            skill_score: round_to(skill_score, 2),
            aptitude_component: round_to(aptitude_component, 2),
            note: None,
        },
    }
}
