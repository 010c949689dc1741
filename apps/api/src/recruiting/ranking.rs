//! Candidate ranking: applies a `FitScorer` across the developer population and
//! returns a bounded leaderboard.
//!
//! Ordering: fit score descending (unrounded), ties broken by developer id ascending
//! so the result never depends on the order the population was loaded in.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::recruiting::fit_scoring::{
    DeveloperProfile, FitBreakdown, FitResult, FitScorer, SkillRequirement,
};

/// Caller-supplied ranking sizes for the three places recommendations are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingLimits {
    /// On-demand recomputation.
    pub default: usize,
    /// Stored when a project is created.
    pub creation: usize,
    /// Echoed back in the create-project response.
    pub summary: usize,
}

impl Default for RankingLimits {
    fn default() -> Self {
        Self {
            default: 50,
            creation: 100,
            summary: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedCandidate {
    pub developer_id: Uuid,
    pub fit: FitResult,
}

impl RankedCandidate {
    pub fn rationale(&self) -> String {
        build_rationale(&self.fit.breakdown)
    }
}

/// Scores every developer (no early exit) and keeps the best `limit`.
pub fn rank_candidates(
    scorer: &dyn FitScorer,
    requirements: &[SkillRequirement],
    developers: &[DeveloperProfile],
    limit: usize,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = developers
        .iter()
        .map(|developer| RankedCandidate {
            developer_id: developer.developer_id,
            fit: scorer.score(requirements, developer),
        })
        .collect();

    ranked.sort_by(compare_candidates);
    ranked.truncate(limit);
    ranked
}

fn compare_candidates(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    b.fit
        .raw_score
        .total_cmp(&a.fit.raw_score)
        .then_with(|| a.developer_id.cmp(&b.developer_id))
}

/// `"Skill match {skill_score}%, dev adj {aptitude_component}"`. Consumers parse this shape.
pub fn build_rationale(breakdown: &FitBreakdown) -> String {
    format!(
        "Skill match {}%, dev adj {}",
        format_decimal(breakdown.skill_score),
        format_decimal(breakdown.aptitude_component)
    )
}

/// Whole numbers keep one decimal place (`5.0`), everything else prints as-is (`62.35`).
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recruiting::fit_scoring::{DeveloperSkill, WeightedSkillFitScorer};

    fn id(n: u128) -> Uuid {
        Uuid::from_u128(n)
    }

    fn dev(n: u128, aptitude: i32, rust_level: Option<i32>) -> DeveloperProfile {
        DeveloperProfile::with_skills(
            id(n),
            aptitude,
            rust_level.map(|level| DeveloperSkill {
                name: "Rust".to_string(),
                level,
                validated: false,
            }),
        )
    }

    fn rust_req() -> Vec<SkillRequirement> {
        vec![SkillRequirement::new("Rust", 80)]
    }

    #[test]
    fn test_sorted_descending_by_fit() {
        let developers = vec![
            dev(1, 100, Some(20)),
            dev(2, 100, Some(80)),
            dev(3, 100, None),
            dev(4, 100, Some(50)),
        ];
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 10);
        let order: Vec<Uuid> = ranked.iter().map(|c| c.developer_id).collect();
        assert_eq!(order, vec![id(2), id(4), id(1), id(3)]);
    }

    #[test]
    fn test_truncates_to_limit() {
        let developers: Vec<_> = (0..30).map(|n| dev(n, (n * 10) as i32, Some(40))).collect();
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 20);
        assert_eq!(ranked.len(), 20);
        assert_eq!(ranked[0].developer_id, id(29));
    }

    #[test]
    fn test_limit_larger_than_population() {
        let developers = vec![dev(1, 0, None), dev(2, 0, None)];
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 100);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_empty_population_yields_empty_ranking() {
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &[], 50);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_ties_broken_by_developer_id() {
        let developers = vec![dev(9, 500, Some(40)), dev(3, 500, Some(40)), dev(5, 500, Some(40))];
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 10);
        let order: Vec<Uuid> = ranked.iter().map(|c| c.developer_id).collect();
        assert_eq!(order, vec![id(3), id(5), id(9)]);

        let mut reversed = developers.clone();
        reversed.reverse();
        let again = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &reversed, 10);
        assert_eq!(ranked, again);
    }

    #[test]
    fn test_rationale_format() {
        let developers = vec![dev(1, 500, None)];
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 1);
        assert_eq!(ranked[0].rationale(), "Skill match 0.0%, dev adj 5.0");
    }

    #[test]
    fn test_rationale_keeps_fractional_values() {
        // Rust 50/80 = 0.625 -> 62.5%, aptitude 123 -> 1.23
        let developers = vec![dev(1, 123, Some(50))];
        let ranked = rank_candidates(&WeightedSkillFitScorer, &rust_req(), &developers, 1);
        assert_eq!(ranked[0].rationale(), "Skill match 62.5%, dev adj 1.23");
    }

    #[test]
    fn test_default_limits() {
        let limits = RankingLimits::default();
        assert_eq!((limits.default, limits.creation, limits.summary), (50, 100, 20));
    }
}
