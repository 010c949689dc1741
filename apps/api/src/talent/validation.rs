//! Oracle result validation: turns untrusted oracle JSON into typed, bounded values.
//!
//! Nothing here fails. Malformed entries are dropped or defaulted one at a time so a
//! single bad skill or challenge never invalidates the rest of the batch. All
//! "which shape did the model use" logic lives in this module.

use serde_json::{Map, Value};

use crate::llm_client::strip_json_fences;
use crate::scoring::aptitude::seed_aptitude;
use crate::scoring::normalize::{clamp_float, clamp_int};
use crate::talent::models::{
    ChallengeSpec, ChallengeSuggestions, ChallengeType, Difficulty, ExtractedSkill,
    GradingResult, SkillExtraction,
};

pub const MAX_TEXT_CHARS: usize = 4000;
pub const DEFAULT_SKILL_LEVEL: i64 = 50;
pub const DEFAULT_TIME_LIMIT: i32 = 60;
pub const DEFAULT_MAX_SCORE: i32 = 100;

/// Wrapper keys some providers nest the real payload under.
const ENVELOPE_KEYS: &[&str] = &["content", "data", "body", "result"];

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Validates a resume extraction payload: `{dev_score, skills: [...]}`.
pub fn validate_extraction(raw: &Value) -> SkillExtraction {
    let payload = unwrap_payload(raw, "skills");

    let aptitude = payload
        .get("dev_score")
        .or_else(|| payload.get("aptitude"))
        .and_then(coerce_int)
        .unwrap_or(0);

    let skills = payload
        .get("skills")
        .and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(sanitize_skill).collect())
        .unwrap_or_default();

    SkillExtraction {
        aptitude: seed_aptitude(aptitude),
        skills,
    }
}

/// Validates a grading payload against the graded challenge's `max_score`.
///
/// Non-numeric fields count as 0. If `max_score <= 0` the score range collapses to 0.
pub fn validate_grading(raw: &Value, max_score: i32) -> GradingResult {
    let payload = unwrap_payload(raw, "score");

    let int_field = |key: &str| payload.get(key).and_then(coerce_int).unwrap_or(0);

    let score = clamp_int(int_field("score"), 0, max_score as i64) as i32;
    let accuracy_rate = clamp_float(
        payload
            .get("accuracy_rate")
            .and_then(coerce_float)
            .unwrap_or(0.0),
        0.0,
        100.0,
    );
    let counter = |key: &str| clamp_int(int_field(key), 0, i32::MAX as i64) as i32;

    let feedback = payload
        .get("ai_feedback")
        .or_else(|| payload.get("feedback"))
        .map(text_of)
        .unwrap_or_default();

    GradingResult {
        score,
        accuracy_rate,
        bugs_found: counter("bugs_found"),
        bugs_missed: counter("bugs_missed"),
        false_positives: counter("false_positives"),
        feedback: truncate_chars(&feedback, MAX_TEXT_CHARS),
        evaluation_details: payload
            .get("evaluation_details")
            .filter(|v| !v.is_null())
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new())),
    }
}

/// Validates recruiter challenge suggestions: `{challenges: [...], rationale}`.
pub fn validate_suggestions(raw: &Value) -> ChallengeSuggestions {
    let payload = unwrap_payload(raw, "challenges");

    let challenges = payload
        .get("challenges")
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_object())
                .filter_map(|obj| sanitize_challenge(obj, None))
                .collect()
        })
        .unwrap_or_default();

    let rationale = payload.get("rationale").map(text_of).unwrap_or_default();

    ChallengeSuggestions {
        challenges,
        rationale: truncate_chars(&rationale, MAX_TEXT_CHARS),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry sanitizers
// ────────────────────────────────────────────────────────────────────────────

fn sanitize_skill(entry: &Value) -> Option<ExtractedSkill> {
    let obj = entry.as_object()?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|n| !n.is_empty())?;
    let name = truncate_chars(name, MAX_TEXT_CHARS);

    // Absent level defaults; a present but garbled level drops the entry.
    let level = match obj.get("level") {
        None | Some(Value::Null) => DEFAULT_SKILL_LEVEL,
        Some(v) => coerce_int(v)?,
    };

    let validated = obj.get("validated").map(coerce_bool).unwrap_or(false);

    let empty = Map::new();
    let challenge_obj = obj
        .get("challenge")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let challenge = sanitize_challenge(challenge_obj, Some(name.as_str()))?;

    Some(ExtractedSkill {
        level: clamp_int(level, 0, 100) as i32,
        validated,
        challenge,
        name,
    })
}

/// With a `skill` name every text field has a skill-specific default; without one
/// (recruiter suggestions) a challenge must at least carry a title.
fn sanitize_challenge(obj: &Map<String, Value>, skill: Option<&str>) -> Option<ChallengeSpec> {
    let text = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| truncate_chars(s, MAX_TEXT_CHARS))
    };

    let title = match (text("title"), skill) {
        (Some(title), _) => title,
        (None, Some(name)) => format!("{name} Validation Challenge"),
        (None, None) => return None,
    };
    let description = text("description").unwrap_or_else(|| match skill {
        Some(name) => format!("Validate {name} with a targeted task."),
        None => String::new(),
    });
    let challenge_question = text("challenge_question").unwrap_or_else(|| match skill {
        Some(name) => format!("Demonstrate {name} proficiency."),
        None => String::new(),
    });

    let difficulty = obj
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(Difficulty::parse)
        .unwrap_or_default();
    let challenge_type = obj
        .get("challenge_type")
        .and_then(Value::as_str)
        .and_then(ChallengeType::parse)
        .unwrap_or_default();

    let time_limit = obj
        .get("time_limit")
        .and_then(coerce_int)
        .filter(|minutes| *minutes > 0)
        .map(|minutes| clamp_int(minutes, 1, i32::MAX as i64) as i32)
        .unwrap_or(DEFAULT_TIME_LIMIT);
    let max_score = obj
        .get("max_score")
        .and_then(coerce_int)
        .filter(|score| *score > 0)
        .map(|score| clamp_int(score, 1, i32::MAX as i64) as i32)
        .unwrap_or(DEFAULT_MAX_SCORE);

    Some(ChallengeSpec {
        title: truncate_chars(&title, MAX_TEXT_CHARS),
        description: truncate_chars(&description, MAX_TEXT_CHARS),
        difficulty,
        time_limit,
        challenge_type,
        challenge_question: truncate_chars(&challenge_question, MAX_TEXT_CHARS),
        max_score,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Shape and scalar coercion
// ────────────────────────────────────────────────────────────────────────────

/// Parses string payloads and descends through envelope keys until `expected_key` shows up.
fn unwrap_payload(raw: &Value, expected_key: &str) -> Value {
    let mut value = match raw {
        Value::String(text) => serde_json::from_str(strip_json_fences(text)).unwrap_or(Value::Null),
        other => other.clone(),
    };

    while value.get(expected_key).is_none() {
        let Some(inner) = ENVELOPE_KEYS
            .iter()
            .find_map(|key| value.get(*key).filter(|v| v.is_object()).cloned())
        else {
            break;
        };
        value = inner;
    }
    value
}

fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| finite_trunc(n.as_f64()?)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| finite_trunc(s.parse::<f64>().ok()?))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

fn coerce_float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "y" | "1"),
        _ => false,
    }
}

fn finite_trunc(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extraction_clamps_aptitude_and_levels() {
        let raw = json!({
            "dev_score": 4200,
            "skills": [
                {"name": "Rust", "level": 140, "validated": true},
                {"name": "SQL", "level": -5}
            ]
        });
        let result = validate_extraction(&raw);
        assert_eq!(result.aptitude, 1000);
        assert_eq!(result.skills.len(), 2);
        assert_eq!(result.skills[0].level, 100);
        assert!(result.skills[0].validated);
        assert_eq!(result.skills[1].level, 0);
        assert!(!result.skills[1].validated);
    }

    #[test]
    fn test_extraction_drops_nameless_and_garbled_entries() {
        let raw = json!({
            "dev_score": "610",
            "skills": [
                {"level": 80},
                {"name": "   ", "level": 80},
                {"name": "Go", "level": "expert"},
                "not an object",
                {"name": " Kubernetes ", "level": "72.9"},
                {"name": "Python"}
            ]
        });
        let result = validate_extraction(&raw);
        assert_eq!(result.aptitude, 610);
        let names: Vec<&str> = result.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Kubernetes", "Python"]);
        assert_eq!(result.skills[0].level, 72);
        assert_eq!(result.skills[1].level, 50);
    }

    #[test]
    fn test_extraction_non_numeric_aptitude_is_zero() {
        let result = validate_extraction(&json!({"dev_score": "lots", "skills": []}));
        assert_eq!(result.aptitude, 0);
        assert!(result.skills.is_empty());
    }

    #[test]
    fn test_extraction_of_garbage_is_empty() {
        assert_eq!(validate_extraction(&json!(null)), SkillExtraction::default());
        assert_eq!(validate_extraction(&json!([1, 2, 3])), SkillExtraction::default());
        assert_eq!(
            validate_extraction(&json!({"skills": "Rust, Go"})),
            SkillExtraction::default()
        );
    }

    #[test]
    fn test_challenge_defaults_use_skill_name() {
        let result = validate_extraction(&json!({"skills": [{"name": "Django", "level": 60}]}));
        let challenge = &result.skills[0].challenge;
        assert_eq!(challenge.title, "Django Validation Challenge");
        assert_eq!(challenge.description, "Validate Django with a targeted task.");
        assert_eq!(challenge.challenge_question, "Demonstrate Django proficiency.");
        assert_eq!(challenge.difficulty, Difficulty::Intermediate);
        assert_eq!(challenge.challenge_type, ChallengeType::Coding);
        assert_eq!(challenge.time_limit, 60);
        assert_eq!(challenge.max_score, 100);
    }

    #[test]
    fn test_challenge_fields_normalized_and_truncated() {
        let long = "x".repeat(5000);
        let raw = json!({"skills": [{
            "name": "Postgres",
            "level": 70,
            "challenge": {
                "title": "  Index tuning  ",
                "description": long,
                "difficulty": "ADVANCED",
                "time_limit": "90",
                "challenge_type": "System Design",
                "challenge_question": "Design the schema.",
                "max_score": 50
            }
        }]});
        let challenge = &validate_extraction(&raw).skills[0].challenge;
        assert_eq!(challenge.title, "Index tuning");
        assert_eq!(challenge.description.chars().count(), MAX_TEXT_CHARS);
        assert_eq!(challenge.difficulty, Difficulty::Advanced);
        assert_eq!(challenge.challenge_type, ChallengeType::SystemDesign);
        assert_eq!(challenge.time_limit, 90);
        assert_eq!(challenge.max_score, 50);
    }

    #[test]
    fn test_non_positive_max_score_falls_back_to_default() {
        for bad in [json!(0), json!(-20), json!("0"), json!("abc")] {
            let out = validate_extraction(&json!({
                "skills": [{"name": "Rust", "challenge": {"title": "T", "max_score": bad}}]
            }));
            let challenge = &out.skills[0].challenge;
            assert_eq!(challenge.max_score, DEFAULT_MAX_SCORE);

            // A perfect answer to the stored challenge must not lower aptitude.
            let grading = validate_grading(&json!({"score": 100}), challenge.max_score);
            let evolved = crate::scoring::aptitude::evolve_aptitude(
                1000,
                grading.outcome(challenge.max_score),
                crate::scoring::aptitude::AptitudeWeights::default(),
            );
            assert_eq!(evolved, 1000);
        }
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let text = "é".repeat(4100);
        assert_eq!(truncate_chars(&text, MAX_TEXT_CHARS).chars().count(), 4000);
    }

    #[test]
    fn test_validated_coercion() {
        assert!(coerce_bool(&json!("Yes")));
        assert!(coerce_bool(&json!(1)));
        assert!(!coerce_bool(&json!("false")));
        assert!(!coerce_bool(&json!(0)));
        assert!(!coerce_bool(&json!({"evidence": true})));
    }

    #[test]
    fn test_grading_clamps_to_max_score() {
        let raw = json!({
            "score": 180,
            "accuracy_rate": 120.5,
            "bugs_found": 4,
            "bugs_missed": -2,
            "false_positives": "1",
            "ai_feedback": "Solid triage.",
            "evaluation_details": {"rubric": [1, 2]}
        });
        let result = validate_grading(&raw, 100);
        assert_eq!(result.score, 100);
        assert_eq!(result.accuracy_rate, 100.0);
        assert_eq!(result.bugs_found, 4);
        assert_eq!(result.bugs_missed, 0);
        assert_eq!(result.false_positives, 1);
        assert_eq!(result.feedback, "Solid triage.");
        assert_eq!(result.evaluation_details, json!({"rubric": [1, 2]}));
    }

    #[test]
    fn test_grading_with_collapsed_max_score_is_zero() {
        let result = validate_grading(&json!({"score": 40}), 0);
        assert_eq!(result.score, 0);
        let result = validate_grading(&json!({"score": 40}), -10);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_grading_defaults_when_fields_missing_or_garbled() {
        let result = validate_grading(&json!({"score": "n/a", "accuracy_rate": "high"}), 100);
        assert_eq!(result.score, 0);
        assert_eq!(result.accuracy_rate, 0.0);
        assert_eq!(result.feedback, "");
        assert_eq!(result.evaluation_details, json!({}));
    }

    #[test]
    fn test_grading_feedback_truncated() {
        let result = validate_grading(&json!({"score": 1, "feedback": "f".repeat(9000)}), 10);
        assert_eq!(result.feedback.len(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_payload_inside_envelope_or_string() {
        let wrapped = json!({"data": {"dev_score": 300, "skills": [{"name": "Rust"}]}});
        assert_eq!(validate_extraction(&wrapped).aptitude, 300);

        let fenced = json!("```json\n{\"score\": 7}\n```");
        assert_eq!(validate_grading(&fenced, 10).score, 7);

        let nested = json!({"result": {"content": {"challenges": [{"title": "Cache"}]}}});
        assert_eq!(validate_suggestions(&nested).challenges.len(), 1);
    }

    #[test]
    fn test_suggestions_require_title_and_normalize() {
        let raw = json!({
            "challenges": [
                {"title": "Rate limiter", "difficulty": " Expert ", "challenge_type": "algorithm", "time_limit": "abc", "max_score": "80"},
                {"description": "no title"},
                42
            ],
            "rationale": "Stress-tests concurrency."
        });
        let result = validate_suggestions(&raw);
        assert_eq!(result.challenges.len(), 1);
        let challenge = &result.challenges[0];
        assert_eq!(challenge.difficulty, Difficulty::Expert);
        assert_eq!(challenge.challenge_type, ChallengeType::Algorithm);
        assert_eq!(challenge.time_limit, 60);
        assert_eq!(challenge.max_score, 80);
        assert_eq!(challenge.description, "");
        assert_eq!(result.rationale, "Stress-tests concurrency.");
    }

    #[test]
    fn test_suggestions_from_garbage_are_empty() {
        assert_eq!(validate_suggestions(&json!("not json")), ChallengeSuggestions::default());
    }
}
