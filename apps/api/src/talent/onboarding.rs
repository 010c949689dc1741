//! Developer onboarding: profile form + resume PDF → stored developer with an
//! aptitude seed and validated skills.

use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::developer::{Availability, DeveloperRow, DeveloperSkillRow, ExperienceLevel};
use crate::talent::models::{ResumeProfile, SkillExtraction};
use crate::talent::oracle::{OracleError, TalentOracle};
use crate::talent::repository::{self, NewDeveloper};

/// Raw multipart text fields, as received.
#[derive(Debug, Default)]
pub struct DeveloperForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub experience_level: Option<String>,
    pub availability: Option<String>,
    pub portfolio_links: Option<String>,
}

impl DeveloperForm {
    /// Returns `false` for field names the form does not know.
    pub fn set(&mut self, field: &str, value: String) -> bool {
        let slot = match field {
            "full_name" => &mut self.full_name,
            "email" => &mut self.email,
            "bio" => &mut self.bio,
            "location" => &mut self.location,
            "experience_level" => &mut self.experience_level,
            "availability" => &mut self.availability,
            "portfolio_links" => &mut self.portfolio_links,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn validate(self) -> Result<ValidatedProfile, AppError> {
        let email = non_blank(self.email)
            .ok_or_else(|| AppError::Validation("email is required".to_string()))?;
        if !email.contains('@') {
            return Err(AppError::Validation(format!("Invalid email: {email}")));
        }

        let experience_level = match non_blank(self.experience_level) {
            Some(raw) => ExperienceLevel::parse(&raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown experience_level: {raw}")))?,
            None => ExperienceLevel::default(),
        };
        let availability = match non_blank(self.availability) {
            Some(raw) => Availability::parse(&raw)
                .ok_or_else(|| AppError::Validation(format!("Unknown availability: {raw}")))?,
            None => Availability::default(),
        };
        let portfolio_links = match non_blank(self.portfolio_links) {
            Some(raw) => serde_json::from_str::<Vec<String>>(&raw).map_err(|_| {
                AppError::Validation("portfolio_links must be a JSON array of strings".to_string())
            })?,
            None => Vec::new(),
        };

        Ok(ValidatedProfile {
            full_name: non_blank(self.full_name),
            email,
            bio: self.bio.unwrap_or_default().trim().to_string(),
            location: self.location.unwrap_or_default().trim().to_string(),
            experience_level,
            availability,
            portfolio_links,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedProfile {
    /// Only required when the email is not yet registered.
    pub full_name: Option<String>,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub experience_level: ExperienceLevel,
    pub availability: Availability,
    pub portfolio_links: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct OnboardResponse {
    pub developer: DeveloperRow,
    pub skills: Vec<DeveloperSkillRow>,
}

pub async fn onboard_developer(
    pool: &PgPool,
    oracle: &dyn TalentOracle,
    profile: ValidatedProfile,
    resume_text: String,
) -> Result<OnboardResponse, AppError> {
    let developer = match repository::find_developer_by_email(pool, &profile.email).await? {
        Some(existing) => {
            repository::update_resume_text(pool, existing.id, &resume_text).await?;
            existing
        }
        None => {
            let full_name = profile.full_name.as_deref().ok_or_else(|| {
                AppError::Validation("full_name is required for new developers".to_string())
            })?;
            repository::insert_developer(
                pool,
                &NewDeveloper {
                    full_name,
                    email: &profile.email,
                    bio: &profile.bio,
                    location: &profile.location,
                    experience_level: profile.experience_level.as_str(),
                    availability: profile.availability.as_str(),
                    portfolio_links: serde_json::json!(profile.portfolio_links),
                    resume_text: &resume_text,
                },
            )
            .await?
        }
    };

    let extraction = if resume_text.is_empty() {
        warn!(developer_id = %developer.id, "Resume has no extractable text; skipping skill extraction");
        SkillExtraction::default()
    } else {
        let resume_profile = ResumeProfile {
            full_name: developer.full_name.clone(),
            email: developer.email.clone(),
            bio: developer.bio.clone(),
            location: developer.location.clone(),
            experience_level: developer.experience_level.clone(),
            availability: developer.availability.clone(),
            portfolio_links: profile.portfolio_links.clone(),
        };
        let result = oracle.extract_skills(&resume_text, &resume_profile).await;
        extraction_or_zero_fill(developer.id, result)
    };

    let (developer, skills) = repository::apply_extraction(pool, developer.id, &extraction).await?;
    info!(
        developer_id = %developer.id,
        aptitude = developer.aptitude,
        skills = skills.len(),
        "Developer onboarded"
    );

    Ok(OnboardResponse { developer, skills })
}

/// A failed extraction leaves the developer with aptitude 0 and no skills.
pub fn extraction_or_zero_fill(
    developer_id: Uuid,
    result: Result<SkillExtraction, OracleError>,
) -> SkillExtraction {
    match result {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!(developer_id = %developer_id, "Skill extraction failed, zero-filling: {e}");
            SkillExtraction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::talent::oracle::fake::FakeOracle;
    use crate::talent::validation::validate_extraction;

    fn form(fields: &[(&str, &str)]) -> DeveloperForm {
        let mut form = DeveloperForm::default();
        for (name, value) in fields {
            assert!(form.set(name, value.to_string()));
        }
        form
    }

    #[test]
    fn test_minimal_form_gets_defaults() {
        let profile = form(&[("email", " ada@example.com ")]).validate().unwrap();
        assert_eq!(profile.email, "ada@example.com");
        assert_eq!(profile.full_name, None);
        assert_eq!(profile.experience_level, ExperienceLevel::Junior);
        assert_eq!(profile.availability, Availability::Available);
        assert!(profile.portfolio_links.is_empty());
    }

    #[test]
    fn test_full_form_parses() {
        let profile = form(&[
            ("full_name", "Ada Lovelace"),
            ("email", "ada@example.com"),
            ("experience_level", "Senior"),
            ("availability", "open_to_offers"),
            ("portfolio_links", r#"["https://example.com/ada"]"#),
        ])
        .validate()
        .unwrap();
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.experience_level, ExperienceLevel::Senior);
        assert_eq!(profile.availability, Availability::OpenToOffers);
        assert_eq!(profile.portfolio_links, vec!["https://example.com/ada"]);
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let result = form(&[("full_name", "Ada")]).validate();
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_bad_enum_and_links_are_rejected() {
        assert!(form(&[("email", "a@b.c"), ("experience_level", "wizard")])
            .validate()
            .is_err());
        assert!(form(&[("email", "a@b.c"), ("portfolio_links", "not json")])
            .validate()
            .is_err());
    }

    fn resume_profile() -> ResumeProfile {
        ResumeProfile {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            bio: String::new(),
            location: String::new(),
            experience_level: "senior".to_string(),
            availability: "available".to_string(),
            portfolio_links: vec![],
        }
    }

    #[tokio::test]
    async fn test_failed_extraction_zero_fills() {
        let oracle = FakeOracle::default();
        let result = oracle.extract_skills("Rust, Postgres", &resume_profile()).await;
        assert!(result.is_err());

        let extraction = extraction_or_zero_fill(Uuid::nil(), result);
        assert_eq!(extraction.aptitude, 0);
        assert!(extraction.skills.is_empty());
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_successful_extraction_passes_through() {
        let expected = validate_extraction(&serde_json::json!({
            "dev_score": 640,
            "skills": [{ "name": "Rust", "level": 85, "validated": true }]
        }));
        let oracle = FakeOracle {
            extraction: Some(expected.clone()),
            ..FakeOracle::default()
        };
        let result = oracle.extract_skills("Rust, Postgres", &resume_profile()).await;

        let extraction = extraction_or_zero_fill(Uuid::nil(), result);
        assert_eq!(extraction, expected);
        assert_eq!(extraction.aptitude, 640);
        assert_eq!(extraction.skills.len(), 1);
    }

    #[test]
    fn test_unknown_field_is_reported() {
        let mut form = DeveloperForm::default();
        assert!(!form.set("favourite_colour", "blue".to_string()));
    }
}
