use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::recruiting::fit_scoring::FitScorer;
use crate::talent::oracle::TalentOracle;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Model-backed extraction, grading and suggestion calls. Default: `LlmTalentOracle`.
    pub oracle: Arc<dyn TalentOracle>,
    /// Pluggable fit scorer. Default: `WeightedSkillFitScorer`.
    pub fit_scorer: Arc<dyn FitScorer>,
}
