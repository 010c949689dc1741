pub mod handlers;
pub mod models;
pub mod onboarding;
pub mod oracle;
pub mod prompts;
pub mod repository;
pub mod resume;
pub mod submissions;
pub mod validation;
