pub mod fit_scoring;
pub mod handlers;
pub mod projects;
pub mod prompts;
pub mod ranking;
pub mod repository;
pub mod suggestions;
