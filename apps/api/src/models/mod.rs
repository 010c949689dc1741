pub mod developer;
pub mod project;
