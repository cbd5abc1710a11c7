//! Core data types for Gavel: repository configurations, installed and
//! transitive dependencies, exclusions, the bundled exclusion ruleset,
//! analysis suggestions/results, and user configuration.

pub mod config;
pub mod dependency;
pub mod repository;
pub mod rules;
pub mod suggestion;
