//! Transitive dependency resolution and exclusion analysis: a shared
//! memoizing POM cache, recursive tree building with cycle detection, and
//! the engine that turns a project's installed dependencies into ranked
//! exclusion suggestions.

pub mod cache;
pub mod conflict;
pub mod engine;
pub mod tree;
