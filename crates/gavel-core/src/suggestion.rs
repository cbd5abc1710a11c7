//! Analysis output: exclusion suggestions and the aggregate result handed
//! back to callers.

use serde::{Deserialize, Serialize};

use crate::dependency::{DependencyExclusion, InstalledDependency};
use crate::rules::Severity;

/// Which analysis phase produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionSource {
    ConflictDetection,
    KnownRules,
}

/// The build system the suggestion applies to (controls how the consumer
/// renders the exclusion snippet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Gradle,
    Maven,
}

impl std::fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gradle => f.write_str("gradle"),
            Self::Maven => f.write_str("maven"),
        }
    }
}

/// A single suggestion: exclude `exclusion` from the declaration of `parent`.
///
/// Produced fresh per analysis run; never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExclusionSuggestion {
    pub parent: InstalledDependency,
    pub exclusion: DependencyExclusion,
    pub reason: String,
    pub severity: Severity,
    pub source: SuggestionSource,
    pub build_system: BuildSystem,
    #[serde(default)]
    pub conflicting_versions: Vec<String>,
}

impl ExclusionSuggestion {
    /// Deduplication key: one suggestion per (parent, exclusion) pair.
    pub fn key(&self) -> String {
        format!("{}|{}", self.parent.id(), self.exclusion.id())
    }
}

/// The aggregate outcome of one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub suggestions: Vec<ExclusionSuggestion>,
    pub total_analyzed: usize,
    pub local_cache_misses: usize,
}

impl AnalysisResult {
    pub fn empty() -> Self {
        Self::default()
    }

    /// At least one dependency's POM could not be read from any local cache.
    pub fn has_missing_poms(&self) -> bool {
        self.local_cache_misses > 0
    }

    /// Every analyzed dependency was a local-cache miss. The consumer should
    /// hint at running a real build to populate the caches rather than
    /// showing a silent empty state.
    pub fn all_missing(&self) -> bool {
        self.total_analyzed > 0 && self.local_cache_misses == self.total_analyzed
    }
}
