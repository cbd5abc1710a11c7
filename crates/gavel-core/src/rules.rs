//! The bundled exclusion ruleset: artifacts that are known to cause trouble
//! when pulled in transitively, loaded once from a static JSON resource.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Severity of an exclusion suggestion. Variant order is the sort order:
/// `Critical` sorts before `Warning` sorts before `Info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Critical => "CRITICAL",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        };
        f.write_str(s)
    }
}

/// Conditions attached to a rule. The rule only fires when every listed
/// `group:artifact` ID is present among the project's direct and transitive
/// dependencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleConditions {
    #[serde(default)]
    pub when_present: Vec<String>,
}

/// A single entry in the known-problematic ruleset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExclusionRule {
    pub group_id: String,
    pub artifact_id: String,
    pub reason: String,
    pub severity: Severity,
    #[serde(default)]
    pub conditions: Option<RuleConditions>,
}

impl ExclusionRule {
    /// `group:artifact` identifier of the ruled artifact.
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

/// The full ruleset, immutable for the lifetime of the process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleSet {
    #[serde(default)]
    pub known_problematic: Vec<ExclusionRule>,
}

/// The ruleset shipped with the binary.
const BUNDLED_RULES: &str = include_str!("../rules/known-problematic.json");

impl RuleSet {
    /// Parse a ruleset from JSON.
    pub fn from_json(json: &str) -> miette::Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            gavel_util::errors::GavelError::Parse {
                message: format!("Failed to parse exclusion rules: {e}"),
            }
            .into()
        })
    }

    /// Load the bundled ruleset. An unparseable resource degrades to an
    /// empty set so the rules phase simply contributes no suggestions.
    pub fn load_bundled() -> Self {
        match Self::from_json(BUNDLED_RULES) {
            Ok(rules) => rules,
            Err(e) => {
                warn!("bundled exclusion ruleset is invalid, continuing without rules: {e}");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.known_problematic.is_empty()
    }

    pub fn len(&self) -> usize {
        self.known_problematic.len()
    }
}
