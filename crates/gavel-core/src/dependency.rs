//! Dependency model: installed (direct) dependencies as found by a build-file
//! scanner, transitive dependencies recovered from POMs, and exclusions.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Maven coordinates parsed from a shorthand string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MavenCoordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl MavenCoordinate {
    /// Parse `"group:artifact:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Some(Self {
                group_id: parts[0].to_string(),
                artifact_id: parts[1].to_string(),
                version: parts[2].to_string(),
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A dependency recovered from another dependency's POM.
///
/// `version` is `None` when the POM leaves it to dependency management
/// elsewhere; a managed version must never compare equal or ordered against
/// a concrete version string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitiveDependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

impl TransitiveDependency {
    /// `group:artifact` identifier (without version).
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// `group:artifact:version` when the version is concrete, `group:artifact`
    /// otherwise.
    pub fn full_id(&self) -> String {
        match &self.version {
            Some(v) => format!("{}:{}:{}", self.group_id, self.artifact_id, v),
            None => self.id(),
        }
    }
}

/// An exclusion attached to a dependency declaration.
///
/// `artifact_id = None` excludes the whole group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyExclusion {
    pub group_id: String,
    #[serde(default)]
    pub artifact_id: Option<String>,
}

impl DependencyExclusion {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: Some(artifact_id.into()),
        }
    }

    /// `group[:artifact]` identifier.
    pub fn id(&self) -> String {
        match &self.artifact_id {
            Some(a) => format!("{}:{}", self.group_id, a),
            None => self.group_id.clone(),
        }
    }

    /// Whether this exclusion covers the given coordinate. A `None`
    /// artifact matches everything in the group.
    pub fn covers(&self, group_id: &str, artifact_id: &str) -> bool {
        self.group_id == group_id
            && self
                .artifact_id
                .as_deref()
                .map(|a| a == artifact_id)
                .unwrap_or(true)
    }
}

/// One direct dependency declaration found in a build file.
///
/// Produced by the build-file scanner; read-only to the analysis engine.
/// `build_file`, `offset` and `length` locate the declaration for editing,
/// which happens outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstalledDependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub module_name: String,
    #[serde(default)]
    pub exclusions: Vec<DependencyExclusion>,
    #[serde(default)]
    pub build_file: PathBuf,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub length: usize,
    #[serde(default)]
    pub configuration: Option<String>,
}

impl InstalledDependency {
    /// `group:artifact` identifier (without version).
    pub fn id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    /// `group:artifact:version` identifier.
    pub fn full_id(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }

    /// Whether this declaration already excludes the given coordinate.
    pub fn excludes(&self, group_id: &str, artifact_id: &str) -> bool {
        self.exclusions
            .iter()
            .any(|e| e.covers(group_id, artifact_id))
    }
}
