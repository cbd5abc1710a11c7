//! Repository configuration: the immutable snapshot of a discovered
//! repository declaration, used to decide where POM lookups go.

use serde::{Deserialize, Serialize};

/// What kind of repository a configuration entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositoryKind {
    MavenCentral,
    Maven,
    Nexus,
    Artifactory,
    AzureArtifacts,
    Jitpack,
    GradlePluginPortal,
    Npm,
    Custom,
}

impl RepositoryKind {
    /// Whether this kind of repository can serve Maven POM files at all.
    /// NPM registries and the Gradle plugin portal cannot.
    pub fn serves_poms(&self) -> bool {
        !matches!(self, Self::Npm | Self::GradlePluginPortal)
    }
}

/// Where a repository configuration was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RepositorySource {
    Builtin,
    MavenSettings,
    GradleSettings,
    GradleBuild,
    PluginSettings,
}

/// A discovered repository. Created once per discovery pass and never
/// mutated afterwards; consumers only filter and reorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub id: String,
    pub name: String,
    pub url: String,
    pub kind: RepositoryKind,
    pub source: RepositorySource,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub mirror_of: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl RepositoryConfig {
    /// The URL with any trailing slash stripped. This is the form used as a
    /// lookup key and for building artifact URLs.
    pub fn normalized_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Whether this repository was declared by the project rather than
    /// shipped as a builtin fallback.
    pub fn is_project_declared(&self) -> bool {
        self.source != RepositorySource::Builtin
    }

    /// The builtin Maven Central entry.
    pub fn maven_central() -> Self {
        Self {
            id: "maven-central".to_string(),
            name: "Maven Central".to_string(),
            url: MAVEN_CENTRAL_URL.to_string(),
            kind: RepositoryKind::MavenCentral,
            source: RepositorySource::Builtin,
            username: None,
            password: None,
            mirror_of: None,
            enabled: true,
        }
    }

    /// The builtin Google Maven entry.
    pub fn google_maven() -> Self {
        Self {
            id: "google".to_string(),
            name: "Google Maven".to_string(),
            url: GOOGLE_MAVEN_URL.to_string(),
            kind: RepositoryKind::Maven,
            source: RepositorySource::Builtin,
            username: None,
            password: None,
            mirror_of: None,
            enabled: true,
        }
    }
}

/// Maven Central base URL.
pub const MAVEN_CENTRAL_URL: &str = "https://repo.maven.apache.org/maven2";

/// Google's Maven repository.
pub const GOOGLE_MAVEN_URL: &str = "https://maven.google.com";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_url_strips_trailing_slash() {
        let mut repo = RepositoryConfig::maven_central();
        repo.url = "https://repo.example.com/maven/".to_string();
        assert_eq!(repo.normalized_url(), "https://repo.example.com/maven");
    }

    #[test]
    fn pom_serving_kinds() {
        assert!(RepositoryKind::MavenCentral.serves_poms());
        assert!(RepositoryKind::Nexus.serves_poms());
        assert!(RepositoryKind::Jitpack.serves_poms());
        assert!(!RepositoryKind::Npm.serves_poms());
        assert!(!RepositoryKind::GradlePluginPortal.serves_poms());
    }

    #[test]
    fn builtin_central_is_not_project_declared() {
        assert!(!RepositoryConfig::maven_central().is_project_declared());
    }
}
