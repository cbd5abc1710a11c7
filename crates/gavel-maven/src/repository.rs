//! Repository priority ordering and Maven URL layout.

use gavel_core::repository::{RepositoryConfig, RepositoryKind};

/// Standard Maven layout path for a given coordinate.
///
/// `org.jetbrains.kotlinx:kotlinx-coroutines-core:1.8.0` becomes
/// `org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0`
pub fn coordinate_path(group: &str, artifact: &str, version: &str) -> String {
    format!("{}/{}/{}", group.replace('.', "/"), artifact, version)
}

/// Full URL to the POM file for a coordinate under a repository base URL.
/// The base is expected to already have its trailing slash stripped.
pub fn pom_url(base: &str, group: &str, artifact: &str, version: &str) -> String {
    format!(
        "{}/{}/{artifact}-{version}.pom",
        base,
        coordinate_path(group, artifact, version)
    )
}

/// One remote lookup target: a normalized base URL plus the credentials
/// (if any) the declaring repository carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl RepositoryTarget {
    /// An anonymous target.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
        }
    }
}

/// Produces the ordered, deduplicated list of repository targets to try
/// for POM lookups, from a snapshot of discovered repositories.
///
/// Project-declared repositories come first in discovery order, builtin
/// fallbacks after, and the builtin Maven Central entry is always moved to
/// the very end so it stays the final fallback regardless of discovery
/// order.
#[derive(Debug, Clone)]
pub struct RepositoryResolver {
    repos: Vec<RepositoryConfig>,
}

impl RepositoryResolver {
    pub fn new(repos: Vec<RepositoryConfig>) -> Self {
        Self { repos }
    }

    /// The ordered candidate targets, trailing-slash-trimmed and
    /// deduplicated case-insensitively by URL preserving first occurrence.
    /// Pure function of the snapshot.
    pub fn ordered_targets(&self) -> Vec<RepositoryTarget> {
        let candidates: Vec<&RepositoryConfig> = self
            .repos
            .iter()
            .filter(|r| r.enabled && r.kind.serves_poms())
            .collect();

        let (project, builtin): (Vec<&RepositoryConfig>, Vec<&RepositoryConfig>) = candidates
            .into_iter()
            .partition(|r| r.is_project_declared());

        let (central, other_builtin): (Vec<&RepositoryConfig>, Vec<&RepositoryConfig>) = builtin
            .into_iter()
            .partition(|r| r.kind == RepositoryKind::MavenCentral);

        let mut targets: Vec<RepositoryTarget> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        for repo in project
            .into_iter()
            .chain(other_builtin)
            .chain(central.into_iter().take(1))
        {
            let url = repo.normalized_url().to_string();
            let key = url.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                targets.push(RepositoryTarget {
                    url,
                    username: repo.username.clone(),
                    password: repo.password.clone(),
                });
            }
        }
        targets
    }

    /// The ordered candidate URLs; see [`Self::ordered_targets`].
    pub fn ordered_urls(&self) -> Vec<String> {
        self.ordered_targets().into_iter().map(|t| t.url).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gavel_core::repository::{RepositoryConfig, RepositoryKind, RepositorySource};

    fn repo(
        id: &str,
        url: &str,
        kind: RepositoryKind,
        source: RepositorySource,
    ) -> RepositoryConfig {
        RepositoryConfig {
            id: id.to_string(),
            name: id.to_string(),
            url: url.to_string(),
            kind,
            source,
            username: None,
            password: None,
            mirror_of: None,
            enabled: true,
        }
    }

    #[test]
    fn coordinate_path_replaces_dots() {
        let path = coordinate_path("org.jetbrains.kotlinx", "kotlinx-coroutines-core", "1.8.0");
        assert_eq!(path, "org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0");
    }

    #[test]
    fn pom_url_format() {
        let url = pom_url(
            "https://repo.maven.apache.org/maven2",
            "org.jetbrains.kotlinx",
            "kotlinx-coroutines-core",
            "1.8.0",
        );
        assert_eq!(
            url,
            "https://repo.maven.apache.org/maven2/org/jetbrains/kotlinx/kotlinx-coroutines-core/1.8.0/kotlinx-coroutines-core-1.8.0.pom"
        );
    }

    #[test]
    fn central_is_always_last() {
        // Central appears first in the discovery snapshot; it still lands last.
        let resolver = RepositoryResolver::new(vec![
            RepositoryConfig::maven_central(),
            repo(
                "builtin-google",
                "https://maven.google.com",
                RepositoryKind::Maven,
                RepositorySource::Builtin,
            ),
            repo(
                "corp",
                "https://nexus.corp.example/maven/",
                RepositoryKind::Nexus,
                RepositorySource::GradleBuild,
            ),
        ]);
        let urls = resolver.ordered_urls();
        assert_eq!(
            urls,
            vec![
                "https://nexus.corp.example/maven".to_string(),
                "https://maven.google.com".to_string(),
                "https://repo.maven.apache.org/maven2".to_string(),
            ]
        );
    }

    #[test]
    fn npm_plugin_portal_and_disabled_are_filtered() {
        let mut disabled = repo(
            "old",
            "https://old.example/maven",
            RepositoryKind::Maven,
            RepositorySource::GradleBuild,
        );
        disabled.enabled = false;
        let resolver = RepositoryResolver::new(vec![
            repo(
                "npm",
                "https://registry.npmjs.org",
                RepositoryKind::Npm,
                RepositorySource::GradleBuild,
            ),
            repo(
                "portal",
                "https://plugins.gradle.org/m2",
                RepositoryKind::GradlePluginPortal,
                RepositorySource::Builtin,
            ),
            disabled,
            RepositoryConfig::maven_central(),
        ]);
        let urls = resolver.ordered_urls();
        assert_eq!(urls, vec!["https://repo.maven.apache.org/maven2".to_string()]);
    }

    #[test]
    fn dedup_is_case_insensitive_and_idempotent() {
        let resolver = RepositoryResolver::new(vec![
            repo(
                "a",
                "https://Nexus.Corp.Example/maven/",
                RepositoryKind::Nexus,
                RepositorySource::GradleBuild,
            ),
            repo(
                "b",
                "https://nexus.corp.example/maven",
                RepositoryKind::Maven,
                RepositorySource::MavenSettings,
            ),
        ]);
        let first = resolver.ordered_urls();
        assert_eq!(first, vec!["https://Nexus.Corp.Example/maven".to_string()]);
        // Applying again to the same snapshot yields the same list.
        assert_eq!(resolver.ordered_urls(), first);
    }

    #[test]
    fn credentials_survive_ordering() {
        let mut corp = repo(
            "corp",
            "https://nexus.corp.example/maven/",
            RepositoryKind::Nexus,
            RepositorySource::MavenSettings,
        );
        corp.username = Some("deploy".to_string());
        corp.password = Some("s3cret".to_string());
        let resolver = RepositoryResolver::new(vec![corp, RepositoryConfig::maven_central()]);

        let targets = resolver.ordered_targets();
        assert_eq!(targets[0].url, "https://nexus.corp.example/maven");
        assert_eq!(targets[0].username.as_deref(), Some("deploy"));
        assert_eq!(targets[0].password.as_deref(), Some("s3cret"));
        // The builtin fallback stays anonymous.
        assert_eq!(targets[1].username, None);
    }

    #[test]
    fn project_repos_precede_builtins() {
        let resolver = RepositoryResolver::new(vec![
            repo(
                "builtin-extra",
                "https://builtin.example/maven",
                RepositoryKind::Maven,
                RepositorySource::Builtin,
            ),
            repo(
                "declared",
                "https://declared.example/maven",
                RepositoryKind::Maven,
                RepositorySource::GradleSettings,
            ),
        ]);
        let urls = resolver.ordered_urls();
        assert_eq!(
            urls,
            vec![
                "https://declared.example/maven".to_string(),
                "https://builtin.example/maven".to_string(),
            ]
        );
    }
}
