//! User configuration loaded from `gavel.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryConfig, RepositoryKind, RepositorySource};

/// Configuration for Gavel, loaded from `gavel.toml` in the working
/// directory (or a path given on the command line). Every section is
/// optional; a missing file yields defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GavelConfig {
    #[serde(default)]
    pub repositories: Vec<RepositoryEntry>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub fetch: FetchConfig,
}

/// One `[[repositories]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryEntry {
    pub url: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: RepositoryKind,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_kind() -> RepositoryKind {
    RepositoryKind::Maven
}

fn default_enabled() -> bool {
    true
}

/// Local package-cache roots from `[cache]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maven local repository root. Defaults to `~/.m2/repository`.
    #[serde(default, rename = "maven-repository")]
    pub maven_repository: Option<PathBuf>,
    /// Gradle module cache root. Defaults to
    /// `~/.gradle/caches/modules-2/files-2.1`.
    #[serde(default, rename = "gradle-cache")]
    pub gradle_cache: Option<PathBuf>,
}

/// Remote fetch tuning from `[fetch]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout", rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_read_timeout", rename = "read-timeout-secs")]
    pub read_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    8
}

fn default_read_timeout() -> u64 {
    10
}

impl GavelConfig {
    /// Load configuration from the given path, or return defaults if the
    /// file doesn't exist.
    pub fn load(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content =
            std::fs::read_to_string(path).map_err(|e| gavel_util::errors::GavelError::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
        toml::from_str(&content).map_err(|e| {
            gavel_util::errors::GavelError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// The default config path: `gavel.toml` in the working directory.
    pub fn default_path() -> PathBuf {
        PathBuf::from("gavel.toml")
    }

    /// The full repository snapshot for this configuration: declared
    /// repositories first, then the builtin fallbacks.
    pub fn repository_snapshot(&self) -> Vec<RepositoryConfig> {
        let mut repos: Vec<RepositoryConfig> = self
            .repositories
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let id = entry.id.clone().unwrap_or_else(|| format!("repo-{i}"));
                RepositoryConfig {
                    name: entry.name.clone().unwrap_or_else(|| id.clone()),
                    id,
                    url: entry.url.clone(),
                    kind: entry.kind,
                    source: RepositorySource::PluginSettings,
                    username: entry.username.clone(),
                    password: entry.password.clone(),
                    mirror_of: None,
                    enabled: entry.enabled,
                }
            })
            .collect();
        repos.push(RepositoryConfig::google_maven());
        repos.push(RepositoryConfig::maven_central());
        repos
    }
}

/// The user's home directory, used for the default cache roots.
pub fn home_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = GavelConfig::load(Path::new("/nonexistent/gavel.toml")).unwrap();
        assert!(config.repositories.is_empty());
        assert_eq!(config.fetch.connect_timeout_secs, 8);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[[repositories]]
id = "corp-nexus"
url = "https://nexus.corp.example/repository/maven-public/"
kind = "nexus"

[cache]
maven-repository = "/opt/m2/repository"

[fetch]
connect-timeout-secs = 3
read-timeout-secs = 5
"#;
        let config: GavelConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.repositories.len(), 1);
        assert_eq!(config.repositories[0].kind, RepositoryKind::Nexus);
        assert_eq!(config.fetch.connect_timeout_secs, 3);
        assert_eq!(
            config.cache.maven_repository.as_deref(),
            Some(Path::new("/opt/m2/repository"))
        );
    }

    #[test]
    fn snapshot_ends_with_builtins() {
        let config: GavelConfig = toml::from_str(
            r#"
[[repositories]]
id = "jitpack"
url = "https://jitpack.io"
kind = "jitpack"
"#,
        )
        .unwrap();
        let snapshot = config.repository_snapshot();
        assert_eq!(snapshot.len(), 3);
        assert!(snapshot[0].is_project_declared());
        assert_eq!(snapshot[2].id, "maven-central");
    }
}
