//! Local POM lookup against on-disk package caches. No network I/O.

use std::fs;
use std::path::PathBuf;

use gavel_core::config::{home_dir, CacheConfig};
use tracing::debug;

/// Reads POM files straight from the two local cache layouts:
///
/// - the Maven local repository
///   (`<root>/<group/as/path>/<artifact>/<version>/<artifact>-<version>.pom`),
/// - the Gradle module cache
///   (`<root>/<dotted.group>/<artifact>/<version>/<hash>/<artifact>-<version>.pom`,
///   one subdirectory per content hash).
///
/// Misses are routine, not errors: every I/O failure collapses to `None`.
#[derive(Debug, Clone)]
pub struct LocalPomReader {
    maven_root: PathBuf,
    gradle_root: PathBuf,
}

impl LocalPomReader {
    pub fn new(maven_root: PathBuf, gradle_root: PathBuf) -> Self {
        Self {
            maven_root,
            gradle_root,
        }
    }

    /// Build a reader from `[cache]` configuration, falling back to the
    /// conventional per-user locations.
    pub fn from_config(cache: &CacheConfig) -> Self {
        let maven_root = cache
            .maven_repository
            .clone()
            .unwrap_or_else(default_maven_root);
        let gradle_root = cache
            .gradle_cache
            .clone()
            .unwrap_or_else(default_gradle_root);
        Self::new(maven_root, gradle_root)
    }

    /// Read the POM for a coordinate from whichever local cache has it,
    /// Maven layout first. Zero-length files count as misses.
    pub fn read(&self, group: &str, artifact: &str, version: &str) -> Option<String> {
        if let Some(content) = self.read_maven_layout(group, artifact, version) {
            return Some(content);
        }
        self.read_gradle_layout(group, artifact, version)
    }

    fn read_maven_layout(&self, group: &str, artifact: &str, version: &str) -> Option<String> {
        let path = self
            .maven_root
            .join(group.replace('.', "/"))
            .join(artifact)
            .join(version)
            .join(pom_filename(artifact, version));
        read_non_empty(path)
    }

    /// The Gradle layout keeps the dotted group as a single directory and
    /// interposes a content-hash directory under the version. Every hash
    /// subdirectory is scanned; first match wins.
    fn read_gradle_layout(&self, group: &str, artifact: &str, version: &str) -> Option<String> {
        let version_dir = self.gradle_root.join(group).join(artifact).join(version);
        let entries = fs::read_dir(&version_dir).ok()?;
        let filename = pom_filename(artifact, version);
        for entry in entries.flatten() {
            let candidate = entry.path().join(&filename);
            if let Some(content) = read_non_empty(candidate) {
                return Some(content);
            }
        }
        debug!(
            "no local POM for {group}:{artifact}:{version} in {}",
            version_dir.display()
        );
        None
    }
}

fn pom_filename(artifact: &str, version: &str) -> String {
    format!("{artifact}-{version}.pom")
}

fn read_non_empty(path: PathBuf) -> Option<String> {
    match fs::read_to_string(&path) {
        Ok(content) if !content.is_empty() => Some(content),
        _ => None,
    }
}

fn default_maven_root() -> PathBuf {
    home_dir().join(".m2").join("repository")
}

fn default_gradle_root() -> PathBuf {
    home_dir()
        .join(".gradle")
        .join("caches")
        .join("modules-2")
        .join("files-2.1")
}
