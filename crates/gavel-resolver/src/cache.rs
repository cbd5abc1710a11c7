//! The shared transitive-dependency cache: one mapping from
//! `group:artifact:version` to the dependency list its POM declares.
//!
//! Session-scoped and shared across concurrent callers (analyses, tree
//! builds, detail lookups). A miss is resolved by whichever caller gets
//! there first; duplicate concurrent fetches for the same key are tolerated
//! and the last write wins, so no lock is ever held across I/O.

use std::collections::HashSet;

use dashmap::DashMap;
use gavel_core::dependency::TransitiveDependency;
use gavel_maven::fetch::{FetchTimeouts, RemotePomFetcher};
use gavel_maven::local::LocalPomReader;
use gavel_maven::pom;
use gavel_maven::repository::RepositoryTarget;
use tracing::debug;

pub struct TransitiveDependencyCache {
    entries: DashMap<String, Vec<TransitiveDependency>>,
    local: LocalPomReader,
    fetcher: RemotePomFetcher,
    fast_fetcher: RemotePomFetcher,
}

impl TransitiveDependencyCache {
    /// Build a cache over the given local caches and remote repository
    /// targets. `timeouts` applies to the interactive fetch path; the batch
    /// path always uses the fast profile.
    pub fn new(
        local: LocalPomReader,
        targets: Vec<RepositoryTarget>,
        timeouts: FetchTimeouts,
    ) -> miette::Result<Self> {
        let fetcher = RemotePomFetcher::new(targets.clone(), timeouts)?;
        let fast_fetcher = RemotePomFetcher::new(targets, FetchTimeouts::fast())?;
        Ok(Self {
            entries: DashMap::new(),
            local,
            fetcher,
            fast_fetcher,
        })
    }

    fn key(group: &str, artifact: &str, version: &str) -> String {
        format!("{group}:{artifact}:{version}")
    }

    /// Resolve the dependency list for a coordinate, local caches first,
    /// then the remote fallback chain. Memoized; a coordinate that cannot
    /// be resolved anywhere memoizes as empty.
    pub async fn resolve(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Vec<TransitiveDependency> {
        let mut failed = HashSet::new();
        self.resolve_with(group, artifact, version, &self.fetcher, &mut failed)
            .await
    }

    /// Batch-path variant: short timeouts and a caller-owned `failed`
    /// skip-set shared across the whole batch, so one dead repository is
    /// paid for once rather than once per dependency.
    pub async fn resolve_fast(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        failed: &mut HashSet<String>,
    ) -> Vec<TransitiveDependency> {
        self.resolve_with(group, artifact, version, &self.fast_fetcher, failed)
            .await
    }

    async fn resolve_with(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        fetcher: &RemotePomFetcher,
        failed: &mut HashSet<String>,
    ) -> Vec<TransitiveDependency> {
        let key = Self::key(group, artifact, version);
        if let Some(hit) = self.entries.get(&key) {
            return hit.clone();
        }

        let deps = match self.local.read(group, artifact, version) {
            Some(xml) => pom::extract_dependencies(&xml),
            None => match fetcher.fetch_pom(group, artifact, version, failed).await {
                Some(xml) => pom::extract_dependencies(&xml),
                None => {
                    debug!("no POM found anywhere for {key}");
                    Vec::new()
                }
            },
        };

        self.entries.insert(key, deps.clone());
        deps
    }

    /// Local-caches-only variant used by the batch analysis path, which
    /// must complete without network I/O. Returns `None` — not an empty
    /// list — when the POM is not in any local cache, so callers can
    /// distinguish "not found locally" from "found but declares nothing".
    pub fn resolve_local_only(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
    ) -> Option<Vec<TransitiveDependency>> {
        let key = Self::key(group, artifact, version);
        if let Some(hit) = self.entries.get(&key) {
            return Some(hit.clone());
        }
        let xml = self.local.read(group, artifact, version)?;
        let deps = pom::extract_dependencies(&xml);
        self.entries.insert(key, deps.clone());
        Some(deps)
    }

    /// Number of memoized coordinates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every memoized entry. The only eviction path; the cache never
    /// expires on its own.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
