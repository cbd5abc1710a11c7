//! The exclusion analysis engine: takes a project's direct dependencies,
//! resolves their transitive closure from local caches only, and produces
//! a merged, deduplicated, severity-ordered list of exclusion suggestions.
//!
//! The engine never touches the network. Dependencies whose POMs are not
//! in any local cache are counted as misses and skipped; the result carries
//! those counts so consumers can tell an empty result from a cold cache.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use gavel_core::dependency::{DependencyExclusion, InstalledDependency};
use gavel_core::rules::RuleSet;
use gavel_core::suggestion::{
    AnalysisResult, BuildSystem, ExclusionSuggestion, SuggestionSource,
};
use tracing::{debug, info};

use crate::cache::TransitiveDependencyCache;
use crate::conflict::{self, TransitiveOccurrence};

/// Called after each dependency is resolved with `(done, total)`.
pub type ProgressCallback<'a> = dyn Fn(usize, usize) + Send + Sync + 'a;
/// Called with short human-readable phase descriptions.
pub type StatusCallback<'a> = dyn Fn(&str) + Send + Sync + 'a;

pub struct ExclusionAnalysisEngine {
    cache: Arc<TransitiveDependencyCache>,
    rules: RuleSet,
    last_result: Mutex<Option<(String, AnalysisResult)>>,
}

impl ExclusionAnalysisEngine {
    pub fn new(cache: Arc<TransitiveDependencyCache>, rules: RuleSet) -> Self {
        Self {
            cache,
            rules,
            last_result: Mutex::new(None),
        }
    }

    /// Run a full analysis over `dependencies`, optionally narrowed to one
    /// module.
    ///
    /// Checks `cancelled` between dependencies and between phases; a
    /// cancelled run returns the partial-free empty result immediately and
    /// caches nothing. A repeat
    /// run over an identical dependency set is answered from the result
    /// cache without re-resolving (and reports zero cache misses, since
    /// nothing was read).
    pub async fn analyze(
        &self,
        dependencies: &[InstalledDependency],
        module_filter: Option<&str>,
        build_system: BuildSystem,
        cancelled: &AtomicBool,
        on_progress: Option<&ProgressCallback<'_>>,
        on_status: Option<&StatusCallback<'_>>,
    ) -> AnalysisResult {
        let filtered: Vec<&InstalledDependency> = dependencies
            .iter()
            .filter(|d| module_filter.map(|m| d.module_name == m).unwrap_or(true))
            .collect();
        if filtered.is_empty() {
            return AnalysisResult::empty();
        }

        let key = Self::result_key(&filtered, module_filter);
        if let Ok(guard) = self.last_result.lock() {
            if let Some((cached_key, cached)) = guard.as_ref() {
                if *cached_key == key {
                    debug!("analysis result cache hit for {} dependencies", filtered.len());
                    let mut result = cached.clone();
                    result.local_cache_misses = 0;
                    return result;
                }
            }
        }

        let total = filtered.len();
        let Some(result) = self
            .run(&filtered, build_system, cancelled, on_progress, on_status)
            .await
        else {
            info!("analysis cancelled after partial resolution");
            return AnalysisResult::empty();
        };

        if let Ok(mut guard) = self.last_result.lock() {
            *guard = Some((key, result.clone()));
        }
        info!(
            "analysis complete: {} suggestions across {} dependencies ({} local cache misses)",
            result.suggestions.len(),
            total,
            result.local_cache_misses
        );
        result
    }

    /// Drop both the memoized POM lookups and the last analysis result.
    pub fn clear_cache(&self) {
        self.cache.clear();
        if let Ok(mut guard) = self.last_result.lock() {
            *guard = None;
        }
    }

    /// Cache key over the exact dependency set: exclusion state is part of
    /// the key so editing an exclusion invalidates the cached result.
    fn result_key(filtered: &[&InstalledDependency], module_filter: Option<&str>) -> String {
        let mut ids: Vec<String> = filtered
            .iter()
            .map(|d| {
                let mut id = d.full_id();
                for e in &d.exclusions {
                    id.push('!');
                    id.push_str(&e.id());
                }
                id
            })
            .collect();
        ids.sort();
        format!("{}|{}", ids.join(","), module_filter.unwrap_or(""))
    }

    /// The analysis proper. `None` means the run was cancelled.
    async fn run(
        &self,
        filtered: &[&InstalledDependency],
        build_system: BuildSystem,
        cancelled: &AtomicBool,
        on_progress: Option<&ProgressCallback<'_>>,
        on_status: Option<&StatusCallback<'_>>,
    ) -> Option<AnalysisResult> {
        let total = filtered.len();
        if let Some(cb) = on_status {
            cb("Resolving transitive dependencies from local caches");
        }

        let mut occurrences: HashMap<String, Vec<TransitiveOccurrence>> = HashMap::new();
        let mut transitive_ids: HashSet<String> = HashSet::new();
        let mut misses = 0usize;

        for (i, dep) in filtered.iter().enumerate() {
            if cancelled.load(Ordering::Relaxed) {
                return None;
            }
            match self
                .cache
                .resolve_local_only(&dep.group_id, &dep.artifact_id, &dep.version)
            {
                Some(transitives) => {
                    for t in transitives {
                        transitive_ids.insert(t.id());
                        occurrences.entry(t.id()).or_default().push(
                            TransitiveOccurrence {
                                parent: (*dep).clone(),
                                dependency: t,
                            },
                        );
                    }
                }
                None => {
                    debug!("no local POM for {}", dep.full_id());
                    misses += 1;
                }
            }
            if let Some(cb) = on_progress {
                cb(i + 1, total);
            }
        }

        // The flag may have been raised while the final dependency resolved.
        if cancelled.load(Ordering::Relaxed) {
            return None;
        }

        let direct_ids: HashSet<String> = filtered.iter().map(|d| d.id()).collect();

        if let Some(cb) = on_status {
            cb("Detecting version conflicts");
        }
        let mut suggestions = conflict::detect_conflicts(&occurrences, &direct_ids, build_system);

        if cancelled.load(Ordering::Relaxed) {
            return None;
        }
        if let Some(cb) = on_status {
            cb("Checking known-problematic rules");
        }
        suggestions.extend(self.apply_rules(
            &occurrences,
            &direct_ids,
            &transitive_ids,
            build_system,
        ));

        // Conflict suggestions were pushed first and win on key collisions.
        let mut seen = HashSet::new();
        suggestions.retain(|s| seen.insert(s.key()));
        suggestions.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.exclusion.id().cmp(&b.exclusion.id()))
                .then_with(|| a.parent.id().cmp(&b.parent.id()))
        });

        Some(AnalysisResult {
            suggestions,
            total_analyzed: total,
            local_cache_misses: misses,
        })
    }

    /// The rules phase: every occurrence of a ruled artifact gets a
    /// suggestion, unless the parent already carries a covering exclusion
    /// or a `whenPresent` condition is unmet.
    fn apply_rules(
        &self,
        occurrences: &HashMap<String, Vec<TransitiveOccurrence>>,
        direct_ids: &HashSet<String>,
        transitive_ids: &HashSet<String>,
        build_system: BuildSystem,
    ) -> Vec<ExclusionSuggestion> {
        let mut out = Vec::new();
        for rule in &self.rules.known_problematic {
            let Some(occs) = occurrences.get(&rule.id()) else {
                continue;
            };
            if let Some(conditions) = &rule.conditions {
                let met = conditions
                    .when_present
                    .iter()
                    .all(|id| direct_ids.contains(id) || transitive_ids.contains(id));
                if !met {
                    continue;
                }
            }
            for occ in occs {
                if occ.parent.excludes(&rule.group_id, &rule.artifact_id) {
                    continue;
                }
                out.push(ExclusionSuggestion {
                    parent: occ.parent.clone(),
                    exclusion: DependencyExclusion::new(
                        rule.group_id.clone(),
                        rule.artifact_id.clone(),
                    ),
                    reason: rule.reason.clone(),
                    severity: rule.severity,
                    source: SuggestionSource::KnownRules,
                    build_system,
                    conflicting_versions: Vec::new(),
                });
            }
        }
        out
    }
}
