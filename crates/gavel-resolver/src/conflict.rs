//! Version-conflict detection over the transitive dependencies discovered
//! during an analysis run. Conflicts are flagged, never resolved: the
//! output is a set of exclusion suggestions, not a mediated graph.

use std::collections::{HashMap, HashSet};

use gavel_core::dependency::{DependencyExclusion, InstalledDependency, TransitiveDependency};
use gavel_core::rules::Severity;
use gavel_core::suggestion::{BuildSystem, ExclusionSuggestion, SuggestionSource};

/// One sighting of a transitive dependency underneath a direct parent.
#[derive(Debug, Clone)]
pub struct TransitiveOccurrence {
    pub parent: InstalledDependency,
    pub dependency: TransitiveDependency,
}

/// Detect version conflicts among transitive occurrences grouped by
/// `group:artifact`.
///
/// For every group with more than one distinct concrete version string the
/// occurrences are ordered by version descending — plain string comparison,
/// deliberately not semantic versioning — and every occurrence after the
/// first gets an exclusion suggestion; the greatest-version occurrence is
/// the winner and keeps the artifact. Artifacts the project declares
/// directly are never suggested for exclusion.
pub fn detect_conflicts(
    occurrences: &HashMap<String, Vec<TransitiveOccurrence>>,
    direct_ids: &HashSet<String>,
    build_system: BuildSystem,
) -> Vec<ExclusionSuggestion> {
    let mut keys: Vec<&String> = occurrences.keys().collect();
    keys.sort();

    let mut suggestions = Vec::new();
    for key in keys {
        let occs = &occurrences[key];

        let mut versions: Vec<&str> = occs
            .iter()
            .filter_map(|o| o.dependency.version.as_deref())
            .collect();
        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        if versions.len() < 2 {
            continue;
        }
        if direct_ids.contains(key.as_str()) {
            // The user declared this artifact; excluding it is never suggested.
            continue;
        }

        let mut ranked: Vec<&TransitiveOccurrence> = occs
            .iter()
            .filter(|o| o.dependency.version.is_some())
            .collect();
        ranked.sort_by(|a, b| {
            b.dependency
                .version
                .cmp(&a.dependency.version)
                .then_with(|| a.parent.id().cmp(&b.parent.id()))
        });

        let mut parents: Vec<String> = ranked.iter().map(|o| o.parent.id()).collect();
        parents.dedup();
        let reason = format!(
            "Version conflict for {key}: versions {} pulled in via {}",
            versions.join(", "),
            parents.join(", ")
        );
        let conflicting_versions: Vec<String> = versions.iter().map(|v| v.to_string()).collect();

        for occ in ranked.iter().skip(1) {
            suggestions.push(ExclusionSuggestion {
                parent: occ.parent.clone(),
                exclusion: DependencyExclusion::new(
                    occ.dependency.group_id.clone(),
                    occ.dependency.artifact_id.clone(),
                ),
                reason: reason.clone(),
                severity: Severity::Warning,
                source: SuggestionSource::ConflictDetection,
                build_system,
                conflicting_versions: conflicting_versions.clone(),
            });
        }
    }
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parent(artifact: &str) -> InstalledDependency {
        InstalledDependency {
            group_id: "com.app".to_string(),
            artifact_id: artifact.to_string(),
            version: "1.0".to_string(),
            module_name: "app".to_string(),
            exclusions: Vec::new(),
            build_file: PathBuf::from("build.gradle"),
            offset: 0,
            length: 0,
            configuration: None,
        }
    }

    fn occurrence(parent_artifact: &str, version: Option<&str>) -> TransitiveOccurrence {
        TransitiveOccurrence {
            parent: parent(parent_artifact),
            dependency: TransitiveDependency {
                group_id: "g".to_string(),
                artifact_id: "a".to_string(),
                version: version.map(|v| v.to_string()),
                scope: None,
                optional: false,
            },
        }
    }

    fn occurrences_for(
        entries: &[(&str, Option<&str>)],
    ) -> HashMap<String, Vec<TransitiveOccurrence>> {
        let mut map: HashMap<String, Vec<TransitiveOccurrence>> = HashMap::new();
        for (p, v) in entries {
            map.entry("g:a".to_string())
                .or_default()
                .push(occurrence(p, *v));
        }
        map
    }

    #[test]
    fn non_maximum_versions_get_suggestions() {
        let occs = occurrences_for(&[
            ("p1", Some("1.0")),
            ("p2", Some("2.0")),
            ("p3", Some("1.5")),
        ]);
        let suggestions = detect_conflicts(&occs, &HashSet::new(), BuildSystem::Gradle);

        assert_eq!(suggestions.len(), 2);
        // The winner (2.0, via p2) produces no suggestion.
        assert!(suggestions.iter().all(|s| s.parent.artifact_id != "p2"));
        for s in &suggestions {
            assert_eq!(s.exclusion.id(), "g:a");
            assert_eq!(s.severity, Severity::Warning);
            assert_eq!(s.source, SuggestionSource::ConflictDetection);
            assert_eq!(s.conflicting_versions, vec!["2.0", "1.5", "1.0"]);
            assert!(s.reason.contains("2.0, 1.5, 1.0"));
        }
    }

    #[test]
    fn direct_dependency_is_never_suggested() {
        let occs = occurrences_for(&[("p1", Some("1.0")), ("p2", Some("2.0"))]);
        let direct: HashSet<String> = ["g:a".to_string()].into();
        assert!(detect_conflicts(&occs, &direct, BuildSystem::Gradle).is_empty());
    }

    #[test]
    fn single_version_is_no_conflict() {
        let occs = occurrences_for(&[("p1", Some("1.0")), ("p2", Some("1.0"))]);
        assert!(detect_conflicts(&occs, &HashSet::new(), BuildSystem::Gradle).is_empty());
    }

    #[test]
    fn managed_versions_do_not_count_toward_conflicts() {
        let occs = occurrences_for(&[("p1", Some("1.0")), ("p2", None)]);
        assert!(detect_conflicts(&occs, &HashSet::new(), BuildSystem::Gradle).is_empty());
    }

    #[test]
    fn string_ordering_is_preserved_even_when_numerically_wrong() {
        // "1.9" > "1.10" under string comparison; the analyzer keeps that
        // ordering for compatibility.
        let occs = occurrences_for(&[("p1", Some("1.10")), ("p2", Some("1.9"))]);
        let suggestions = detect_conflicts(&occs, &HashSet::new(), BuildSystem::Gradle);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].parent.artifact_id, "p1");
    }
}
