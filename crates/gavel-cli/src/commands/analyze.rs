//! Handler for `gavel analyze`.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use console::Style;
use gavel_core::dependency::InstalledDependency;
use gavel_core::rules::{RuleSet, Severity};
use gavel_core::suggestion::{AnalysisResult, BuildSystem, SuggestionSource};
use gavel_maven::fetch::FetchTimeouts;
use gavel_resolver::cache::TransitiveDependencyCache;
use gavel_resolver::engine::ExclusionAnalysisEngine;
use miette::Result;

use super::Session;

pub async fn exec(
    config_path: &Path,
    input: &Path,
    module: Option<&str>,
    build_system: &str,
    json: bool,
) -> Result<()> {
    let build_system = parse_build_system(build_system)?;
    let dependencies = read_dependencies(input)?;

    let session = Session::load(config_path)?;
    let timeouts = FetchTimeouts::from_config(&session.config.fetch);
    let cache = Arc::new(TransitiveDependencyCache::new(
        session.local_reader(),
        session.repository_targets(),
        timeouts,
    )?);
    let engine = ExclusionAnalysisEngine::new(cache, RuleSet::load_bundled());

    let bar = gavel_util::progress::progress_bar(dependencies.len() as u64, "Analyzing");
    let bar_ref = bar.clone();
    let on_progress: &gavel_resolver::engine::ProgressCallback =
        &move |done, _total| bar_ref.set_position(done as u64);
    let result = engine
        .analyze(
            &dependencies,
            module,
            build_system,
            &AtomicBool::new(false),
            Some(on_progress),
            None,
        )
        .await;
    bar.finish_and_clear();

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(|e| {
            gavel_util::errors::GavelError::Generic {
                message: format!("Failed to serialize analysis result: {e}"),
            }
        })?;
        println!("{rendered}");
        return Ok(());
    }
    print_report(&result);
    Ok(())
}

fn parse_build_system(s: &str) -> Result<BuildSystem> {
    match s {
        "gradle" => Ok(BuildSystem::Gradle),
        "maven" => Ok(BuildSystem::Maven),
        other => Err(gavel_util::errors::GavelError::Generic {
            message: format!("Unknown build system '{other}', expected gradle or maven"),
        }
        .into()),
    }
}

fn read_dependencies(input: &Path) -> Result<Vec<InstalledDependency>> {
    let content =
        std::fs::read_to_string(input).map_err(|e| gavel_util::errors::GavelError::Generic {
            message: format!("Failed to read {}: {e}", input.display()),
        })?;
    serde_json::from_str(&content).map_err(|e| {
        gavel_util::errors::GavelError::Parse {
            message: format!("Failed to parse {}: {e}", input.display()),
        }
        .into()
    })
}

fn print_report(result: &AnalysisResult) {
    if result.all_missing() {
        gavel_util::progress::status_warn(
            "Warning",
            "no POMs found in local caches; run a project build first to populate them",
        );
        return;
    }
    if result.has_missing_poms() {
        gavel_util::progress::status_warn(
            "Note",
            &format!(
                "{} of {} dependencies had no local POM and were skipped",
                result.local_cache_misses, result.total_analyzed
            ),
        );
    }

    if result.suggestions.is_empty() {
        gavel_util::progress::status(
            "Finished",
            &format!("{} dependencies analyzed, nothing to exclude", result.total_analyzed),
        );
        return;
    }

    println!(
        "{} exclusion suggestions across {} dependencies:",
        result.suggestions.len(),
        result.total_analyzed
    );
    for s in &result.suggestions {
        let style = severity_style(s.severity);
        println!(
            "  [{}] exclude {} from {}",
            style.apply_to(s.severity),
            s.exclusion.id(),
            s.parent.full_id()
        );
        println!("        {}", s.reason);
        if s.source == SuggestionSource::ConflictDetection && !s.conflicting_versions.is_empty() {
            println!("        versions seen: {}", s.conflicting_versions.join(", "));
        }
    }
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::new().red().bold(),
        Severity::Warning => Style::new().yellow(),
        Severity::Info => Style::new().cyan(),
    }
}
