//! Handler for `gavel tree`.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use gavel_core::dependency::MavenCoordinate;
use gavel_maven::fetch::FetchTimeouts;
use gavel_maven::probe::RepositoryProbe;
use gavel_resolver::cache::TransitiveDependencyCache;
use gavel_resolver::tree::{DependencyTreeBuilder, DEFAULT_MAX_DEPTH};
use miette::Result;

use super::Session;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

pub async fn exec(
    config_path: &Path,
    coordinate: &str,
    depth: Option<usize>,
    offline: bool,
) -> Result<()> {
    let coord = MavenCoordinate::parse(coordinate).ok_or_else(|| {
        gavel_util::errors::GavelError::Generic {
            message: format!("Invalid coordinate '{coordinate}', expected group:artifact:version"),
        }
    })?;

    let session = Session::load(config_path)?;
    let targets = if offline {
        Vec::new()
    } else {
        session.repository_targets()
    };

    // Weed out dead repositories up front so the traversal never waits on
    // a per-node connect timeout for them.
    let mut unreachable = HashSet::new();
    if !targets.is_empty() {
        let urls: Vec<String> = targets.iter().map(|t| t.url.clone()).collect();
        let spinner =
            gavel_util::progress::spinner(&format!("Probing {} repositories", urls.len()));
        unreachable = RepositoryProbe::new(PROBE_TIMEOUT)?.probe(&urls).await;
        spinner.finish_and_clear();
        if !unreachable.is_empty() {
            gavel_util::progress::status_warn(
                "Skipping",
                &format!("{} unreachable repositories", unreachable.len()),
            );
        }
    }

    let timeouts = FetchTimeouts::from_config(&session.config.fetch);
    let cache = TransitiveDependencyCache::new(session.local_reader(), targets, timeouts)?;

    let max_depth = depth.unwrap_or(DEFAULT_MAX_DEPTH);
    gavel_util::progress::status("Resolving", &format!("{coord} (depth {max_depth})"));
    let tree = DependencyTreeBuilder::new(&cache)
        .with_unreachable(unreachable)
        .build(&coord.group_id, &coord.artifact_id, &coord.version, max_depth)
        .await;

    print!("{}", tree.render());
    if tree.children.is_empty() {
        gavel_util::progress::status_warn(
            "Note",
            "no transitive dependencies found; the POM may be absent from all repositories",
        );
    }
    Ok(())
}
