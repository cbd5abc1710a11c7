//! Handler for `gavel fetch`.

use std::path::Path;

use gavel_core::dependency::MavenCoordinate;
use gavel_maven::fetch::FetchTimeouts;
use gavel_resolver::cache::TransitiveDependencyCache;
use miette::Result;

use super::Session;

pub async fn exec(config_path: &Path, coordinate: &str) -> Result<()> {
    let coord = MavenCoordinate::parse(coordinate).ok_or_else(|| {
        gavel_util::errors::GavelError::Generic {
            message: format!("Invalid coordinate '{coordinate}', expected group:artifact:version"),
        }
    })?;

    let session = Session::load(config_path)?;
    let timeouts = FetchTimeouts::from_config(&session.config.fetch);
    let cache = TransitiveDependencyCache::new(
        session.local_reader(),
        session.repository_targets(),
        timeouts,
    )?;

    let spinner = gavel_util::progress::spinner(&format!("Fetching {coord}"));
    let deps = cache
        .resolve(&coord.group_id, &coord.artifact_id, &coord.version)
        .await;
    spinner.finish_and_clear();

    if deps.is_empty() {
        println!("{coord} declares no dependencies (or its POM was not found).");
        return Ok(());
    }
    println!("{coord} declares {} dependencies:", deps.len());
    for dep in deps {
        let scope = dep.scope.as_deref().unwrap_or("compile");
        println!("  {} ({scope})", dep.full_id());
    }
    Ok(())
}
