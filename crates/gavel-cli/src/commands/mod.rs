//! Command dispatch and handler modules.

mod analyze;
mod fetch;
mod probe;
mod rules;
mod tree;

use std::path::Path;

use gavel_core::config::GavelConfig;
use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(GavelConfig::default_path);
    match cli.command {
        Command::Tree {
            coordinate,
            depth,
            offline,
        } => tree::exec(&config_path, &coordinate, depth, offline).await,
        Command::Analyze {
            input,
            module,
            build_system,
            json,
        } => analyze::exec(&config_path, &input, module.as_deref(), &build_system, json).await,
        Command::Probe => probe::exec(&config_path).await,
        Command::Fetch { coordinate } => fetch::exec(&config_path, &coordinate).await,
        Command::Rules { json } => rules::exec(json),
    }
}

/// Shared handler plumbing: resolve config path, repository URLs and the
/// local cache reader in one place.
pub(crate) struct Session {
    pub config: GavelConfig,
}

impl Session {
    pub fn load(config_path: &Path) -> Result<Self> {
        let config = GavelConfig::load(config_path)?;
        Ok(Self { config })
    }

    /// Ordered remote repository targets (URL plus credentials) for this
    /// configuration.
    pub fn repository_targets(&self) -> Vec<gavel_maven::repository::RepositoryTarget> {
        gavel_maven::repository::RepositoryResolver::new(self.config.repository_snapshot())
            .ordered_targets()
    }

    /// Ordered remote repository URLs for this configuration.
    pub fn repository_urls(&self) -> Vec<String> {
        self.repository_targets().into_iter().map(|t| t.url).collect()
    }

    pub fn local_reader(&self) -> gavel_maven::local::LocalPomReader {
        gavel_maven::local::LocalPomReader::from_config(&self.config.cache)
    }
}
