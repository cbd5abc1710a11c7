//! Remote POM fetching over a prioritized repository list.

use std::collections::HashSet;
use std::time::Duration;

use gavel_core::config::FetchConfig;
use reqwest::Client;
use tracing::debug;

use crate::repository::{pom_url, RepositoryTarget};

const USER_AGENT: &str = concat!("gavel/", env!("CARGO_PKG_VERSION"));

/// Connect/read timeout profile for a fetcher.
#[derive(Debug, Clone, Copy)]
pub struct FetchTimeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl FetchTimeouts {
    /// Short timeouts for batch operations where one slow repository must
    /// not add per-dependency latency.
    pub fn fast() -> Self {
        Self {
            connect: Duration::from_secs(3),
            read: Duration::from_secs(5),
        }
    }

    /// Default interactive-path timeouts.
    pub fn standard() -> Self {
        Self {
            connect: Duration::from_secs(8),
            read: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            connect: Duration::from_secs(config.connect_timeout_secs),
            read: Duration::from_secs(config.read_timeout_secs),
        }
    }
}

/// Fetches POM files over HTTP from an ordered repository list, maintaining
/// a caller-owned skip-set of repositories that already failed during the
/// current batch.
#[derive(Debug, Clone)]
pub struct RemotePomFetcher {
    client: Client,
    targets: Vec<RepositoryTarget>,
}

impl RemotePomFetcher {
    pub fn new(targets: Vec<RepositoryTarget>, timeouts: FetchTimeouts) -> miette::Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.read)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| gavel_util::errors::GavelError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self { client, targets })
    }

    /// The repository targets this fetcher iterates, in priority order.
    pub fn targets(&self) -> &[RepositoryTarget] {
        &self.targets
    }

    /// Fetch the POM for a coordinate from the first repository that has it.
    ///
    /// Repositories already in `failed` (keyed by base URL) are skipped
    /// outright. A 404 is a normal "not in this repo" and moves on without
    /// marking anything; any other non-success status, timeout, or
    /// connection error adds the repository to `failed` so the rest of the
    /// batch skips it immediately. Returns `None` once the list is
    /// exhausted. Targets carrying credentials authenticate with HTTP basic
    /// auth.
    pub async fn fetch_pom(
        &self,
        group: &str,
        artifact: &str,
        version: &str,
        failed: &mut HashSet<String>,
    ) -> Option<String> {
        for target in &self.targets {
            let base = &target.url;
            if failed.contains(base) {
                continue;
            }
            let url = pom_url(base, group, artifact, version);
            let mut request = self.client.get(&url);
            if let Some(username) = &target.username {
                request = request.basic_auth(username, target.password.as_deref());
            }
            match request.send().await {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        match resp.text().await {
                            Ok(body) => return Some(body),
                            Err(e) => {
                                debug!("failed to read body from {base}: {e}");
                                failed.insert(base.clone());
                            }
                        }
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        debug!("{group}:{artifact}:{version} not in {base}");
                    } else {
                        debug!("HTTP {status} from {base}, skipping repository for this batch");
                        failed.insert(base.clone());
                    }
                }
                Err(e) => {
                    debug!("request to {base} failed: {e}");
                    failed.insert(base.clone());
                }
            }
        }
        None
    }
}
