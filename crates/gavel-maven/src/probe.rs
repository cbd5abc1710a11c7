//! Concurrent repository reachability probing.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

/// Upper bound on concurrent probe requests.
pub const MAX_CONCURRENT_PROBES: usize = 8;

/// Extra wall-clock allowance on top of the socket timeout. DNS resolution
/// hangs are not covered by connect/read timeouts, so every probe future is
/// additionally bounded by this hard deadline.
const HARD_TIMEOUT_MARGIN: Duration = Duration::from_secs(2);

/// Pings candidate repositories in parallel to pre-identify unreachable
/// ones before a batch operation seeds its failed-repository skip-set.
///
/// Any HTTP response at all (401/403/404 included) counts as reachable;
/// only connection failures and timeouts mark a repository unreachable.
/// The worker pool is scoped to a single `probe` call.
#[derive(Debug, Clone)]
pub struct RepositoryProbe {
    client: Client,
    hard_timeout: Duration,
}

impl RepositoryProbe {
    pub fn new(socket_timeout: Duration) -> miette::Result<Self> {
        let client = Client::builder()
            .connect_timeout(socket_timeout)
            .timeout(socket_timeout)
            .user_agent(concat!("gavel/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| gavel_util::errors::GavelError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            hard_timeout: socket_timeout + HARD_TIMEOUT_MARGIN,
        })
    }

    /// Probe all URLs with one HEAD request each, at most
    /// [`MAX_CONCURRENT_PROBES`] in flight. Returns the set of unreachable
    /// base URLs.
    pub async fn probe(&self, urls: &[String]) -> HashSet<String> {
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_PROBES));
        let mut join_set = JoinSet::new();

        for url in urls {
            let client = self.client.clone();
            let url = url.clone();
            let sem = semaphore.clone();
            let hard_timeout = self.hard_timeout;
            join_set.spawn(async move {
                let _permit = sem.acquire().await;
                // The outer timeout cancels the request future outright if
                // it outlives the socket-level timeouts.
                let reachable = match tokio::time::timeout(hard_timeout, client.head(&url).send())
                    .await
                {
                    Ok(Ok(resp)) => {
                        debug!("probe {url}: HTTP {}", resp.status());
                        true
                    }
                    Ok(Err(e)) => {
                        debug!("probe {url} failed: {e}");
                        false
                    }
                    Err(_) => {
                        debug!("probe {url} exceeded hard timeout");
                        false
                    }
                };
                (url, reachable)
            });
        }

        let mut unreachable = HashSet::new();
        while let Some(result) = join_set.join_next().await {
            if let Ok((url, reachable)) = result {
                if !reachable {
                    unreachable.insert(url);
                }
            }
        }
        unreachable
    }
}
