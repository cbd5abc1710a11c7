//! Handler for `gavel probe`.

use std::path::Path;
use std::time::Duration;

use console::Style;
use gavel_maven::probe::RepositoryProbe;
use miette::Result;

use super::Session;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn exec(config_path: &Path) -> Result<()> {
    let session = Session::load(config_path)?;
    let urls = session.repository_urls();
    if urls.is_empty() {
        println!("No repositories configured.");
        return Ok(());
    }

    let spinner =
        gavel_util::progress::spinner(&format!("Probing {} repositories", urls.len()));
    let unreachable = RepositoryProbe::new(PROBE_TIMEOUT)?.probe(&urls).await;
    spinner.finish_and_clear();

    let ok = Style::new().green();
    let bad = Style::new().red().bold();
    for url in &urls {
        if unreachable.contains(url) {
            println!("{} {url}", bad.apply_to("unreachable"));
        } else {
            println!("{}   {url}", ok.apply_to("reachable"));
        }
    }
    if !unreachable.is_empty() {
        gavel_util::progress::status_warn(
            "Warning",
            &format!("{} of {} repositories unreachable", unreachable.len(), urls.len()),
        );
    }
    Ok(())
}
