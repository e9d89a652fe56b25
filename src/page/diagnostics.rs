use log::{debug, error, warn};
use std::path::{Path, PathBuf};

use crate::driver::traits::BrowserSession;

/// Screenshot taken right after the first load of the suite
pub const INITIAL_LOAD: &str = "debug_page_initial";
/// Suite-level setup could not reach the form
pub const SUITE_SETUP_ERROR: &str = "debug_page_error";
/// Per-case setup could not reach the form
pub const CASE_SETUP_ERROR: &str = "debug_page_error_setup";
/// The load-time case could not reach the form
pub const PERFORMANCE_ERROR: &str = "debug_page_error_performance";

/// Files written by one diagnostic capture
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub screenshot: Option<PathBuf>,
    pub markup: Option<PathBuf>,
}

/// Save `<stem>.png` and `<stem>.html` into `output_dir`
///
/// Capture problems are logged and swallowed: the snapshot exists to explain
/// another failure and must not replace it.
pub async fn capture(session: &dyn BrowserSession, output_dir: &Path, stem: &str) -> Snapshot {
    let mut snapshot = Snapshot::default();

    let png = output_dir.join(format!("{}.png", stem));
    match session.take_screenshot(&png).await {
        Ok(()) => snapshot.screenshot = Some(png),
        Err(e) => warn!("Could not save screenshot {}: {}", png.display(), e),
    }

    match session.page_source().await {
        Ok(source) => {
            debug!("=== PAGE SOURCE ({}) ===\n{}", stem, source);
            let html = output_dir.join(format!("{}.html", stem));
            match std::fs::write(&html, source) {
                Ok(()) => snapshot.markup = Some(html),
                Err(e) => warn!("Could not save page source {}: {}", html.display(), e),
            }
        }
        Err(e) => error!("Could not read page source: {}", e),
    }

    snapshot
}

/// Screenshot only, used after the first page load
pub async fn capture_screenshot(
    session: &dyn BrowserSession,
    output_dir: &Path,
    stem: &str,
) -> Option<PathBuf> {
    let png = output_dir.join(format!("{}.png", stem));
    match session.take_screenshot(&png).await {
        Ok(()) => Some(png),
        Err(e) => {
            warn!("Could not save screenshot {}: {}", png.display(), e);
            None
        }
    }
}
