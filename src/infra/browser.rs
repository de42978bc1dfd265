use crate::error::{AppError, AppResult};
use crate::services::BrowserService;

/// Opens URLs with the platform's default browser.
pub struct SystemBrowser;

impl BrowserService for SystemBrowser {
    fn open(&self, url: &str) -> AppResult<()> {
        webbrowser::open(url).map_err(|err| AppError::Browser(format!("failed to open {url}: {err}")))
    }
}
