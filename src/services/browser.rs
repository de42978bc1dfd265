use crate::error::AppResult;

pub trait BrowserService: Send + Sync {
    fn open(&self, url: &str) -> AppResult<()>;
}
