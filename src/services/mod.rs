pub mod browser;
pub mod issue_tracker;

pub use browser::BrowserService;
pub use issue_tracker::IssueTrackerService;
