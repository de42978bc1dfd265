pub mod browser;
pub mod gitlab;
