pub mod config;
pub mod template;
pub mod ticket;
