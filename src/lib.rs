pub mod analyze;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod server;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use config::Config;
