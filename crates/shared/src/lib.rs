pub mod composer;
pub mod config;
mod config_env;
pub mod llm;
pub mod models;
pub mod notifications;
pub mod presets;
pub mod preview;
pub mod schedule;
pub mod timezone;
