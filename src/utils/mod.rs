/// TOML configuration and credential resolution.
pub mod config;
