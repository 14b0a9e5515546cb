//! Configuration to acknowledge deployment preferences as well as set defaults.
//!
//! Specifically, we try to find a portico.toml, and if present we load
//! settings from there. This provides the data directory and the uptime
//! endpoint; both can still be overridden on the command line.

use facet::Facet;
use std::fs;

#[derive(Facet, Clone)]
/// Deployment preferences loaded from portico.toml or falling back to
/// defaults.
pub struct Config {
    #[facet(default = "./data".to_string())]
    /// Directory holding links.json, settings.json, and notes.json.
    pub data_dir: String,
    #[facet(default = String::new())]
    /// Uptime status endpoint; empty disables the badge entirely.
    pub status_url: String,
    #[facet(default = 60)]
    /// Seconds between status polls.
    pub status_poll_secs: u64,
}

impl Config {
    #[must_use]
    /// Load configuration from portico.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Ok(contents) = fs::read_to_string("portico.toml") {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }
}
