// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the CLI.

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Version reported by `jack --version`
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

pub const CONFIG_ENV: &str = "JACK_CONFIG";
pub const LOG_ENV: &str = "JACK_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

/// Resolve the settings file: JACK_CONFIG > XDG_CONFIG_HOME/jack > platform config dir.
pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(path));
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(xdg).join("jack/config.toml"));
    }
    dirs::config_dir().map(|dir| dir.join("jack/config.toml"))
}

/// Log filter from JACK_LOG, defaulting to warnings only.
pub fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Settings overrides read from the process environment.
pub fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
