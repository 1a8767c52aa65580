// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Settings snapshot.
//!
//! Settings are read once into an immutable [`Settings`] value and passed
//! explicitly into every orchestration call. Re-reading produces a new
//! snapshot; nothing observes the file afterwards.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Environment variable overriding `jenkins.url`.
pub const ENV_URL: &str = "JACK_URL";
/// Environment variable overriding `jenkins.username`.
pub const ENV_USERNAME: &str = "JACK_USERNAME";
/// Environment variable overriding `jenkins.api_token`.
pub const ENV_API_TOKEN: &str = "JACK_API_TOKEN";

/// Errors from loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no Jenkins URL configured (set jenkins.url or JACK_URL)")]
    MissingUrl,
    #[error("invalid Jenkins URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub jenkins: JenkinsSettings,
    pub pipeline: PipelineSettings,
    pub shared_library: SharedLibrarySettings,
}

/// Connection to the Jenkins server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JenkinsSettings {
    pub url: Option<String>,
    pub username: Option<String>,
    pub api_token: Option<String>,
    /// How long to wait for a triggered build to start.
    pub readiness_timeout_secs: u64,
    /// Interval between readiness and log polls.
    pub poll_interval_ms: u64,
    pub request_timeout_secs: u64,
}

impl Default for JenkinsSettings {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            api_token: None,
            readiness_timeout_secs: 30,
            poll_interval_ms: 1000,
            request_timeout_secs: 30,
        }
    }
}

impl JenkinsSettings {
    /// Parsed server URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let raw = self.url.as_deref().filter(|u| !u.trim().is_empty()).ok_or(SettingsError::MissingUrl)?;
        Url::parse(raw.trim())
            .map_err(|source| SettingsError::InvalidUrl { url: raw.to_string(), source })
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    /// When false, builds are triggered with an empty parameter set even if
    /// the job declares parameters.
    pub params_enabled: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self { params_enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharedLibrarySettings {
    /// Render documentation in the terminal instead of printing a link.
    pub inline: bool,
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Read { path: path.to_path_buf(), source }),
        }
    }

    /// Apply overrides from an environment lookup. Empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = get(ENV_URL) {
            self.jenkins.url = Some(url);
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.jenkins.username = Some(username);
        }
        if let Some(token) = get(ENV_API_TOKEN) {
            self.jenkins.api_token = Some(token);
        }
        self
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
