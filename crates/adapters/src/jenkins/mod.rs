// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote job directory adapter.

mod api;
mod http;

pub use http::HttpJenkins;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use jack_core::{JobFilter, JobInfo, JobSummary};
use thiserror::Error;

/// Errors from the remote job directory
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JenkinsError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },
    #[error("job {0} not found")]
    JobNotFound(String),
    #[error("build {job} #{build} did not start in time")]
    NotReady { job: String, build: u32 },
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// A build trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub name: String,
    /// `None` triggers a plain build; `Some` (even empty) triggers with
    /// parameters.
    pub parameters: Option<Vec<(String, String)>>,
}

impl BuildRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), parameters: None }
    }

    pub fn with_parameters(mut self, parameters: Option<Vec<(String, String)>>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Incremental console output of a build, ending when the build completes.
pub type LogStream = BoxStream<'static, Result<String, JenkinsError>>;

/// Adapter for the remote job directory
#[async_trait]
pub trait JenkinsAdapter: Clone + Send + Sync + 'static {
    /// Server root, used for deep links.
    fn base_url(&self) -> &url::Url;

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<JobSummary>, JenkinsError>;

    /// Look up a job. `Ok(None)` when it does not exist.
    async fn get_job(&self, name: &str) -> Result<Option<JobInfo>, JenkinsError>;

    async fn get_config(&self, name: &str) -> Result<String, JenkinsError>;

    async fn set_config(&self, name: &str, xml: &str) -> Result<(), JenkinsError>;

    async fn create_job(&self, name: &str, xml: &str) -> Result<JobInfo, JenkinsError>;

    async fn trigger_build(&self, request: BuildRequest) -> Result<(), JenkinsError>;

    async fn stop_build(&self, name: &str, number: u32) -> Result<(), JenkinsError>;

    /// Resolve once the build exists and its log can be streamed.
    /// Fails with [`JenkinsError::NotReady`] on timeout.
    async fn await_ready(&self, name: &str, number: u32) -> Result<(), JenkinsError>;

    fn stream_log(&self, name: &str, number: u32) -> LogStream;

    async fn list_build_numbers(&self, job_url: &str) -> Result<Vec<u32>, JenkinsError>;

    /// Full console output of a build.
    async fn console_text(&self, name: &str, number: u32) -> Result<String, JenkinsError>;

    /// HTML of the global variable reference, scoped to a job when given.
    async fn globals_reference(&self, scope_job: Option<&str>) -> Result<String, JenkinsError>;
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake;

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeJenkins, JenkinsCall};
