// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline orchestration.
//!
//! Drives one build from source text to a running remote build: create or
//! update the job, negotiate parameters, trigger, and wait for the build to
//! become streamable. At most one build is active per orchestrator.

use crate::params::{ParameterNegotiator, ParamsError};
use jack_adapters::{BuildRequest, FileStore, JenkinsAdapter, JenkinsError, UiAdapter, UiError};
use jack_core::{
    build_or_update_config, BuildHandle, ConfigError, JobInfo, PipelineSettings, PipelineSource,
    DEFAULT_PIPELINE_CONFIG,
};
use parking_lot::Mutex;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that end an orchestration call
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("build {job} #{build} is still running; abort it first")]
    AlreadyBuilding { job: String, build: u32 },
    #[error("another operation on {job} is in progress")]
    Busy { job: String },
    #[error(transparent)]
    Jenkins(#[from] JenkinsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("parameters: {0}")]
    Parameters(ParamsError),
    #[error(transparent)]
    Ui(#[from] UiError),
    #[error("build {job} #{build} did not start in time")]
    NotReady { job: String, build: u32 },
}

/// Result of a call that the user or a cancellation can cut short.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    /// The user declined to create the job.
    Declined,
    Cancelled,
}

/// A triggered build that is ready to stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StartedBuild {
    pub handle: BuildHandle,
    pub job: JobInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Idle,
    Preparing { job: String },
    Building(BuildHandle),
}

#[derive(Debug)]
struct State {
    phase: Phase,
    last_job: Option<String>,
}

/// Claim on the orchestrator for one call. Dropping it without
/// [`Reservation::promote`] returns the orchestrator to idle.
struct Reservation<'a> {
    state: &'a Mutex<State>,
    armed: bool,
}

impl Reservation<'_> {
    fn promote(mut self, handle: BuildHandle) {
        let mut state = self.state.lock();
        state.last_job = Some(handle.job.clone());
        state.phase = Phase::Building(handle);
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.state.lock().phase = Phase::Idle;
        }
    }
}

pub struct Orchestrator<J, F, U> {
    jenkins: J,
    ui: U,
    negotiator: ParameterNegotiator<F, U>,
    state: Mutex<State>,
}

impl<J, F, U> Orchestrator<J, F, U>
where
    J: JenkinsAdapter,
    F: FileStore,
    U: UiAdapter,
{
    pub fn new(jenkins: J, files: F, ui: U) -> Self {
        Self {
            jenkins,
            negotiator: ParameterNegotiator::new(files, ui.clone()),
            ui,
            state: Mutex::new(State { phase: Phase::Idle, last_job: None }),
        }
    }

    /// The running build, if any.
    pub fn active_build(&self) -> Option<BuildHandle> {
        match &self.state.lock().phase {
            Phase::Building(handle) => Some(handle.clone()),
            _ => None,
        }
    }

    /// Name of the most recently built, updated or aborted job.
    pub fn last_job(&self) -> Option<String> {
        self.state.lock().last_job.clone()
    }

    /// Create or update the job for `source`, then trigger a build and wait
    /// until it can be streamed.
    pub async fn trigger_build(
        &self,
        source: &PipelineSource,
        settings: &PipelineSettings,
        cancel: &CancellationToken,
    ) -> Result<Outcome<StartedBuild>, OrchestratorError> {
        let reservation = self.reserve(&source.job_name)?;
        let name = source.job_name.as_str();
        self.ui.report_progress(0, &format!("Preparing {}", name));

        let Some(job) = self.create_or_update(source).await? else {
            return Ok(Outcome::Declined);
        };
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        self.ui.report_progress(20, "Resolving build parameters");
        let resolution = match self
            .negotiator
            .resolve(job.parameters.as_deref(), source.path.as_deref(), settings, cancel)
            .await
        {
            Ok(resolution) => resolution,
            Err(ParamsError::Cancelled) => return Ok(Outcome::Cancelled),
            Err(e) => return Err(OrchestratorError::Parameters(e)),
        };
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        let number = job.next_build_number;
        self.ui.report_progress(20, &format!("Triggering build #{}", number));
        let request = BuildRequest::new(name).with_parameters(resolution.to_build_parameters());
        self.jenkins.trigger_build(request).await?;

        self.ui.report_progress(20, &format!("Waiting for build #{} to start", number));
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(Outcome::Cancelled),
            ready = self.jenkins.await_ready(name, number) => match ready {
                Ok(()) => {}
                Err(JenkinsError::NotReady { job, build }) => {
                    return Err(OrchestratorError::NotReady { job, build });
                }
                Err(e) => return Err(e.into()),
            },
        }

        let handle = BuildHandle::new(name, number);
        reservation.promote(handle.clone());
        self.ui.report_progress(20, &format!("Build #{} started", number));
        tracing::info!(job = name, build = number, "build started");
        Ok(Outcome::Completed(StartedBuild { handle, job }))
    }

    /// Create or update the job for `source` without building it.
    pub async fn update_only(
        &self,
        source: &PipelineSource,
        cancel: &CancellationToken,
    ) -> Result<Outcome<JobInfo>, OrchestratorError> {
        let _reservation = self.reserve(&source.job_name)?;
        self.ui.report_progress(0, &format!("Preparing {}", source.job_name));

        let Some(job) = self.create_or_update(source).await? else {
            return Ok(Outcome::Declined);
        };
        if cancel.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }

        self.state.lock().last_job = Some(job.name.clone());
        self.ui.report_progress(80, &format!("{} is up to date", job.name));
        Ok(Outcome::Completed(job))
    }

    /// Track a build started elsewhere so it can be aborted.
    pub fn track(&self, handle: BuildHandle) -> Result<(), OrchestratorError> {
        let mut state = self.state.lock();
        if let Some(conflict) = conflict(&state.phase) {
            return Err(conflict);
        }
        state.phase = Phase::Building(handle);
        Ok(())
    }

    /// Ask the server to stop the active build and forget it.
    ///
    /// The stop request is best effort; the build is cleared either way.
    pub async fn abort_active(&self) -> Option<BuildHandle> {
        let handle = self.active_build()?;
        if let Err(e) = self.jenkins.stop_build(&handle.job, handle.number).await {
            tracing::warn!(job = %handle.job, build = handle.number, error = %e, "stop request failed");
        }
        self.clear_active(&handle);
        tracing::info!(job = %handle.job, build = handle.number, "build aborted");
        Some(handle)
    }

    /// Forget the active build after its log has ended.
    pub fn complete_active(&self) -> Option<BuildHandle> {
        let handle = self.active_build()?;
        self.clear_active(&handle);
        Some(handle)
    }

    fn clear_active(&self, handle: &BuildHandle) {
        let mut state = self.state.lock();
        if state.phase == Phase::Building(handle.clone()) {
            state.phase = Phase::Idle;
        }
        state.last_job = Some(handle.job.clone());
    }

    fn reserve(&self, job: &str) -> Result<Reservation<'_>, OrchestratorError> {
        let mut state = self.state.lock();
        if let Some(conflict) = conflict(&state.phase) {
            return Err(conflict);
        }
        state.phase = Phase::Preparing { job: job.to_string() };
        Ok(Reservation { state: &self.state, armed: true })
    }

    /// Push `source` to the server. `Ok(None)` when the user declines
    /// creating a missing job.
    async fn create_or_update(&self, source: &PipelineSource) -> Result<Option<JobInfo>, OrchestratorError> {
        let name = source.job_name.as_str();

        if self.jenkins.get_job(name).await?.is_none() {
            let message = format!("Job {} does not exist on the server. Create it?", name);
            if !self.ui.confirm(&message, "Create").await? {
                tracing::info!(job = name, "job creation declined");
                return Ok(None);
            }
            self.ui.report_progress(20, &format!("Creating job {}", name));
            let xml = build_or_update_config(DEFAULT_PIPELINE_CONFIG, &source.script)?;
            let job = self.jenkins.create_job(name, &xml).await?;
            tracing::info!(job = name, "job created");
            return Ok(Some(job));
        }

        self.ui.report_progress(20, &format!("Updating job {}", name));
        let existing = self.jenkins.get_config(name).await?;
        let xml = build_or_update_config(&existing, &source.script)?;
        self.jenkins.set_config(name, &xml).await?;
        tracing::info!(job = name, "job updated");

        // Refresh for the current build number and parameter definitions
        let job = self
            .jenkins
            .get_job(name)
            .await?
            .ok_or_else(|| JenkinsError::JobNotFound(name.to_string()))?;
        Ok(Some(job))
    }
}

/// Error for starting work while `phase` is not idle.
fn conflict(phase: &Phase) -> Option<OrchestratorError> {
    match phase {
        Phase::Idle => None,
        Phase::Preparing { job } => Some(OrchestratorError::Busy { job: job.clone() }),
        Phase::Building(active) => Some(OrchestratorError::AlreadyBuilding {
            job: active.job.clone(),
            build: active.number,
        }),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
