// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-invocable commands.
//!
//! Each command runs to completion and reports failures through the UI as
//! warnings; callers only see a [`CommandStatus`].

use crate::log_relay::{relay, LogSink};
use crate::orchestrator::{Orchestrator, Outcome};
use crate::shared_lib::{Presentation, SharedLibraryBrowser};
use jack_adapters::{FileStore, JenkinsAdapter, JenkinsError, PickItem, UiAdapter};
use jack_core::{BuildHandle, JobFilter, PipelineSource, Settings};
use std::fmt::Display;
use tokio_util::sync::CancellationToken;

/// How a command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Completed,
    /// The user dismissed a prompt.
    Declined,
    Cancelled,
    /// A warning was shown.
    Failed,
}

pub struct Workbench<J, F, U> {
    jenkins: J,
    ui: U,
    orchestrator: Orchestrator<J, F, U>,
    browser: SharedLibraryBrowser<J>,
    settings: Settings,
}

impl<J, F, U> Workbench<J, F, U>
where
    J: JenkinsAdapter,
    F: FileStore,
    U: UiAdapter,
{
    pub fn new(jenkins: J, files: F, ui: U, settings: Settings) -> Self {
        Self {
            orchestrator: Orchestrator::new(jenkins.clone(), files, ui.clone()),
            browser: SharedLibraryBrowser::new(jenkins.clone()),
            jenkins,
            ui,
            settings,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<J, F, U> {
        &self.orchestrator
    }

    /// Build `source` and stream its log into `sink`.
    ///
    /// Cancelling `cancel` before the build starts abandons it; cancelling
    /// while the log streams aborts the build.
    pub async fn execute<S>(&self, source: &PipelineSource, sink: &mut S, cancel: &CancellationToken) -> CommandStatus
    where
        S: LogSink + ?Sized,
    {
        let started = match self.orchestrator.trigger_build(source, &self.settings.pipeline, cancel).await {
            Ok(Outcome::Completed(started)) => started,
            Ok(Outcome::Declined) => return CommandStatus::Declined,
            Ok(Outcome::Cancelled) => {
                self.ui.show_warning(&format!("Build of {} cancelled", source.job_name));
                return CommandStatus::Cancelled;
            }
            Err(e) => return self.report_failure("Execute pipeline", &e),
        };

        let handle = started.handle;
        self.ui.show_info(&format!("Build {} started: {}{}/", handle, started.job.url, handle.number));

        let relayed = tokio::select! {
            result = relay(&self.jenkins, &handle, sink) => result,
            _ = cancel.cancelled() => {
                self.orchestrator.abort_active().await;
                self.ui.show_warning(&format!("Build {} aborted", handle));
                return CommandStatus::Cancelled;
            }
        };

        self.orchestrator.complete_active();
        match relayed {
            Ok(summary) => {
                tracing::info!(build = %handle, bytes = summary.bytes, "build log complete");
                self.ui.show_info(&format!("Build {} finished", handle));
                CommandStatus::Completed
            }
            Err(e) => self.report_failure("Build log", &e),
        }
    }

    /// Push `source` to its job without building.
    pub async fn update(&self, source: &PipelineSource, cancel: &CancellationToken) -> CommandStatus {
        match self.orchestrator.update_only(source, cancel).await {
            Ok(Outcome::Completed(job)) => {
                self.ui.show_info(&format!("Job {} updated", job.name));
                CommandStatus::Completed
            }
            Ok(Outcome::Declined) => CommandStatus::Declined,
            Ok(Outcome::Cancelled) => {
                self.ui.show_warning(&format!("Update of {} cancelled", source.job_name));
                CommandStatus::Cancelled
            }
            Err(e) => self.report_failure("Update pipeline", &e),
        }
    }

    /// Abort the active build.
    pub async fn abort(&self) -> CommandStatus {
        match self.orchestrator.abort_active().await {
            Some(handle) => {
                self.ui.show_info(&format!("Aborted build {}", handle));
                CommandStatus::Completed
            }
            None => {
                self.ui.show_warning("No pipeline build is running");
                CommandStatus::Failed
            }
        }
    }

    /// Abort the newest build of `job`, unless a build is already active.
    pub async fn abort_latest(&self, job: &str) -> CommandStatus {
        if self.orchestrator.active_build().is_none() {
            let info = match self.jenkins.get_job(job).await {
                Ok(Some(info)) => info,
                Ok(None) => {
                    return self.report_failure("Abort", &JenkinsError::JobNotFound(job.to_string()))
                }
                Err(e) => return self.report_failure("Abort", &e),
            };
            if info.next_build_number <= 1 {
                self.ui.show_warning(&format!("{} has no builds", job));
                return CommandStatus::Failed;
            }
            if let Err(e) = self.orchestrator.track(BuildHandle::new(job, info.next_build_number - 1)) {
                return self.report_failure("Abort", &e);
            }
        }
        self.abort().await
    }

    /// Let the user pick a step or variable and show its documentation.
    ///
    /// The reference is scoped to `scope_job`, else to the last job built.
    pub async fn browse_shared_library(&self, scope_job: Option<&str>) -> CommandStatus {
        let scope = scope_job.map(str::to_string).or_else(|| self.orchestrator.last_job());
        let entries = match self.browser.list_entries(scope.as_deref()).await {
            Ok(entries) => entries,
            Err(e) => return self.report_failure("Shared library reference", &e),
        };
        if entries.is_empty() {
            self.ui.show_info("No shared library entries found");
            return CommandStatus::Completed;
        }

        let items: Vec<PickItem> = entries.iter().map(|e| PickItem::new(e.label.clone())).collect();
        let entry = match self.ui.quick_pick("Shared library reference", &items).await {
            Ok(Some(index)) => match self.browser.entry(index) {
                Some(entry) => entry,
                None => return CommandStatus::Declined,
            },
            Ok(None) => return CommandStatus::Declined,
            Err(e) => return self.report_failure("Shared library reference", &e),
        };

        match self.browser.present(&entry, self.settings.shared_library.inline, scope.as_deref()) {
            Presentation::Inline { title, text } => self.ui.show_inline(&title, &text),
            Presentation::Link(url) => self.ui.open_link(&url),
        }
        CommandStatus::Completed
    }

    /// Download the console text of a build into `sink`. Without `job`, the
    /// user picks one; the build is always picked.
    pub async fn download_build_log<S>(&self, job: Option<&str>, sink: &mut S) -> CommandStatus
    where
        S: LogSink + ?Sized,
    {
        const ACTION: &str = "Download build log";

        let (name, url) = match job {
            Some(name) => match self.jenkins.get_job(name).await {
                Ok(Some(info)) => (info.name, info.url),
                Ok(None) => {
                    return self.report_failure(ACTION, &JenkinsError::JobNotFound(name.to_string()))
                }
                Err(e) => return self.report_failure(ACTION, &e),
            },
            None => {
                let jobs = match self.jenkins.list_jobs(JobFilter::All).await {
                    Ok(jobs) => jobs,
                    Err(e) => return self.report_failure(ACTION, &e),
                };
                if jobs.is_empty() {
                    self.ui.show_info("No jobs found");
                    return CommandStatus::Completed;
                }
                let items: Vec<PickItem> = jobs
                    .iter()
                    .map(|j| PickItem::new(j.name.clone()).with_detail(j.url.clone()))
                    .collect();
                match self.ui.quick_pick("Select job", &items).await {
                    Ok(Some(index)) => match jobs.into_iter().nth(index) {
                        Some(job) => (job.name, job.url),
                        None => return CommandStatus::Declined,
                    },
                    Ok(None) => return CommandStatus::Declined,
                    Err(e) => return self.report_failure(ACTION, &e),
                }
            }
        };

        let builds = match self.jenkins.list_build_numbers(&url).await {
            Ok(builds) => builds,
            Err(e) => return self.report_failure(ACTION, &e),
        };
        if builds.is_empty() {
            self.ui.show_info(&format!("{} has no builds", name));
            return CommandStatus::Completed;
        }
        let items: Vec<PickItem> = builds.iter().map(|n| PickItem::new(format!("#{}", n))).collect();
        let number = match self.ui.quick_pick("Select build", &items).await {
            Ok(Some(index)) => match builds.get(index) {
                Some(number) => *number,
                None => return CommandStatus::Declined,
            },
            Ok(None) => return CommandStatus::Declined,
            Err(e) => return self.report_failure(ACTION, &e),
        };

        let text = match self.jenkins.console_text(&name, number).await {
            Ok(text) => text,
            Err(e) => return self.report_failure(ACTION, &e),
        };
        if let Err(e) = sink.write_chunk(&text) {
            return self.report_failure(ACTION, &e);
        }
        tracing::info!(job = %name, build = number, bytes = text.len(), "downloaded build log");
        CommandStatus::Completed
    }

    /// Write one `name<TAB>url` line per job into `sink`.
    pub async fn list_jobs<S>(&self, filter: JobFilter, sink: &mut S) -> CommandStatus
    where
        S: LogSink + ?Sized,
    {
        let jobs = match self.jenkins.list_jobs(filter).await {
            Ok(jobs) => jobs,
            Err(e) => return self.report_failure("List jobs", &e),
        };
        tracing::debug!(%filter, count = jobs.len(), "listed jobs");
        for job in jobs {
            if let Err(e) = sink.write_chunk(&format!("{}\t{}\n", job.name, job.url)) {
                return self.report_failure("List jobs", &e);
            }
        }
        CommandStatus::Completed
    }

    /// Log `error` and show it as a warning.
    pub fn report_failure(&self, action: &str, error: &dyn Display) -> CommandStatus {
        tracing::warn!(action, error = %error, "command failed");
        self.ui.show_warning(&format!("{} failed: {}", action, error));
        CommandStatus::Failed
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
