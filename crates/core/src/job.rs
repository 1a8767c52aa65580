// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote job identity, listings and build handles.

use crate::params::ParameterDefinition;
use serde::{Deserialize, Serialize};
use url::Url;

/// Jenkins class name of scripted/declarative pipeline jobs.
pub const WORKFLOW_JOB_CLASS: &str = "org.jenkinsci.plugins.workflow.job.WorkflowJob";

/// A remote job as reported by the job directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobInfo {
    pub name: String,
    pub url: String,
    /// Number the next triggered build will receive.
    pub next_build_number: u32,
    /// `None` when the job declares no parameters property.
    pub parameters: Option<Vec<ParameterDefinition>>,
}

crate::builder! {
    pub struct JobInfoBuilder => JobInfo {
        into {
            name: String = "demo",
            url: String = "http://jenkins.test/job/demo/",
        }
        set {
            next_build_number: u32 = 1,
            parameters: Option<Vec<ParameterDefinition>> = None,
        }
    }
}

/// One row of a job listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSummary {
    pub name: String,
    pub url: String,
    pub class: String,
}

impl JobSummary {
    pub fn is_pipeline(&self) -> bool {
        self.class == WORKFLOW_JOB_CLASS
    }
}

/// Which jobs a listing should return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JobFilter {
    #[default]
    All,
    Pipelines,
}

impl JobFilter {
    pub fn matches(&self, job: &JobSummary) -> bool {
        match self {
            JobFilter::All => true,
            JobFilter::Pipelines => job.is_pipeline(),
        }
    }
}

crate::simple_display! {
    JobFilter {
        All => "all",
        Pipelines => "pipelines",
    }
}

/// The in-flight build of a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildHandle {
    pub job: String,
    pub number: u32,
}

impl BuildHandle {
    pub fn new(job: impl Into<String>, number: u32) -> Self {
        Self { job: job.into(), number }
    }
}

impl std::fmt::Display for BuildHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} #{}", self.job, self.number)
    }
}

/// Build a URL below `base`, scoped to `job` when given.
///
/// Folder jobs (`team/app`) expand to `job/team/job/app`. Each `tail`
/// segment is appended after the job path and percent-encoded; an empty
/// trailing segment yields a trailing slash.
pub fn endpoint(base: &Url, job: Option<&str>, tail: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty();
        if let Some(job) = job {
            for part in job.split('/').filter(|p| !p.is_empty()) {
                segments.push("job").push(part);
            }
        }
        segments.extend(tail);
    }
    url
}

/// Canonical URL of a job (with trailing slash).
pub fn job_url(base: &Url, job: &str) -> Url {
    endpoint(base, Some(job), &[""])
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
