// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory job directory for tests.

use super::{BuildRequest, JenkinsAdapter, JenkinsError, LogStream};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use jack_core::{job_url, JobFilter, JobInfo, JobSummary, WORKFLOW_JOB_CLASS};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use url::Url;

/// Recorded adapter call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JenkinsCall {
    ListJobs(JobFilter),
    GetJob(String),
    GetConfig(String),
    SetConfig { name: String, xml: String },
    CreateJob { name: String, xml: String },
    TriggerBuild(BuildRequest),
    StopBuild { name: String, number: u32 },
    AwaitReady { name: String, number: u32 },
    StreamLog { name: String, number: u32 },
    ListBuildNumbers(String),
    ConsoleText { name: String, number: u32 },
    GlobalsReference(Option<String>),
}

impl JenkinsCall {
    /// Operation name, as accepted by [`FakeJenkins::fail`].
    pub fn kind(&self) -> &'static str {
        match self {
            JenkinsCall::ListJobs(_) => "list_jobs",
            JenkinsCall::GetJob(_) => "get_job",
            JenkinsCall::GetConfig(_) => "get_config",
            JenkinsCall::SetConfig { .. } => "set_config",
            JenkinsCall::CreateJob { .. } => "create_job",
            JenkinsCall::TriggerBuild(_) => "trigger_build",
            JenkinsCall::StopBuild { .. } => "stop_build",
            JenkinsCall::AwaitReady { .. } => "await_ready",
            JenkinsCall::StreamLog { .. } => "stream_log",
            JenkinsCall::ListBuildNumbers(_) => "list_build_numbers",
            JenkinsCall::ConsoleText { .. } => "console_text",
            JenkinsCall::GlobalsReference(_) => "globals_reference",
        }
    }
}

type CallHook = Arc<dyn Fn(&JenkinsCall) + Send + Sync>;

struct FakeJob {
    info: JobInfo,
    class: String,
    config: String,
    builds: Vec<u32>,
}

struct FakeJenkinsState {
    calls: Vec<JenkinsCall>,
    jobs: BTreeMap<String, FakeJob>,
    consoles: HashMap<(String, u32), String>,
    log_chunks: Vec<Result<String, JenkinsError>>,
    hold_log_open: bool,
    globals: HashMap<Option<String>, String>,
    failures: HashMap<&'static str, JenkinsError>,
    hook: Option<CallHook>,
}

/// Fake Jenkins adapter for testing
#[derive(Clone)]
pub struct FakeJenkins {
    base: Url,
    inner: Arc<Mutex<FakeJenkinsState>>,
}

impl Default for FakeJenkins {
    fn default() -> Self {
        #[allow(clippy::expect_used)]
        let base = Url::parse("http://jenkins.test/").expect("constant url is valid");
        Self {
            base,
            inner: Arc::new(Mutex::new(FakeJenkinsState {
                calls: Vec::new(),
                jobs: BTreeMap::new(),
                consoles: HashMap::new(),
                log_chunks: Vec::new(),
                hold_log_open: false,
                globals: HashMap::new(),
                failures: HashMap::new(),
                hook: None,
            })),
        }
    }
}

impl FakeJenkins {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an existing pipeline job with the given config.
    pub fn with_job(self, info: JobInfo, config: impl Into<String>) -> Self {
        self.add_job(info, WORKFLOW_JOB_CLASS, config);
        self
    }

    /// Register an existing job of any class.
    pub fn add_job(&self, info: JobInfo, class: &str, config: impl Into<String>) {
        let builds = (1..info.next_build_number).collect();
        self.inner.lock().jobs.insert(
            info.name.clone(),
            FakeJob { info, class: class.to_string(), config: config.into(), builds },
        );
    }

    /// Chunks yielded by every log stream, in order.
    pub fn set_log(&self, chunks: Vec<Result<String, JenkinsError>>) {
        self.inner.lock().log_chunks = chunks;
    }

    /// Keep log streams open after their chunks, as for a build that never
    /// completes.
    pub fn hold_log_open(&self) {
        self.inner.lock().hold_log_open = true;
    }

    pub fn set_console(&self, name: &str, number: u32, text: impl Into<String>) {
        self.inner.lock().consoles.insert((name.to_string(), number), text.into());
    }

    pub fn set_globals(&self, scope_job: Option<&str>, html: impl Into<String>) {
        self.inner.lock().globals.insert(scope_job.map(str::to_string), html.into());
    }

    /// Fail every call of the named operation (see [`JenkinsCall::kind`]).
    pub fn fail(&self, kind: &'static str, error: JenkinsError) {
        self.inner.lock().failures.insert(kind, error);
    }

    /// Run `hook` on every call, after it is recorded.
    pub fn on_call(&self, hook: impl Fn(&JenkinsCall) + Send + Sync + 'static) {
        self.inner.lock().hook = Some(Arc::new(hook));
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<JenkinsCall> {
        self.inner.lock().calls.clone()
    }

    /// Names of the recorded calls, in order
    pub fn call_kinds(&self) -> Vec<&'static str> {
        self.inner.lock().calls.iter().map(JenkinsCall::kind).collect()
    }

    pub fn job(&self, name: &str) -> Option<JobInfo> {
        self.inner.lock().jobs.get(name).map(|j| j.info.clone())
    }

    pub fn config(&self, name: &str) -> Option<String> {
        self.inner.lock().jobs.get(name).map(|j| j.config.clone())
    }

    /// Replace the parameter definitions a job reports.
    pub fn set_parameters(&self, name: &str, parameters: Option<Vec<jack_core::ParameterDefinition>>) {
        if let Some(job) = self.inner.lock().jobs.get_mut(name) {
            job.info.parameters = parameters;
        }
    }

    fn record(&self, call: JenkinsCall) -> Result<(), JenkinsError> {
        let (hook, failure) = {
            let mut state = self.inner.lock();
            let failure = state.failures.get(call.kind()).cloned();
            state.calls.push(call.clone());
            (state.hook.clone(), failure)
        };
        if let Some(hook) = hook {
            hook(&call);
        }
        failure.map_or(Ok(()), Err)
    }

    fn missing(name: &str) -> JenkinsError {
        JenkinsError::JobNotFound(name.to_string())
    }
}

#[async_trait]
impl JenkinsAdapter for FakeJenkins {
    fn base_url(&self) -> &Url {
        &self.base
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<JobSummary>, JenkinsError> {
        self.record(JenkinsCall::ListJobs(filter))?;
        let state = self.inner.lock();
        Ok(state
            .jobs
            .values()
            .map(|j| JobSummary { name: j.info.name.clone(), url: j.info.url.clone(), class: j.class.clone() })
            .filter(|j| filter.matches(j))
            .collect())
    }

    async fn get_job(&self, name: &str) -> Result<Option<JobInfo>, JenkinsError> {
        self.record(JenkinsCall::GetJob(name.to_string()))?;
        Ok(self.job(name))
    }

    async fn get_config(&self, name: &str) -> Result<String, JenkinsError> {
        self.record(JenkinsCall::GetConfig(name.to_string()))?;
        self.config(name).ok_or_else(|| Self::missing(name))
    }

    async fn set_config(&self, name: &str, xml: &str) -> Result<(), JenkinsError> {
        self.record(JenkinsCall::SetConfig { name: name.to_string(), xml: xml.to_string() })?;
        let mut state = self.inner.lock();
        let job = state.jobs.get_mut(name).ok_or_else(|| Self::missing(name))?;
        job.config = xml.to_string();
        Ok(())
    }

    async fn create_job(&self, name: &str, xml: &str) -> Result<JobInfo, JenkinsError> {
        self.record(JenkinsCall::CreateJob { name: name.to_string(), xml: xml.to_string() })?;
        let info = JobInfo {
            name: name.to_string(),
            url: job_url(&self.base, name).to_string(),
            next_build_number: 1,
            parameters: None,
        };
        self.inner.lock().jobs.insert(
            name.to_string(),
            FakeJob {
                info: info.clone(),
                class: WORKFLOW_JOB_CLASS.to_string(),
                config: xml.to_string(),
                builds: Vec::new(),
            },
        );
        Ok(info)
    }

    async fn trigger_build(&self, request: BuildRequest) -> Result<(), JenkinsError> {
        let name = request.name.clone();
        self.record(JenkinsCall::TriggerBuild(request))?;
        let mut state = self.inner.lock();
        let job = state.jobs.get_mut(&name).ok_or_else(|| Self::missing(&name))?;
        job.builds.push(job.info.next_build_number);
        job.info.next_build_number += 1;
        Ok(())
    }

    async fn stop_build(&self, name: &str, number: u32) -> Result<(), JenkinsError> {
        self.record(JenkinsCall::StopBuild { name: name.to_string(), number })
    }

    async fn await_ready(&self, name: &str, number: u32) -> Result<(), JenkinsError> {
        self.record(JenkinsCall::AwaitReady { name: name.to_string(), number })
    }

    fn stream_log(&self, name: &str, number: u32) -> LogStream {
        let failed = self.record(JenkinsCall::StreamLog { name: name.to_string(), number }).err();
        let (chunks, hold) = {
            let state = self.inner.lock();
            (state.log_chunks.clone(), state.hold_log_open)
        };
        if let Some(error) = failed {
            return stream::iter(vec![Err(error)]).boxed();
        }
        let chunks = stream::iter(chunks);
        if hold {
            chunks.chain(stream::pending()).boxed()
        } else {
            chunks.boxed()
        }
    }

    async fn list_build_numbers(&self, job_url: &str) -> Result<Vec<u32>, JenkinsError> {
        self.record(JenkinsCall::ListBuildNumbers(job_url.to_string()))?;
        let state = self.inner.lock();
        let job = state
            .jobs
            .values()
            .find(|j| j.info.url.trim_end_matches('/') == job_url.trim_end_matches('/'))
            .ok_or_else(|| Self::missing(job_url))?;
        Ok(job.builds.iter().rev().copied().collect())
    }

    async fn console_text(&self, name: &str, number: u32) -> Result<String, JenkinsError> {
        self.record(JenkinsCall::ConsoleText { name: name.to_string(), number })?;
        let state = self.inner.lock();
        state.consoles.get(&(name.to_string(), number)).cloned().ok_or_else(|| JenkinsError::Status {
            url: format!("{}{}/consoleText", job_url(&self.base, name), number),
            status: 404,
            body: String::new(),
        })
    }

    async fn globals_reference(&self, scope_job: Option<&str>) -> Result<String, JenkinsError> {
        self.record(JenkinsCall::GlobalsReference(scope_job.map(str::to_string)))?;
        let state = self.inner.lock();
        let key = scope_job.map(str::to_string);
        Ok(state.globals.get(&key).or_else(|| state.globals.get(&None)).cloned().unwrap_or_default())
    }
}
