// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jack_adapters::{FakeFileStore, FakeJenkins, FakeUi, JenkinsCall};
use jack_core::job_config::inspect;
use jack_core::{ParamMap, ParameterDefinition};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

const SCRIPT: &str = "node { echo 'hello' }";

fn source() -> PipelineSource {
    PipelineSource::from_document(Path::new("/work/demo.groovy"), SCRIPT.to_string()).unwrap()
}

fn job(next_build_number: u32, parameters: Option<Vec<ParameterDefinition>>) -> JobInfo {
    JobInfo::builder().name("demo").next_build_number(next_build_number).parameters(parameters).build()
}

struct Harness {
    jenkins: FakeJenkins,
    files: FakeFileStore,
    ui: FakeUi,
    orchestrator: Orchestrator<FakeJenkins, FakeFileStore, FakeUi>,
}

fn harness(jenkins: FakeJenkins) -> Harness {
    let files = FakeFileStore::new();
    let ui = FakeUi::new();
    let orchestrator = Orchestrator::new(jenkins.clone(), files.clone(), ui.clone());
    Harness { jenkins, files, ui, orchestrator }
}

impl Harness {
    async fn trigger(&self) -> Result<Outcome<StartedBuild>, OrchestratorError> {
        self.orchestrator
            .trigger_build(&source(), &PipelineSettings::default(), &CancellationToken::new())
            .await
    }

    fn triggered(&self) -> Vec<BuildRequest> {
        self.jenkins
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                JenkinsCall::TriggerBuild(request) => Some(request),
                _ => None,
            })
            .collect()
    }
}

fn started(outcome: Outcome<StartedBuild>) -> StartedBuild {
    match outcome {
        Outcome::Completed(started) => started,
        other => panic!("expected a started build, got {other:?}"),
    }
}

#[tokio::test]
async fn new_job_is_created_and_built_without_parameters() {
    let h = harness(FakeJenkins::new());

    let started = started(h.trigger().await.unwrap());

    assert_eq!(started.handle, BuildHandle::new("demo", 1));
    assert_eq!(
        h.jenkins.call_kinds(),
        vec!["get_job", "create_job", "trigger_build", "await_ready"]
    );
    assert_eq!(h.triggered(), vec![BuildRequest::new("demo")]);
    assert_eq!(h.orchestrator.active_build(), Some(BuildHandle::new("demo", 1)));
    assert_eq!(h.orchestrator.last_job(), Some("demo".to_string()));

    let created = h.jenkins.config("demo").unwrap();
    assert_eq!(inspect(&created).unwrap().script.as_deref(), Some(SCRIPT));
    assert!(h.files.calls().is_empty());
}

#[tokio::test]
async fn existing_job_is_updated_then_built() {
    let jenkins = FakeJenkins::new().with_job(job(5, None), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);

    let started = started(h.trigger().await.unwrap());

    assert_eq!(started.handle.number, 5);
    assert_eq!(
        h.jenkins.call_kinds(),
        vec!["get_job", "get_config", "set_config", "get_job", "trigger_build", "await_ready"]
    );
    let summary = inspect(&h.jenkins.config("demo").unwrap()).unwrap();
    assert_eq!(summary.script.as_deref(), Some(SCRIPT));
    assert_eq!(summary.quiet_period.as_deref(), Some("0"));
    assert!(h.ui.events().iter().all(|e| !matches!(e, jack_adapters::UiEvent::Confirm { .. })));
}

#[tokio::test]
async fn active_build_rejects_new_work_without_remote_calls() {
    let h = harness(FakeJenkins::new());
    started(h.trigger().await.unwrap());
    let before = h.jenkins.calls().len();

    let build = h.trigger().await.unwrap_err();
    let update = h.orchestrator.update_only(&source(), &CancellationToken::new()).await.unwrap_err();

    assert!(matches!(build, OrchestratorError::AlreadyBuilding { ref job, build: 1 } if job == "demo"));
    assert!(matches!(update, OrchestratorError::AlreadyBuilding { .. }));
    assert_eq!(h.jenkins.calls().len(), before);
}

#[tokio::test]
async fn preparing_call_rejects_concurrent_work() {
    let params = Some(vec![ParameterDefinition::new("BRANCH", "main")]);
    let jenkins = FakeJenkins::new().with_job(job(2, params), DEFAULT_PIPELINE_CONFIG);
    let files = FakeFileStore::new();
    let ui = FakeUi::new();
    let gate = ui.hold_editor();
    let orchestrator = Arc::new(Orchestrator::new(jenkins.clone(), files, ui.clone()));

    let first = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move {
            orchestrator
                .trigger_build(&source(), &PipelineSettings::default(), &CancellationToken::new())
                .await
        })
    };
    while ui.edited().is_empty() {
        tokio::task::yield_now().await;
    }
    let before = jenkins.calls().len();

    let second = orchestrator
        .trigger_build(&source(), &PipelineSettings::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(second, OrchestratorError::Busy { ref job } if job == "demo"));
    assert_eq!(jenkins.calls().len(), before);

    gate.notify_one();
    let started = started(first.await.unwrap().unwrap());
    assert_eq!(started.handle, BuildHandle::new("demo", 2));
}

#[tokio::test]
async fn declining_creation_is_silent_and_leaves_idle() {
    let h = harness(FakeJenkins::new());
    h.ui.answer_confirm(false);

    let outcome = h.trigger().await.unwrap();

    assert_eq!(outcome, Outcome::Declined);
    assert_eq!(h.jenkins.call_kinds(), vec!["get_job"]);
    assert!(h.ui.warnings().is_empty());
    assert_eq!(h.orchestrator.active_build(), None);

    h.ui.answer_confirm(true);
    assert!(matches!(h.trigger().await.unwrap(), Outcome::Completed(_)));
}

#[tokio::test]
async fn cancellation_during_create_stops_before_trigger() {
    let h = harness(FakeJenkins::new());
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    h.jenkins.on_call(move |call| {
        if matches!(call, JenkinsCall::CreateJob { .. }) {
            token.cancel();
        }
    });

    let outcome =
        h.orchestrator.trigger_build(&source(), &PipelineSettings::default(), &cancel).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(h.jenkins.job("demo").is_some());
    assert!(h.triggered().is_empty());
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn cancellation_during_update_stops_before_trigger() {
    let jenkins = FakeJenkins::new().with_job(job(3, None), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    h.jenkins.on_call(move |call| {
        if matches!(call, JenkinsCall::SetConfig { .. }) {
            token.cancel();
        }
    });

    let outcome =
        h.orchestrator.trigger_build(&source(), &PipelineSettings::default(), &cancel).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert!(h.triggered().is_empty());
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn cancellation_while_waiting_for_readiness() {
    let h = harness(FakeJenkins::new());
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    h.jenkins.on_call(move |call| {
        if matches!(call, JenkinsCall::TriggerBuild(_)) {
            token.cancel();
        }
    });

    let outcome =
        h.orchestrator.trigger_build(&source(), &PipelineSettings::default(), &cancel).await.unwrap();

    assert_eq!(outcome, Outcome::Cancelled);
    assert_eq!(h.triggered().len(), 1);
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn readiness_timeout_names_job_and_build() {
    let h = harness(FakeJenkins::new());
    h.jenkins.fail("await_ready", JenkinsError::NotReady { job: "demo".to_string(), build: 1 });

    let err = h.trigger().await.unwrap_err();

    assert!(matches!(err, OrchestratorError::NotReady { ref job, build: 1 } if job == "demo"));
    assert_eq!(err.to_string(), "build demo #1 did not start in time");
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn remote_failure_leaves_orchestrator_idle() {
    let h = harness(FakeJenkins::new());
    h.jenkins.fail(
        "create_job",
        JenkinsError::Status { url: "u".to_string(), status: 500, body: String::new() },
    );

    let err = h.trigger().await.unwrap_err();
    assert!(matches!(err, OrchestratorError::Jenkins(JenkinsError::Status { status: 500, .. })));

    // Reservation released
    let again = h.trigger().await.unwrap_err();
    assert!(matches!(again, OrchestratorError::Jenkins(_)));
}

#[tokio::test]
async fn malformed_remote_config_fails_the_update() {
    let jenkins = FakeJenkins::new().with_job(job(1, None), "<flow-definition><definition>");
    let h = harness(jenkins);

    let err = h.trigger().await.unwrap_err();

    assert!(matches!(err, OrchestratorError::Config(ConfigError::Malformed { .. })), "{err:?}");
    assert!(!h.jenkins.call_kinds().contains(&"set_config"));
}

#[tokio::test]
async fn stored_overrides_are_sent_as_form_fields() {
    let params = Some(vec![
        ParameterDefinition::new("BRANCH", "main"),
        ParameterDefinition::new("RETRIES", 1),
    ]);
    let jenkins = FakeJenkins::new().with_job(job(4, params), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);
    h.files.put("/work/demo.params.json", ParamMap::from([("RETRIES".to_string(), json!(3))]));

    started(h.trigger().await.unwrap());

    assert_eq!(
        h.triggered(),
        vec![BuildRequest::new("demo").with_parameters(Some(vec![
            ("BRANCH".to_string(), "main".to_string()),
            ("RETRIES".to_string(), "3".to_string()),
        ]))]
    );
}

#[tokio::test]
async fn disabled_parameters_send_an_empty_set() {
    let params = Some(vec![ParameterDefinition::new("BRANCH", "main")]);
    let jenkins = FakeJenkins::new().with_job(job(4, params), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);

    let settings = PipelineSettings { params_enabled: false };
    h.orchestrator.trigger_build(&source(), &settings, &CancellationToken::new()).await.unwrap();

    assert_eq!(h.triggered(), vec![BuildRequest::new("demo").with_parameters(Some(Vec::new()))]);
    assert!(h.files.calls().is_empty());
}

#[tokio::test]
async fn parameters_without_a_source_file_fail() {
    let params = Some(vec![ParameterDefinition::new("BRANCH", "main")]);
    let jenkins = FakeJenkins::new().with_job(job(4, params), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);
    let stdin_source = PipelineSource::from_text("demo", SCRIPT.to_string()).unwrap();

    let err = h
        .orchestrator
        .trigger_build(&stdin_source, &PipelineSettings::default(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, OrchestratorError::Parameters(ParamsError::NoSourcePath)), "{err:?}");
    assert!(h.triggered().is_empty());
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn progress_is_reported_in_order() {
    let h = harness(FakeJenkins::new());

    started(h.trigger().await.unwrap());

    assert_eq!(
        h.ui.progress(),
        vec![
            "Preparing demo",
            "Creating job demo",
            "Resolving build parameters",
            "Triggering build #1",
            "Waiting for build #1 to start",
            "Build #1 started",
        ]
    );
}

#[tokio::test]
async fn abort_stops_and_clears_the_active_build() {
    let h = harness(FakeJenkins::new());
    started(h.trigger().await.unwrap());

    let aborted = h.orchestrator.abort_active().await;

    assert_eq!(aborted, Some(BuildHandle::new("demo", 1)));
    assert!(h.jenkins.calls().contains(&JenkinsCall::StopBuild { name: "demo".to_string(), number: 1 }));
    assert_eq!(h.orchestrator.active_build(), None);
    assert_eq!(h.orchestrator.last_job(), Some("demo".to_string()));
    assert_eq!(h.orchestrator.abort_active().await, None);
}

#[tokio::test]
async fn abort_clears_even_when_stop_fails() {
    let h = harness(FakeJenkins::new());
    started(h.trigger().await.unwrap());
    h.jenkins.fail(
        "stop_build",
        JenkinsError::Transport { url: "u".to_string(), message: "refused".to_string() },
    );

    assert!(h.orchestrator.abort_active().await.is_some());
    assert_eq!(h.orchestrator.active_build(), None);
}

#[tokio::test]
async fn complete_releases_the_guard() {
    let h = harness(FakeJenkins::new());
    started(h.trigger().await.unwrap());

    assert_eq!(h.orchestrator.complete_active(), Some(BuildHandle::new("demo", 1)));
    assert_eq!(h.orchestrator.active_build(), None);

    let next = started(h.trigger().await.unwrap());
    assert_eq!(next.handle.number, 2);
}

#[tokio::test]
async fn update_only_never_builds() {
    let jenkins = FakeJenkins::new().with_job(job(9, None), DEFAULT_PIPELINE_CONFIG);
    let h = harness(jenkins);

    let outcome = h.orchestrator.update_only(&source(), &CancellationToken::new()).await.unwrap();

    assert!(matches!(outcome, Outcome::Completed(ref job) if job.name == "demo"));
    assert!(h.triggered().is_empty());
    assert_eq!(h.orchestrator.active_build(), None);
    assert_eq!(h.orchestrator.last_job(), Some("demo".to_string()));
}

#[tokio::test]
async fn tracked_build_blocks_new_work() {
    let h = harness(FakeJenkins::new());
    h.orchestrator.track(BuildHandle::new("other", 7)).unwrap();

    let err = h.trigger().await.unwrap_err();

    assert!(matches!(err, OrchestratorError::AlreadyBuilding { ref job, build: 7 } if job == "other"));
    assert!(h.jenkins.calls().is_empty());
}
