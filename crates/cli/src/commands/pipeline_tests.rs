// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use jack_core::SourceError;

fn args(source: &Path, job: Option<&str>) -> SourceArgs {
    SourceArgs { source: source.to_path_buf(), job: job.map(str::to_string), yes: false, no_params: false }
}

#[tokio::test]
async fn document_runs_as_its_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deploy.groovy");
    std::fs::write(&path, "node { echo 'hi' }").unwrap();

    let source = load_source(&args(&path, None)).await.unwrap();

    assert_eq!(source.job_name, "deploy");
    assert_eq!(source.script, "node { echo 'hi' }");
    assert_eq!(source.path.as_deref(), Some(path.as_path()));
}

#[tokio::test]
async fn job_flag_renames_the_job() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Jenkinsfile");
    std::fs::write(&path, "pipeline {}").unwrap();

    let source = load_source(&args(&path, Some("team/app"))).await.unwrap();

    assert_eq!(source.job_name, "team/app");
}

#[tokio::test]
async fn wrong_document_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "node {}").unwrap();

    let err = load_source(&args(&path, None)).await.unwrap_err();

    assert_eq!(err.downcast_ref::<SourceError>(), Some(&SourceError::WrongDocumentType(path)));
}

#[tokio::test]
async fn blank_document_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.groovy");
    std::fs::write(&path, "  \n").unwrap();

    let err = load_source(&args(&path, None)).await.unwrap_err();

    assert_eq!(err.downcast_ref::<SourceError>(), Some(&SourceError::Empty));
}

#[tokio::test]
async fn missing_document_names_the_path() {
    let err = load_source(&args(Path::new("/nonexistent/ci.groovy"), None)).await.unwrap_err();

    assert!(err.to_string().starts_with("failed to read /nonexistent/ci.groovy"), "{err}");
}

#[tokio::test]
async fn stdin_needs_a_job_name() {
    let err = load_source(&args(Path::new("-"), None)).await.unwrap_err();

    assert!(err.to_string().contains("--job"), "{err}");
}
