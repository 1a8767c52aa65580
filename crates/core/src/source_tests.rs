// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[yare::parameterized(
    groovy        = { "ci/deploy.groovy",      true },
    upper_groovy  = { "ci/Deploy.GROOVY",      true },
    jenkinsfile   = { "Jenkinsfile",           true },
    suffixed      = { "Jenkinsfile.release",   true },
    ext_form      = { "app.jenkinsfile",       true },
    markdown      = { "README.md",             false },
    no_extension  = { "build",                 false },
)]
fn pipeline_document_cases(path: &str, expected: bool) {
    assert_eq!(is_pipeline_document(Path::new(path)), expected);
}

#[test]
fn job_name_is_file_stem() {
    let source =
        PipelineSource::from_document(Path::new("/src/demo.groovy"), "println 'hi'".into()).unwrap();
    assert_eq!(source.job_name, "demo");
    assert_eq!(source.path.as_deref(), Some(Path::new("/src/demo.groovy")));
}

#[test]
fn wrong_document_type_is_rejected() {
    let err = PipelineSource::from_document(Path::new("notes.txt"), "x".into()).unwrap_err();
    assert_eq!(err, SourceError::WrongDocumentType(PathBuf::from("notes.txt")));
}

#[yare::parameterized(
    empty      = { "" },
    whitespace = { "  \n\t" },
)]
fn empty_source_is_rejected(script: &str) {
    let err = PipelineSource::from_document(Path::new("a.groovy"), script.into()).unwrap_err();
    assert_eq!(err, SourceError::Empty);
}

#[test]
fn text_source_has_no_path() {
    let source = PipelineSource::from_text("adhoc", "node {}".into()).unwrap();
    assert!(source.path.is_none());
}

#[test]
fn job_name_override() {
    let source = PipelineSource::from_text("a", "node {}".into())
        .unwrap()
        .with_job_name("team/b")
        .unwrap();
    assert_eq!(source.job_name, "team/b");
    assert_eq!(
        PipelineSource::from_text("a", "node {}".into()).unwrap().with_job_name(" "),
        Err(SourceError::EmptyJobName)
    );
}
