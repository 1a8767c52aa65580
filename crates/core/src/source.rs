// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline source documents.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Document preconditions checked before any remote call
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("pipeline source is empty")]
    Empty,
    #[error("{} is not a pipeline document (expected *.groovy or Jenkinsfile)", .0.display())]
    WrongDocumentType(PathBuf),
    #[error("cannot derive a job name from {}", .0.display())]
    NoJobName(PathBuf),
    #[error("job name must not be empty")]
    EmptyJobName,
}

/// The script to run and the job it runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSource {
    pub job_name: String,
    pub script: String,
    /// Location of the document; `None` for text without a backing file.
    pub path: Option<PathBuf>,
}

impl PipelineSource {
    /// Build a source from a document on disk. The job name is the file stem.
    pub fn from_document(path: &Path, script: String) -> Result<Self, SourceError> {
        if !is_pipeline_document(path) {
            return Err(SourceError::WrongDocumentType(path.to_path_buf()));
        }
        let job_name = job_name_for(path).ok_or_else(|| SourceError::NoJobName(path.to_path_buf()))?;
        Self::validated(job_name, script, Some(path.to_path_buf()))
    }

    /// Build a source from text that has no backing file.
    pub fn from_text(job_name: impl Into<String>, script: String) -> Result<Self, SourceError> {
        Self::validated(job_name.into(), script, None)
    }

    /// Run the source under a different job name.
    pub fn with_job_name(mut self, job_name: impl Into<String>) -> Result<Self, SourceError> {
        let job_name = job_name.into();
        if job_name.trim().is_empty() {
            return Err(SourceError::EmptyJobName);
        }
        self.job_name = job_name;
        Ok(self)
    }

    fn validated(job_name: String, script: String, path: Option<PathBuf>) -> Result<Self, SourceError> {
        if job_name.trim().is_empty() {
            return Err(SourceError::EmptyJobName);
        }
        if script.trim().is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(Self { job_name, script, path })
    }
}

/// `*.groovy`, `*.jenkinsfile` and `Jenkinsfile*` documents hold pipelines.
pub fn is_pipeline_document(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("groovy") || e.eq_ignore_ascii_case("jenkinsfile"));
    let is_jenkinsfile = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with("Jenkinsfile"));
    has_extension || is_jenkinsfile
}

/// Job name derived from a document: its base name without extension.
pub fn job_name_for(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?.trim();
    (!stem.is_empty()).then(|| stem.to_string())
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
