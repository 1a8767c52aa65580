// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build parameter negotiation.
//!
//! Reconciles the parameters a job declares with the override file kept next
//! to the pipeline source. On the first build the file is seeded from the
//! remote defaults and handed to the user; the build waits until the editor
//! is closed.

use jack_adapters::{FileStore, FileStoreError, UiAdapter, UiError};
use jack_core::params::{defaults, overlay};
use jack_core::{params_path, ParamResolution, ParameterDefinition, PipelineSettings};
use std::path::Path;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors from parameter negotiation
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("this job takes parameters; run it from a pipeline file so they can be stored")]
    NoSourcePath,
    #[error(transparent)]
    Store(#[from] FileStoreError),
    #[error(transparent)]
    Ui(#[from] UiError),
    #[error("cancelled while waiting for the parameters file")]
    Cancelled,
}

pub struct ParameterNegotiator<F, U> {
    files: F,
    ui: U,
}

impl<F: FileStore, U: UiAdapter> ParameterNegotiator<F, U> {
    pub fn new(files: F, ui: U) -> Self {
        Self { files, ui }
    }

    /// Resolve the parameters of one build.
    ///
    /// `defs` is `None` when the job declares no parameters; nothing is read
    /// or written in that case.
    pub async fn resolve(
        &self,
        defs: Option<&[ParameterDefinition]>,
        source_path: Option<&Path>,
        settings: &PipelineSettings,
        cancel: &CancellationToken,
    ) -> Result<ParamResolution, ParamsError> {
        let Some(defs) = defs else {
            return Ok(ParamResolution::NotApplicable);
        };
        if !settings.params_enabled {
            return Ok(ParamResolution::Empty);
        }

        let mut candidate = defaults(defs);
        let path = source_path.and_then(params_path).ok_or(ParamsError::NoSourcePath)?;

        let existing = self.files.exists(&path).await;
        if existing {
            let overrides = self.files.read_json(&path).await?;
            let dropped = overlay(&mut candidate, overrides);
            if !dropped.is_empty() {
                tracing::info!(path = %path.display(), ?dropped, "dropping undeclared parameters");
            }
        }
        self.files.write_json(&path, &candidate).await?;

        if existing {
            return Ok(ParamResolution::Resolved(candidate));
        }

        tracing::info!(path = %path.display(), "waiting for first-run parameter edits");
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ParamsError::Cancelled),
            result = self.ui.edit_document(&path) => result?,
        }

        let edited = self.files.read_json(&path).await?;
        let dropped = overlay(&mut candidate, edited.clone());
        if !dropped.is_empty() {
            tracing::info!(path = %path.display(), ?dropped, "ignoring undeclared parameters");
        }
        // The file always holds exactly what the build is triggered with.
        if candidate != edited {
            self.files.write_json(&path, &candidate).await?;
        }
        Ok(ParamResolution::Resolved(candidate))
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
