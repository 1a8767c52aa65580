// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jack execute`, `jack update` and `jack abort`

use super::{CommandStatus, Context};
use anyhow::{anyhow, Result};
use clap::Args;
use jack_core::source::job_name_for;
use jack_core::PipelineSource;
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;

/// Where the pipeline script comes from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Pipeline document (*.groovy or Jenkinsfile), or `-` to read stdin
    pub source: PathBuf,

    /// Job to run the pipeline as (default: the document's base name)
    #[arg(long)]
    pub job: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Trigger without build parameters even if the job declares them
    #[arg(long)]
    pub no_params: bool,
}

#[derive(Args, Debug)]
pub struct AbortArgs {
    /// Pipeline document whose job should be aborted
    pub source: Option<PathBuf>,

    /// Job to abort
    #[arg(long, conflicts_with = "source")]
    pub job: Option<String>,
}

fn reads_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read and validate the pipeline document named by `args`.
pub async fn load_source(args: &SourceArgs) -> Result<PipelineSource> {
    let source = if reads_stdin(&args.source) {
        let job = args
            .job
            .as_deref()
            .ok_or_else(|| anyhow!("--job is required when the pipeline is read from stdin"))?;
        let mut script = String::new();
        tokio::io::stdin()
            .read_to_string(&mut script)
            .await
            .map_err(|e| anyhow!("failed to read stdin: {e}"))?;
        PipelineSource::from_text(job, script)?
    } else {
        let script = tokio::fs::read_to_string(&args.source)
            .await
            .map_err(|e| anyhow!("failed to read {}: {e}", args.source.display()))?;
        let source = PipelineSource::from_document(&args.source, script)?;
        match &args.job {
            Some(job) => source.with_job_name(job.as_str())?,
            None => source,
        }
    };
    tracing::debug!(job = %source.job_name, bytes = source.script.len(), "loaded pipeline source");
    Ok(source)
}

pub async fn execute(ctx: &Context, args: &SourceArgs) -> CommandStatus {
    let bench = ctx.workbench(settings_for(ctx, args));
    let source = match load_source(args).await {
        Ok(source) => source,
        Err(e) => return bench.report_failure("Execute pipeline", &e),
    };
    bench.execute(&source, &mut std::io::stdout(), &ctx.cancel).await
}

pub async fn update(ctx: &Context, args: &SourceArgs) -> CommandStatus {
    let bench = ctx.workbench(settings_for(ctx, args));
    let source = match load_source(args).await {
        Ok(source) => source,
        Err(e) => return bench.report_failure("Update pipeline", &e),
    };
    bench.update(&source, &ctx.cancel).await
}

pub async fn abort(ctx: &Context, args: &AbortArgs) -> CommandStatus {
    let bench = ctx.workbench(ctx.settings.clone());
    let job = match (&args.job, &args.source) {
        (Some(job), _) => Some(job.clone()),
        (None, Some(path)) => job_name_for(path),
        (None, None) => None,
    };
    match job {
        Some(job) => bench.abort_latest(&job).await,
        None => bench.report_failure("Abort", &"name a pipeline document or pass --job"),
    }
}

fn settings_for(ctx: &Context, args: &SourceArgs) -> jack_core::Settings {
    let mut settings = ctx.settings.clone();
    if args.no_params {
        settings.pipeline.params_enabled = false;
    }
    settings
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
