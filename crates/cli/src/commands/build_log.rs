// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jack build-log` - Download the console log of a finished build

use super::{CommandStatus, Context};
use clap::Args;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BuildLogArgs {
    /// Job to pick a build from (default: choose interactively)
    #[arg(long)]
    pub job: Option<String>,

    /// Write the log to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub async fn download(ctx: &Context, args: &BuildLogArgs) -> CommandStatus {
    let bench = ctx.workbench(ctx.settings.clone());
    let mut log = Vec::new();
    let status = bench.download_build_log(args.job.as_deref(), &mut log).await;
    if status != CommandStatus::Completed || log.is_empty() {
        return status;
    }

    match &args.output {
        Some(path) => match tokio::fs::write(path, &log).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), bytes = log.len(), "saved build log");
                CommandStatus::Completed
            }
            Err(e) => bench.report_failure(&format!("Save to {}", path.display()), &e),
        },
        None => {
            let mut stdout = std::io::stdout();
            match stdout.write_all(&log).and_then(|()| stdout.flush()) {
                Ok(()) => CommandStatus::Completed,
                Err(e) => bench.report_failure("Write build log", &e),
            }
        }
    }
}
