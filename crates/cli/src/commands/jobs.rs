// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jack jobs` - List jobs on the server

use super::{CommandStatus, Context};
use clap::Args;
use jack_core::JobFilter;

#[derive(Args, Debug)]
pub struct JobsArgs {
    /// Only list pipeline jobs
    #[arg(long)]
    pub pipelines: bool,
}

pub async fn list(ctx: &Context, args: &JobsArgs) -> CommandStatus {
    let filter = if args.pipelines { JobFilter::Pipelines } else { JobFilter::All };
    ctx.workbench(ctx.settings.clone()).list_jobs(filter, &mut std::io::stdout()).await
}
