// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `jack shared-lib` - Browse the shared library reference

use super::{CommandStatus, Context};
use clap::Args;

#[derive(Args, Debug)]
pub struct SharedLibArgs {
    /// Scope the reference to this job (default: server-wide)
    #[arg(long)]
    pub job: Option<String>,

    /// Print the documentation instead of a link to it
    #[arg(long)]
    pub inline: bool,
}

pub async fn browse(ctx: &Context, args: &SharedLibArgs) -> CommandStatus {
    let mut settings = ctx.settings.clone();
    settings.shared_library.inline |= args.inline;
    ctx.workbench(settings).browse_shared_library(args.job.as_deref()).await
}
