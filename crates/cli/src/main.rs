// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jack: run Jenkins pipelines from the terminal

mod color;
mod commands;
mod env;
mod exit_error;
mod terminal_ui;

use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser, Subcommand};
use commands::build_log::BuildLogArgs;
use commands::jobs::JobsArgs;
use commands::pipeline::{AbortArgs, SourceArgs};
use commands::shared_lib::SharedLibArgs;
use commands::{CommandStatus, Context};
use exit_error::ExitError;
use jack_adapters::HttpJenkins;
use jack_core::Settings;
use std::path::PathBuf;
use std::process::ExitCode;
use terminal_ui::TerminalUi;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*};

#[derive(Parser)]
#[command(name = "jack", version = env::VERSION, about = "Run Jenkins pipelines from the terminal", styles = color::styles())]
struct Cli {
    /// Settings file (default: $JACK_CONFIG, else <config dir>/jack/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Jenkins server URL, overriding settings and JACK_URL
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Push a pipeline to its job, build it and stream the console log
    Execute(SourceArgs),
    /// Push a pipeline to its job without building
    Update(SourceArgs),
    /// Abort the newest build of a pipeline's job
    Abort(AbortArgs),
    /// Browse the shared library steps and global variables
    SharedLib(SharedLibArgs),
    /// Download the console log of a build
    BuildLog(BuildLogArgs),
    /// List jobs on the server
    Jobs(JobsArgs),
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env::log_filter())
        .init();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let result = runtime.block_on(run());
    // A prompt abandoned on Ctrl-C still blocks on stdin.
    runtime.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<ExitError>() {
            Some(exit) => {
                if !exit.message.is_empty() {
                    eprintln!("error: {}", exit.message);
                }
                ExitCode::from(u8::try_from(exit.code).unwrap_or(1))
            }
            None => {
                eprintln!("error: {e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let settings = load_settings(cli.config, cli.url)?;
    let base = settings.jenkins.base_url()?;
    let jenkins = HttpJenkins::new(base, &settings.jenkins)?;
    let auto_confirm = matches!(&command, Commands::Execute(a) | Commands::Update(a) if a.yes);

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupted");
            on_interrupt.cancel();
        }
    });

    let ui = TerminalUi::new(auto_confirm, cancel.clone());
    let ctx = Context { settings, jenkins, ui, cancel };
    let status = match &command {
        Commands::Execute(args) => commands::pipeline::execute(&ctx, args).await,
        Commands::Update(args) => commands::pipeline::update(&ctx, args).await,
        Commands::Abort(args) => commands::pipeline::abort(&ctx, args).await,
        Commands::SharedLib(args) => commands::shared_lib::browse(&ctx, args).await,
        Commands::BuildLog(args) => commands::build_log::download(&ctx, args).await,
        Commands::Jobs(args) => commands::jobs::list(&ctx, args).await,
    };

    // Ctrl-C at a prompt dismisses it; report that as an interruption.
    let status = match status {
        CommandStatus::Declined if ctx.cancel.is_cancelled() => CommandStatus::Cancelled,
        status => status,
    };
    match ExitError::from_status(status) {
        Some(exit) => Err(exit.into()),
        None => Ok(()),
    }
}

/// Settings file, then environment, then `--url`.
fn load_settings(config: Option<PathBuf>, url: Option<String>) -> Result<Settings> {
    let mut settings = match config.or_else(env::config_path) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading settings");
            Settings::load(&path).with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Settings::default(),
    }
    .with_env(env::lookup);
    if let Some(url) = url {
        settings.jenkins.url = Some(url);
    }
    Ok(settings)
}
