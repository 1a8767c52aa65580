// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jack-engine: Pipeline orchestration, parameter negotiation and commands

pub mod commands;
pub mod log_relay;
pub mod orchestrator;
pub mod params;
pub mod shared_lib;

pub use commands::{CommandStatus, Workbench};
pub use log_relay::{relay, LogSink, RelayError, RelaySummary};
pub use orchestrator::{Orchestrator, OrchestratorError, Outcome, StartedBuild};
pub use params::{ParameterNegotiator, ParamsError};
pub use shared_lib::{Presentation, SharedLibraryBrowser};
