// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod build_log;
pub mod jobs;
pub mod pipeline;
pub mod shared_lib;

use crate::terminal_ui::TerminalUi;
use jack_adapters::{HttpJenkins, LocalFileStore};
use jack_core::Settings;
use jack_engine::Workbench;
use tokio_util::sync::CancellationToken;

pub use jack_engine::CommandStatus;

pub type TerminalWorkbench = Workbench<HttpJenkins, LocalFileStore, TerminalUi>;

/// Everything a command needs to talk to the server and the user.
pub struct Context {
    pub settings: Settings,
    pub jenkins: HttpJenkins,
    pub ui: TerminalUi,
    /// Cancelled on Ctrl-C.
    pub cancel: CancellationToken,
}

impl Context {
    pub fn workbench(&self, settings: Settings) -> TerminalWorkbench {
        Workbench::new(self.jenkins.clone(), LocalFileStore::new(), self.ui.clone(), settings)
    }
}
