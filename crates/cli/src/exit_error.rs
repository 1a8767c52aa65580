// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error that carries a process exit code.
//!
//! Commands return `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination. An empty
//! message means the failure was already reported.

use crate::commands::CommandStatus;
use std::fmt;

/// Exit code for a command interrupted with Ctrl-C.
pub const INTERRUPTED: i32 = 130;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }

    /// Exit for a command status whose outcome the UI already reported.
    pub fn from_status(status: CommandStatus) -> Option<Self> {
        match status {
            CommandStatus::Completed | CommandStatus::Declined => None,
            CommandStatus::Cancelled => Some(Self::new(INTERRUPTED, "")),
            CommandStatus::Failed => Some(Self::new(1, "")),
        }
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}

#[cfg(test)]
#[path = "exit_error_tests.rs"]
mod tests;
