// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs

use crate::prelude::*;

#[test]
fn jack_no_args_shows_usage_and_exits_zero() {
    cli().passes().stdout_has("Usage:");
}

#[test]
fn jack_help_lists_commands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("execute")
        .stdout_has("update")
        .stdout_has("abort")
        .stdout_has("shared-lib")
        .stdout_has("build-log")
        .stdout_has("jobs");
}

#[test]
fn execute_help_shows_source_options() {
    cli()
        .args(&["execute", "--help"])
        .passes()
        .stdout_has("--job")
        .stdout_has("--yes")
        .stdout_has("--no-params");
}

#[test]
fn jack_version_shows_version() {
    cli().args(&["--version"]).passes().stdout_has(env!("CARGO_PKG_VERSION"));
}
