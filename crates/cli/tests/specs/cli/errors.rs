// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failures reported before any request reaches a server

use crate::prelude::*;

#[test]
fn missing_server_url_fails() {
    cli().args(&["jobs"]).exits(1).stderr_has("no Jenkins URL configured");
}

#[test]
fn invalid_server_url_fails() {
    cli()
        .args(&["--url", "not a url", "jobs"])
        .exits(1)
        .stderr_has("invalid Jenkins URL");
}

#[test]
fn malformed_settings_fail() {
    let project = Project::empty();
    project.file("config.toml", "[jenkins]\nurl = 3\n");

    project.jack().args(&["jobs"]).exits(1).stderr_has("invalid settings");
}

#[test]
fn wrong_document_type_is_a_warning() {
    let project = Project::empty();
    project.file("notes.txt", "node {}");

    project
        .jack()
        .env("JACK_URL", "http://127.0.0.1:1/")
        .args(&["execute", "notes.txt"])
        .exits(1)
        .stdout_is_empty()
        .stderr_has("warning: Execute pipeline failed:")
        .stderr_has("is not a pipeline document");
}

#[test]
fn empty_document_is_a_warning() {
    let project = Project::empty();
    project.file("ci.groovy", "\n");

    project
        .jack()
        .env("JACK_URL", "http://127.0.0.1:1/")
        .args(&["update", "ci.groovy"])
        .exits(1)
        .stderr_has("pipeline source is empty");
}

#[test]
fn abort_needs_a_job() {
    cli()
        .env("JACK_URL", "http://127.0.0.1:1/")
        .args(&["abort"])
        .exits(1)
        .stderr_has("name a pipeline document or pass --job");
}

#[test]
fn unreachable_server_is_a_warning() {
    cli()
        .env("JACK_URL", "http://127.0.0.1:1/")
        .args(&["jobs"])
        .exits(1)
        .stderr_has("warning: List jobs failed:");
}
