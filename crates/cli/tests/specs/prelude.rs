// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fluent helpers over `assert_cmd` for running the `jack` binary in
//! isolation from the user's settings and environment.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch directory with its own (initially absent) settings file.
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self { dir: tempfile::tempdir().unwrap() }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative` and return its full path.
    pub fn file(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn jack(&self) -> Run {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_jack"));
        cmd.current_dir(self.path())
            .env("JACK_CONFIG", self.path().join("config.toml"))
            .env("NO_COLOR", "1")
            .env_remove("JACK_URL")
            .env_remove("JACK_USERNAME")
            .env_remove("JACK_API_TOKEN")
            .env_remove("JACK_LOG");
        Run { cmd, _project: None }
    }
}

/// `jack` with an isolated settings file.
pub fn cli() -> Run {
    let project = Project::empty();
    let mut run = project.jack();
    run._project = Some(project);
    run
}

pub struct Run {
    cmd: Command,
    _project: Option<Project>,
}

impl Run {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    pub fn passes(mut self) -> Output {
        let output = self.cmd.output().unwrap();
        let out = Output::from(output);
        assert_eq!(out.code, Some(0), "expected success\nstdout:\n{}\nstderr:\n{}", out.stdout, out.stderr);
        out
    }

    pub fn exits(mut self, code: i32) -> Output {
        let output = self.cmd.output().unwrap();
        let out = Output::from(output);
        assert_eq!(out.code, Some(code), "unexpected exit\nstdout:\n{}\nstderr:\n{}", out.stdout, out.stderr);
        out
    }
}

pub struct Output {
    code: Option<i32>,
    stdout: String,
    stderr: String,
}

impl From<std::process::Output> for Output {
    fn from(output: std::process::Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

impl Output {
    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(self.stdout.contains(needle), "stdout missing {needle:?}:\n{}", self.stdout);
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(self.stderr.contains(needle), "stderr missing {needle:?}:\n{}", self.stderr);
        self
    }

    pub fn stdout_is_empty(self) -> Self {
        assert!(self.stdout.is_empty(), "expected empty stdout:\n{}", self.stdout);
        self
    }
}
