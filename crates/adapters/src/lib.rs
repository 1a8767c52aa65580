// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jack-adapters: Collaborators of the pipeline engine (Jenkins, files, UI)

pub mod fs;
pub mod jenkins;
pub mod ui;

pub use fs::{FileStore, FileStoreError, LocalFileStore};
pub use jenkins::{BuildRequest, HttpJenkins, JenkinsAdapter, JenkinsError, LogStream};
pub use ui::{PickItem, UiAdapter, UiError};

#[cfg(any(test, feature = "test-support"))]
pub use fs::{FakeFileStore, FileCall};
#[cfg(any(test, feature = "test-support"))]
pub use jenkins::{FakeJenkins, JenkinsCall};
#[cfg(any(test, feature = "test-support"))]
pub use ui::{FakeUi, UiEvent};
