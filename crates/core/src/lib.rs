// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! jack-core: Core types and codecs for the jack Jenkins pipeline runner

pub mod macros;

pub mod job;
pub mod job_config;
pub mod params;
pub mod settings;
pub mod shared_lib;
pub mod source;

#[cfg(any(test, feature = "test-support"))]
pub use job::JobInfoBuilder;
pub use job::{endpoint, job_url, BuildHandle, JobFilter, JobInfo, JobSummary, WORKFLOW_JOB_CLASS};
pub use job_config::{build_or_update_config, ConfigError, ConfigSummary, DEFAULT_PIPELINE_CONFIG};
pub use params::{params_path, ParamMap, ParamResolution, ParameterDefinition};
pub use settings::{JenkinsSettings, PipelineSettings, Settings, SettingsError, SharedLibrarySettings};
pub use shared_lib::{globals_link, parse_globals, SharedLibEntry};
pub use source::{PipelineSource, SourceError};
