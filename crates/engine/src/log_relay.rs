// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Console log relay.

use futures_util::StreamExt;
use jack_adapters::{JenkinsAdapter, JenkinsError};
use jack_core::BuildHandle;
use std::io::Write;
use thiserror::Error;

/// Errors that end a relay
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Jenkins(#[from] JenkinsError),
    #[error("failed to write build output: {0}")]
    Sink(#[from] std::io::Error),
}

/// Destination of relayed console text.
pub trait LogSink: Send {
    fn write_chunk(&mut self, chunk: &str) -> std::io::Result<()>;
}

impl<W: Write + Send> LogSink for W {
    fn write_chunk(&mut self, chunk: &str) -> std::io::Result<()> {
        self.write_all(chunk.as_bytes())?;
        self.flush()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelaySummary {
    pub chunks: usize,
    pub bytes: usize,
}

/// Forward the console output of `build` to `sink`, in order, until the
/// log ends. A transport failure ends the relay; nothing is retried.
pub async fn relay<J, S>(jenkins: &J, build: &BuildHandle, sink: &mut S) -> Result<RelaySummary, RelayError>
where
    J: JenkinsAdapter,
    S: LogSink + ?Sized,
{
    let mut stream = jenkins.stream_log(&build.job, build.number);
    let mut summary = RelaySummary::default();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        sink.write_chunk(&chunk)?;
        summary.chunks += 1;
        summary.bytes += chunk.len();
    }

    tracing::debug!(job = %build.job, build = build.number, bytes = summary.bytes, "log relay finished");
    Ok(summary)
}

#[cfg(test)]
#[path = "log_relay_tests.rs"]
mod tests;
