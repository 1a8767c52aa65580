// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared library reference browser.

use jack_adapters::{JenkinsAdapter, JenkinsError};
use jack_core::{globals_link, parse_globals, SharedLibEntry};
use parking_lot::Mutex;

/// How an entry is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presentation {
    Inline { title: String, text: String },
    Link(String),
}

pub struct SharedLibraryBrowser<J> {
    jenkins: J,
    entries: Mutex<Vec<SharedLibEntry>>,
}

impl<J: JenkinsAdapter> SharedLibraryBrowser<J> {
    pub fn new(jenkins: J) -> Self {
        Self { jenkins, entries: Mutex::new(Vec::new()) }
    }

    /// Fetch the step and variable reference, scoped to `scope_job` when
    /// given. Entries keep document order and replace the last fetched set.
    pub async fn list_entries(&self, scope_job: Option<&str>) -> Result<Vec<SharedLibEntry>, JenkinsError> {
        let html = self.jenkins.globals_reference(scope_job).await?;
        let entries = parse_globals(&html);
        tracing::debug!(scope = ?scope_job, count = entries.len(), "fetched shared library reference");
        *self.entries.lock() = entries.clone();
        Ok(entries)
    }

    /// Entry `index` of the last fetch.
    pub fn entry(&self, index: usize) -> Option<SharedLibEntry> {
        self.entries.lock().get(index).cloned()
    }

    pub fn present(&self, entry: &SharedLibEntry, inline: bool, scope_job: Option<&str>) -> Presentation {
        if inline {
            Presentation::Inline { title: entry.label.clone(), text: entry.doc_text() }
        } else {
            let url = globals_link(self.jenkins.base_url(), scope_job, &entry.anchor);
            Presentation::Link(url.to_string())
        }
    }
}

#[cfg(test)]
#[path = "shared_lib_tests.rs"]
mod tests;
