// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User interaction adapter.
//!
//! Prompts suspend the caller; notifications are fire-and-forget.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Errors from user interaction
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UiError {
    #[error("terminal i/o failed: {0}")]
    Io(String),
    #[error("editor {editor} failed: {message}")]
    Editor { editor: String, message: String },
}

/// One choice offered by [`UiAdapter::quick_pick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    pub label: String,
    pub detail: Option<String>,
}

impl PickItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into(), detail: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Adapter for the user-facing surface
#[async_trait]
pub trait UiAdapter: Clone + Send + Sync + 'static {
    /// Let the user choose one item. `Ok(None)` when dismissed.
    async fn quick_pick(&self, title: &str, items: &[PickItem]) -> Result<Option<usize>, UiError>;

    /// Ask before doing `action`. `Ok(false)` when declined.
    async fn confirm(&self, message: &str, action: &str) -> Result<bool, UiError>;

    /// Open `path` for editing; resolves once the user closes it.
    async fn edit_document(&self, path: &Path) -> Result<(), UiError>;

    /// Advance the current progress report by `increment` percent.
    fn report_progress(&self, increment: u32, message: &str);

    fn show_info(&self, message: &str);

    fn show_warning(&self, message: &str);

    /// Render a titled document.
    fn show_inline(&self, title: &str, content: &str);

    fn open_link(&self, url: &str);
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{PickItem, UiAdapter, UiError};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Recorded interaction
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum UiEvent {
        Pick { title: String, labels: Vec<String> },
        Confirm { message: String, action: String },
        Edit(PathBuf),
        Progress { increment: u32, message: String },
        Info(String),
        Warning(String),
        Inline { title: String, content: String },
        Link(String),
    }

    type EditHook = Arc<dyn Fn(&Path) + Send + Sync>;

    struct FakeUiState {
        events: Vec<UiEvent>,
        picks: VecDeque<Option<usize>>,
        confirm_answer: bool,
        edit_gate: Option<Arc<Notify>>,
        edit_hook: Option<EditHook>,
    }

    /// Scripted UI for testing
    #[derive(Clone)]
    pub struct FakeUi {
        inner: Arc<Mutex<FakeUiState>>,
    }

    impl Default for FakeUi {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeUiState {
                    events: Vec::new(),
                    picks: VecDeque::new(),
                    confirm_answer: true,
                    edit_gate: None,
                    edit_hook: None,
                })),
            }
        }
    }

    impl FakeUi {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue the answer to the next quick pick. Unscripted picks are dismissed.
        pub fn push_pick(&self, choice: Option<usize>) {
            self.inner.lock().picks.push_back(choice);
        }

        pub fn answer_confirm(&self, answer: bool) {
            self.inner.lock().confirm_answer = answer;
        }

        /// Keep edited documents open until the returned gate is notified.
        pub fn hold_editor(&self) -> Arc<Notify> {
            let gate = Arc::new(Notify::new());
            self.inner.lock().edit_gate = Some(Arc::clone(&gate));
            gate
        }

        /// Run `hook` when a document is opened, as the user's edits.
        pub fn on_edit(&self, hook: impl Fn(&Path) + Send + Sync + 'static) {
            self.inner.lock().edit_hook = Some(Arc::new(hook));
        }

        /// Get all recorded interactions
        pub fn events(&self) -> Vec<UiEvent> {
            self.inner.lock().events.clone()
        }

        pub fn warnings(&self) -> Vec<String> {
            self.collect(|e| match e {
                UiEvent::Warning(m) => Some(m.clone()),
                _ => None,
            })
        }

        pub fn infos(&self) -> Vec<String> {
            self.collect(|e| match e {
                UiEvent::Info(m) => Some(m.clone()),
                _ => None,
            })
        }

        /// Progress messages, in order
        pub fn progress(&self) -> Vec<String> {
            self.collect(|e| match e {
                UiEvent::Progress { message, .. } => Some(message.clone()),
                _ => None,
            })
        }

        pub fn edited(&self) -> Vec<PathBuf> {
            self.collect(|e| match e {
                UiEvent::Edit(p) => Some(p.clone()),
                _ => None,
            })
        }

        fn collect<T>(&self, f: impl Fn(&UiEvent) -> Option<T>) -> Vec<T> {
            self.inner.lock().events.iter().filter_map(f).collect()
        }

        fn push(&self, event: UiEvent) {
            self.inner.lock().events.push(event);
        }
    }

    #[async_trait]
    impl UiAdapter for FakeUi {
        async fn quick_pick(&self, title: &str, items: &[PickItem]) -> Result<Option<usize>, UiError> {
            let mut state = self.inner.lock();
            state.events.push(UiEvent::Pick {
                title: title.to_string(),
                labels: items.iter().map(|i| i.label.clone()).collect(),
            });
            Ok(state.picks.pop_front().flatten().filter(|i| *i < items.len()))
        }

        async fn confirm(&self, message: &str, action: &str) -> Result<bool, UiError> {
            let mut state = self.inner.lock();
            state
                .events
                .push(UiEvent::Confirm { message: message.to_string(), action: action.to_string() });
            Ok(state.confirm_answer)
        }

        async fn edit_document(&self, path: &Path) -> Result<(), UiError> {
            let (hook, gate) = {
                let mut state = self.inner.lock();
                state.events.push(UiEvent::Edit(path.to_path_buf()));
                (state.edit_hook.clone(), state.edit_gate.clone())
            };
            if let Some(hook) = hook {
                hook(path);
            }
            if let Some(gate) = gate {
                gate.notified().await;
            }
            Ok(())
        }

        fn report_progress(&self, increment: u32, message: &str) {
            self.push(UiEvent::Progress { increment, message: message.to_string() });
        }

        fn show_info(&self, message: &str) {
            self.push(UiEvent::Info(message.to_string()));
        }

        fn show_warning(&self, message: &str) {
            self.push(UiEvent::Warning(message.to_string()));
        }

        fn show_inline(&self, title: &str, content: &str) {
            self.push(UiEvent::Inline { title: title.to_string(), content: content.to_string() });
        }

        fn open_link(&self, url: &str) {
            self.push(UiEvent::Link(url.to_string()));
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeUi, UiEvent};
