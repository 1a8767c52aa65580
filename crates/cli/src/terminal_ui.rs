// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Terminal implementation of the UI adapter.
//!
//! Prompts and notifications go to stderr so stdout carries only build
//! output, documentation and links.

use crate::color::{context, header, literal, muted};
use async_trait::async_trait;
use jack_adapters::{PickItem, UiAdapter, UiError};
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
pub struct TerminalUi {
    auto_confirm: bool,
    progress: Arc<AtomicU32>,
    /// Dismisses pending prompts when cancelled.
    cancel: CancellationToken,
}

impl TerminalUi {
    /// With `auto_confirm`, confirmations are answered yes without asking.
    pub fn new(auto_confirm: bool, cancel: CancellationToken) -> Self {
        Self { auto_confirm, progress: Arc::new(AtomicU32::new(0)), cancel }
    }

    /// Print `prompt` and read one line. `None` at end of input or once
    /// cancelled; the blocked reader is left behind.
    async fn ask(&self, prompt: String) -> Result<Option<String>, UiError> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        let read = tokio::task::spawn_blocking(move || -> std::io::Result<Option<String>> {
            let mut stderr = std::io::stderr();
            write!(stderr, "{prompt}")?;
            stderr.flush()?;
            let mut line = String::new();
            let read = std::io::stdin().lock().read_line(&mut line)?;
            Ok((read > 0).then(|| line.trim().to_string()))
        });
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Ok(None),
            answer = read => answer
                .map_err(|e| UiError::Io(e.to_string()))?
                .map_err(|e| UiError::Io(e.to_string())),
        }
    }

    /// Add `increment` to the running percentage and return the new total.
    fn advance(&self, increment: u32) -> u32 {
        let before = self.progress.fetch_add(increment, Ordering::Relaxed);
        before.saturating_add(increment).min(100)
    }
}

/// One-based choice typed by the user, as a zero-based index.
fn parse_choice(answer: &str, len: usize) -> Option<usize> {
    let n: usize = answer.trim().parse().ok()?;
    (1..=len).contains(&n).then(|| n - 1)
}

fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Editor command: $VISUAL, then $EDITOR, then vi.
fn editor_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    ["VISUAL", "EDITOR"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .find(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "vi".to_string())
}

#[async_trait]
impl UiAdapter for TerminalUi {
    async fn quick_pick(&self, title: &str, items: &[PickItem]) -> Result<Option<usize>, UiError> {
        if items.is_empty() {
            return Ok(None);
        }
        let mut menu = format!("{}\n", header(title));
        for (i, item) in items.iter().enumerate() {
            let number = literal(&format!("{:>3})", i + 1));
            match &item.detail {
                Some(detail) => menu.push_str(&format!("{number} {}  {}\n", item.label, muted(detail))),
                None => menu.push_str(&format!("{number} {}\n", item.label)),
            }
        }
        menu.push_str(&format!("Choose 1-{} (empty to cancel): ", items.len()));

        let choice = self.ask(menu).await?.and_then(|answer| parse_choice(&answer, items.len()));
        tracing::debug!(title, ?choice, "quick pick answered");
        Ok(choice)
    }

    async fn confirm(&self, message: &str, action: &str) -> Result<bool, UiError> {
        if self.auto_confirm {
            tracing::debug!(message, "confirmed by --yes");
            return Ok(true);
        }
        let answer = self.ask(format!("{message} [{action}? y/N] ")).await?;
        Ok(answer.is_some_and(|a| parse_yes(&a)))
    }

    async fn edit_document(&self, path: &Path) -> Result<(), UiError> {
        let editor = editor_from(|key| std::env::var(key).ok());
        self.show_info(&format!("Opening {} in {}", path.display(), editor));

        let status = tokio::process::Command::new("sh")
            .arg("-c")
            .arg(format!("{editor} \"$@\""))
            .arg("sh")
            .arg(path)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|e| UiError::Editor { editor: editor.clone(), message: e.to_string() })?;
        if !status.success() {
            return Err(UiError::Editor { editor, message: format!("exited with {status}") });
        }
        Ok(())
    }

    fn report_progress(&self, increment: u32, message: &str) {
        let total = self.advance(increment);
        eprintln!("[{total:>3}%] {}", context(message));
    }

    fn show_info(&self, message: &str) {
        eprintln!("{message}");
    }

    fn show_warning(&self, message: &str) {
        eprintln!("{} {message}", header("warning:"));
    }

    fn show_inline(&self, title: &str, content: &str) {
        println!("{}\n\n{}", header(title), content);
    }

    fn open_link(&self, url: &str) {
        println!("{}", literal(url));
    }
}

#[cfg(test)]
#[path = "terminal_ui_tests.rs"]
mod tests;
