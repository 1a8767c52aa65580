// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared library step/variable reference parsing.
//!
//! Jenkins renders the global variable reference at
//! `pipeline-syntax/globals` as a definition list: one `<dt id="name">` per
//! step or variable, followed by a `<dd>` with its HTML documentation.

use crate::job::endpoint;
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

// Allow expect here as the regexes are compile-time verified to be valid
#[allow(clippy::expect_used)]
static ENTRY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<dt\s+id\s*=\s*["']([^"']+)["'][^>]*>(.*?)</dt>"#)
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("constant regex pattern is valid"));

#[allow(clippy::expect_used)]
static BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</p>|</div>|</dt>|</dd>|</pre>|<p>|<pre>")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static BLANK_RUN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("constant regex pattern is valid"));

/// One documented step or global variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedLibEntry {
    /// Text of the `<dt>`, or its id when the text is empty.
    pub label: String,
    /// The `<dt>` id; deep links point here.
    pub anchor: String,
    pub doc_html: String,
}

impl SharedLibEntry {
    /// Documentation as terminal text.
    pub fn doc_text(&self) -> String {
        html_to_text(&self.doc_html)
    }
}

/// Parse the entries of a globals reference page, in document order.
pub fn parse_globals(html: &str) -> Vec<SharedLibEntry> {
    let matches: Vec<_> = ENTRY_PATTERN.captures_iter(html).collect();
    let mut entries = Vec::with_capacity(matches.len());

    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let body_end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(html.len());
        let body = &html[whole.end()..body_end];

        let title = caps.get(2).map(|m| html_to_text(m.as_str())).unwrap_or_default();
        let anchor = id.as_str().to_string();
        let label = if title.is_empty() { anchor.clone() } else { title };

        entries.push(SharedLibEntry { label, anchor, doc_html: definition_body(body).to_string() });
    }

    entries
}

/// Trim a `<dd>…</dd>` section down to its contents.
fn definition_body(body: &str) -> &str {
    let body = body.trim_start();
    let body = body.strip_prefix("<dd>").unwrap_or(body);
    match body.rfind("</dd>") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Strip markup down to readable text.
pub fn html_to_text(html: &str) -> String {
    let with_breaks = BREAK_PATTERN.replace_all(html, "\n");
    let with_bullets = with_breaks.replace("<li>", "\n- ");
    let stripped = TAG_PATTERN.replace_all(&with_bullets, "");
    let decoded = decode_entities(&stripped);
    let lines: Vec<&str> = decoded.lines().map(str::trim_end).collect();
    BLANK_RUN_PATTERN.replace_all(lines.join("\n").trim(), "\n\n").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Link to an entry's anchor on the server, scoped to `job` when one is known.
pub fn globals_link(base: &Url, job: Option<&str>, anchor: &str) -> Url {
    let mut url = endpoint(base, job, &["pipeline-syntax", "globals"]);
    url.set_fragment(Some(anchor));
    url
}

#[cfg(test)]
#[path = "shared_lib_tests.rs"]
mod tests;
