// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline job `config.xml` codec.
//!
//! The document is streamed event by event: only the pipeline script and the
//! quiet period are rewritten, every other event is written back exactly as
//! it was read.

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

/// Root element of a pipeline job configuration.
pub const PIPELINE_ROOT: &str = "flow-definition";

/// Configuration used when creating a job that does not exist yet.
pub const DEFAULT_PIPELINE_CONFIG: &str = r#"<?xml version='1.1' encoding='UTF-8'?>
<flow-definition plugin="workflow-job">
  <actions/>
  <description></description>
  <keepDependencies>false</keepDependencies>
  <properties/>
  <definition class="org.jenkinsci.plugins.workflow.cps.CpsFlowDefinition" plugin="workflow-cps">
    <script></script>
    <sandbox>true</sandbox>
  </definition>
  <triggers/>
  <quietPeriod>0</quietPeriod>
  <disabled>false</disabled>
</flow-definition>
"#;

/// Errors from reading or rewriting a job configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed job config at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("not a pipeline job config: {0}")]
    NotPipeline(String),
    #[error("failed to serialize job config: {0}")]
    Write(String),
}

/// Script and quiet period as currently stored in a config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSummary {
    pub script: Option<String>,
    pub quiet_period: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Slot {
    Definition,
    Script,
    QuietPeriod,
    Other,
}

fn classify(path: &[Vec<u8>], name: &[u8]) -> Slot {
    match (path.len(), name) {
        (1, b"definition") => Slot::Definition,
        (1, b"quietPeriod") => Slot::QuietPeriod,
        (2, b"script") if path[1] == b"definition" => Slot::Script,
        _ => Slot::Other,
    }
}

/// Set the pipeline script of `existing` to `script` and force its quiet
/// period to zero.
///
/// A missing `<script>` is inserted before `</definition>` and a missing
/// `<quietPeriod>` before the root end tag.
pub fn build_or_update_config(existing: &str, script: &str) -> Result<String, ConfigError> {
    let mut reader = Reader::from_str(existing);
    let mut writer = Writer::new(Vec::with_capacity(existing.len() + script.len()));
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;
    let mut seen_definition = false;
    let mut wrote_script = false;
    let mut wrote_quiet_period = false;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;
        match event {
            Event::Start(start) => {
                let name = start.name().as_ref().to_vec();
                check_root(&path, &name, &mut seen_root)?;
                match classify(&path, &name) {
                    Slot::Script => {
                        reader.read_to_end(start.name()).map_err(|e| malformed(&reader, e))?;
                        write_text_element(&mut writer, start, script)?;
                        wrote_script = true;
                        continue;
                    }
                    Slot::QuietPeriod => {
                        reader.read_to_end(start.name()).map_err(|e| malformed(&reader, e))?;
                        write_text_element(&mut writer, start, "0")?;
                        wrote_quiet_period = true;
                        continue;
                    }
                    Slot::Definition => seen_definition = true,
                    Slot::Other => {}
                }
                path.push(name);
                write(&mut writer, Event::Start(start))?;
            }
            Event::Empty(start) => {
                let name = start.name().as_ref().to_vec();
                check_root(&path, &name, &mut seen_root)?;
                match classify(&path, &name) {
                    Slot::Script => {
                        write_text_element(&mut writer, start, script)?;
                        wrote_script = true;
                    }
                    Slot::QuietPeriod => {
                        write_text_element(&mut writer, start, "0")?;
                        wrote_quiet_period = true;
                    }
                    Slot::Definition => {
                        seen_definition = true;
                        write(&mut writer, Event::Start(start.borrow()))?;
                        write_text_element(&mut writer, BytesStart::new("script"), script)?;
                        write(&mut writer, Event::End(start.to_end()))?;
                        wrote_script = true;
                    }
                    Slot::Other if path.is_empty() => {
                        return Err(ConfigError::NotPipeline("missing <definition>".to_string()));
                    }
                    Slot::Other => write(&mut writer, Event::Empty(start))?,
                }
            }
            Event::End(end) => {
                let depth = path.len();
                if depth == 2 && path[1] == b"definition" && !wrote_script {
                    write_text_element(&mut writer, BytesStart::new("script"), script)?;
                    wrote_script = true;
                }
                if depth == 1 {
                    if !seen_definition {
                        return Err(ConfigError::NotPipeline("missing <definition>".to_string()));
                    }
                    if !wrote_quiet_period {
                        write_text_element(&mut writer, BytesStart::new("quietPeriod"), "0")?;
                        wrote_quiet_period = true;
                    }
                }
                path.pop();
                write(&mut writer, Event::End(end))?;
            }
            Event::Eof => break,
            other => write(&mut writer, other)?,
        }
    }

    if let Some(open) = path.last() {
        return Err(ConfigError::Malformed {
            position: reader.buffer_position() as u64,
            message: format!("unexpected end of document inside <{}>", String::from_utf8_lossy(open)),
        });
    }
    if !seen_root {
        return Err(ConfigError::Malformed {
            position: 0,
            message: "document has no root element".to_string(),
        });
    }

    String::from_utf8(writer.into_inner()).map_err(|e| ConfigError::Write(e.to_string()))
}

/// Read back the script and quiet period of a config without modifying it.
pub fn inspect(xml: &str) -> Result<ConfigSummary, ConfigError> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut summary = ConfigSummary::default();

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;
        match event {
            Event::Start(start) => {
                let name = start.name().as_ref().to_vec();
                match classify(&path, &name) {
                    Slot::Script => summary.script = Some(String::new()),
                    Slot::QuietPeriod => summary.quiet_period = Some(String::new()),
                    _ => {}
                }
                path.push(name);
            }
            Event::Empty(start) => match classify(&path, start.name().as_ref()) {
                Slot::Script => summary.script = Some(String::new()),
                Slot::QuietPeriod => summary.quiet_period = Some(String::new()),
                _ => {}
            },
            Event::End(_) => {
                path.pop();
            }
            Event::Text(text) => {
                let unescaped = text.unescape().map_err(|e| malformed(&reader, e))?;
                if let Some(target) = text_target(&mut summary, &path) {
                    target.push_str(&unescaped);
                }
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                if let Some(target) = text_target(&mut summary, &path) {
                    target.push_str(&String::from_utf8_lossy(&raw));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(summary)
}

fn text_target<'a>(summary: &'a mut ConfigSummary, path: &[Vec<u8>]) -> Option<&'a mut String> {
    let (last, parent) = path.split_last()?;
    match classify(parent, last) {
        Slot::Script => summary.script.as_mut(),
        Slot::QuietPeriod => summary.quiet_period.as_mut(),
        _ => None,
    }
}

fn check_root(path: &[Vec<u8>], name: &[u8], seen_root: &mut bool) -> Result<(), ConfigError> {
    if !path.is_empty() {
        return Ok(());
    }
    if *seen_root {
        return Err(ConfigError::Malformed {
            position: 0,
            message: "multiple root elements".to_string(),
        });
    }
    *seen_root = true;
    if name != PIPELINE_ROOT.as_bytes() {
        return Err(ConfigError::NotPipeline(format!(
            "root element is <{}>",
            String::from_utf8_lossy(name)
        )));
    }
    Ok(())
}

fn write_text_element(
    writer: &mut Writer<Vec<u8>>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), ConfigError> {
    let end = start.to_end().into_owned();
    write(writer, Event::Start(start))?;
    if !text.is_empty() {
        write(writer, Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    }
    write(writer, Event::End(end))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ConfigError> {
    writer.write_event(event).map_err(|e| ConfigError::Write(e.to_string()))
}

fn malformed(reader: &Reader<&[u8]>, error: quick_xml::Error) -> ConfigError {
    ConfigError::Malformed {
        position: reader.error_position() as u64,
        message: error.to_string(),
    }
}

#[cfg(test)]
#[path = "job_config_tests.rs"]
mod tests;
