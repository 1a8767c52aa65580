// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build parameter definitions, override sets and resolution results.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Parameter name → value, as stored in `<stem>.params.json`.
pub type ParamMap = BTreeMap<String, Value>;

/// Suffix of the override file colocated with a pipeline source.
pub const PARAMS_FILE_SUFFIX: &str = ".params.json";

/// A parameter declared by a remote job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    pub name: String,
    #[serde(default)]
    pub default_value: Value,
}

impl ParameterDefinition {
    pub fn new(name: impl Into<String>, default_value: impl Into<Value>) -> Self {
        Self { name: name.into(), default_value: default_value.into() }
    }
}

/// Outcome of negotiating the parameters for one build.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamResolution {
    /// The job declares no parameters; trigger without a parameters argument.
    NotApplicable,
    /// Parameter handling is disabled; trigger with an empty parameter set.
    Empty,
    Resolved(ParamMap),
}

impl ParamResolution {
    /// Form fields for the trigger request. `None` omits the parameters
    /// argument entirely.
    pub fn to_build_parameters(&self) -> Option<Vec<(String, String)>> {
        match self {
            ParamResolution::NotApplicable => None,
            ParamResolution::Empty => Some(Vec::new()),
            ParamResolution::Resolved(map) => {
                Some(map.iter().map(|(k, v)| (k.clone(), param_value_string(v))).collect())
            }
        }
    }
}

/// Path of the override file for a pipeline source: `<dir>/<stem>.params.json`.
pub fn params_path(source: &Path) -> Option<PathBuf> {
    let stem = source.file_stem()?.to_str()?;
    let file_name = format!("{}{}", stem, PARAMS_FILE_SUFFIX);
    Some(match source.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    })
}

/// Mapping of every declared parameter to its remote default.
pub fn defaults(defs: &[ParameterDefinition]) -> ParamMap {
    defs.iter().map(|d| (d.name.clone(), d.default_value.clone())).collect()
}

/// Overlay `overrides` onto `candidate`. Override values win; keys that are
/// not declared in `candidate` are dropped and returned.
pub fn overlay(candidate: &mut ParamMap, overrides: ParamMap) -> Vec<String> {
    let mut dropped = Vec::new();
    for (key, value) in overrides {
        match candidate.get_mut(&key) {
            Some(slot) => *slot = value,
            None => dropped.push(key),
        }
    }
    dropped
}

/// Render a parameter value as a form field.
pub fn param_value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
