// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins JSON API payloads.

use jack_core::{JobInfo, JobSummary, ParameterDefinition};
use serde::Deserialize;
use serde_json::Value;

const PARAMETERS_PROPERTY_CLASS: &str = "hudson.model.ParametersDefinitionProperty";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct JobJson {
    #[serde(default)]
    url: String,
    #[serde(default)]
    next_build_number: u32,
    #[serde(default)]
    property: Vec<PropertyJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertyJson {
    #[serde(rename = "_class", default)]
    class: String,
    #[serde(default)]
    parameter_definitions: Vec<ParameterDefinitionJson>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParameterDefinitionJson {
    name: String,
    #[serde(default)]
    default_parameter_value: Option<DefaultValueJson>,
}

#[derive(Debug, Deserialize)]
struct DefaultValueJson {
    #[serde(default)]
    value: Value,
}

impl JobJson {
    /// Convert to a [`JobInfo`] named as it was requested (folder path included).
    pub(super) fn into_job_info(self, name: &str) -> JobInfo {
        let parameters = self
            .property
            .into_iter()
            .find(|p| p.class == PARAMETERS_PROPERTY_CLASS)
            .map(|p| {
                p.parameter_definitions
                    .into_iter()
                    .map(|d| ParameterDefinition {
                        name: d.name,
                        default_value: d.default_parameter_value.map(|v| v.value).unwrap_or_default(),
                    })
                    .collect()
            });
        JobInfo {
            name: name.to_string(),
            url: self.url,
            next_build_number: self.next_build_number,
            parameters,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct JobListJson {
    #[serde(default)]
    pub jobs: Vec<JobRowJson>,
}

#[derive(Debug, Deserialize)]
pub(super) struct JobRowJson {
    name: String,
    #[serde(default)]
    url: String,
    #[serde(rename = "_class", default)]
    class: String,
}

impl From<JobRowJson> for JobSummary {
    fn from(row: JobRowJson) -> Self {
        JobSummary { name: row.name, url: row.url, class: row.class }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BuildListJson {
    #[serde(default)]
    pub builds: Vec<BuildRowJson>,
}

#[derive(Debug, Deserialize)]
pub(super) struct BuildRowJson {
    pub number: u32,
}
