// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Jenkins REST client.
//!
//! Authenticates with HTTP basic auth (user + API token), which Jenkins
//! exempts from CSRF crumbs.

use super::api::{BuildListJson, JobJson, JobListJson};
use super::{BuildRequest, JenkinsAdapter, JenkinsError, LogStream};
use async_trait::async_trait;
use jack_core::{endpoint, JenkinsSettings, JobFilter, JobInfo, JobSummary};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

/// Longest error body kept in [`JenkinsError::Status`].
const MAX_ERROR_BODY: usize = 200;

#[derive(Clone)]
pub struct HttpJenkins {
    client: reqwest::Client,
    base: Url,
    username: Option<String>,
    api_token: Option<String>,
    readiness_timeout: Duration,
    poll_interval: Duration,
}

struct LogChunk {
    text: String,
    next_start: u64,
    more: bool,
}

impl HttpJenkins {
    pub fn new(base: Url, settings: &JenkinsSettings) -> Result<Self, JenkinsError> {
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .user_agent(concat!("jack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| transport(&base, e))?;
        Ok(Self {
            client,
            base,
            username: settings.username.clone(),
            api_token: settings.api_token.clone(),
            readiness_timeout: settings.readiness_timeout(),
            poll_interval: settings.poll_interval(),
        })
    }

    fn url(&self, job: Option<&str>, tail: &[&str]) -> Url {
        endpoint(&self.base, job, tail)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.username {
            Some(user) => builder.basic_auth(user, self.api_token.as_deref()),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, url: &Url) -> Result<Response, JenkinsError> {
        tracing::debug!(%url, "jenkins request");
        builder.send().await.map_err(|e| transport(url, e))
    }

    async fn send_ok(&self, builder: RequestBuilder, url: &Url) -> Result<Response, JenkinsError> {
        let response = self.send(builder, url).await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response, url).await)
        }
    }

    async fn get_text(&self, url: Url) -> Result<String, JenkinsError> {
        let response = self.send_ok(self.request(Method::GET, url.clone()), &url).await?;
        response.text().await.map_err(|e| transport(&url, e))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, JenkinsError> {
        let body = self.get_text(url.clone()).await?;
        serde_json::from_str(&body)
            .map_err(|e| JenkinsError::Decode { url: url.to_string(), message: e.to_string() })
    }

    async fn post_xml(&self, url: Url, xml: &str) -> Result<(), JenkinsError> {
        let builder = self
            .request(Method::POST, url.clone())
            .header(reqwest::header::CONTENT_TYPE, "application/xml")
            .body(xml.to_string());
        self.send_ok(builder, &url).await?;
        Ok(())
    }

    async fn poll_until_exists(&self, url: &Url) -> Result<(), JenkinsError> {
        loop {
            let response = self.send(self.request(Method::GET, url.clone()), url).await?;
            match response.status() {
                status if status.is_success() => return Ok(()),
                StatusCode::NOT_FOUND => {}
                _ => return Err(status_error(response, url).await),
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn progressive_chunk(&self, url: &Url, start: u64) -> Result<LogChunk, JenkinsError> {
        let mut url = url.clone();
        url.query_pairs_mut().append_pair("start", &start.to_string());
        let response = self.send_ok(self.request(Method::GET, url.clone()), &url).await?;

        let more = header(&response, "x-more-data").is_some_and(|v| v.eq_ignore_ascii_case("true"));
        let size = header(&response, "x-text-size").and_then(|v| v.parse::<u64>().ok());
        let text = response.text().await.map_err(|e| transport(&url, e))?;
        let next_start = size.unwrap_or(start + text.len() as u64);
        Ok(LogChunk { text, next_start, more })
    }
}

#[async_trait]
impl JenkinsAdapter for HttpJenkins {
    fn base_url(&self) -> &Url {
        &self.base
    }

    async fn list_jobs(&self, filter: JobFilter) -> Result<Vec<JobSummary>, JenkinsError> {
        let mut url = self.url(None, &["api", "json"]);
        url.query_pairs_mut().append_pair("tree", "jobs[name,url,_class]");
        let list: JobListJson = self.get_json(url).await?;
        Ok(list.jobs.into_iter().map(JobSummary::from).filter(|j| filter.matches(j)).collect())
    }

    async fn get_job(&self, name: &str) -> Result<Option<JobInfo>, JenkinsError> {
        let url = self.url(Some(name), &["api", "json"]);
        let response = self.send(self.request(Method::GET, url.clone()), &url).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(status_error(response, &url).await);
        }
        let body = response.text().await.map_err(|e| transport(&url, e))?;
        let job: JobJson = serde_json::from_str(&body)
            .map_err(|e| JenkinsError::Decode { url: url.to_string(), message: e.to_string() })?;
        Ok(Some(job.into_job_info(name)))
    }

    async fn get_config(&self, name: &str) -> Result<String, JenkinsError> {
        self.get_text(self.url(Some(name), &["config.xml"])).await
    }

    async fn set_config(&self, name: &str, xml: &str) -> Result<(), JenkinsError> {
        self.post_xml(self.url(Some(name), &["config.xml"]), xml).await
    }

    async fn create_job(&self, name: &str, xml: &str) -> Result<JobInfo, JenkinsError> {
        // Folder jobs are created inside their parent folder
        let (parent, leaf) = match name.rsplit_once('/') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, name),
        };
        let mut url = self.url(parent, &["createItem"]);
        url.query_pairs_mut().append_pair("name", leaf);
        self.post_xml(url, xml).await?;
        tracing::info!(job = name, "created job");

        self.get_job(name).await?.ok_or_else(|| JenkinsError::JobNotFound(name.to_string()))
    }

    async fn trigger_build(&self, request: BuildRequest) -> Result<(), JenkinsError> {
        let url = match request.parameters {
            None => self.url(Some(&request.name), &["build"]),
            Some(_) => self.url(Some(&request.name), &["buildWithParameters"]),
        };
        let mut builder = self.request(Method::POST, url.clone());
        if let Some(parameters) = &request.parameters {
            builder = builder.form(parameters);
        }
        self.send_ok(builder, &url).await?;
        Ok(())
    }

    async fn stop_build(&self, name: &str, number: u32) -> Result<(), JenkinsError> {
        let build = number.to_string();
        let url = self.url(Some(name), &[build.as_str(), "stop"]);
        self.send_ok(self.request(Method::POST, url.clone()), &url).await?;
        Ok(())
    }

    async fn await_ready(&self, name: &str, number: u32) -> Result<(), JenkinsError> {
        let build = number.to_string();
        let url = self.url(Some(name), &[build.as_str(), "api", "json"]);
        match tokio::time::timeout(self.readiness_timeout, self.poll_until_exists(&url)).await {
            Ok(result) => result,
            Err(_) => Err(JenkinsError::NotReady { job: name.to_string(), build: number }),
        }
    }

    fn stream_log(&self, name: &str, number: u32) -> LogStream {
        let this = self.clone();
        let build = number.to_string();
        let url = self.url(Some(name), &[build.as_str(), "logText", "progressiveText"]);

        Box::pin(async_stream::stream! {
            let mut start = 0u64;
            loop {
                match this.progressive_chunk(&url, start).await {
                    Ok(chunk) => {
                        start = chunk.next_start;
                        if !chunk.text.is_empty() {
                            yield Ok(chunk.text);
                        }
                        if !chunk.more {
                            break;
                        }
                    }
                    Err(e) => {
                        yield Err(e);
                        break;
                    }
                }
                tokio::time::sleep(this.poll_interval).await;
            }
        })
    }

    async fn list_build_numbers(&self, job_url: &str) -> Result<Vec<u32>, JenkinsError> {
        let normalized =
            if job_url.ends_with('/') { job_url.to_string() } else { format!("{}/", job_url) };
        let mut url = Url::parse(&normalized)
            .and_then(|u| u.join("api/json"))
            .map_err(|e| JenkinsError::Decode { url: job_url.to_string(), message: e.to_string() })?;
        url.query_pairs_mut().append_pair("tree", "builds[number]");
        let list: BuildListJson = self.get_json(url).await?;
        Ok(list.builds.into_iter().map(|b| b.number).collect())
    }

    async fn console_text(&self, name: &str, number: u32) -> Result<String, JenkinsError> {
        let build = number.to_string();
        self.get_text(self.url(Some(name), &[build.as_str(), "consoleText"])).await
    }

    async fn globals_reference(&self, scope_job: Option<&str>) -> Result<String, JenkinsError> {
        self.get_text(self.url(scope_job, &["pipeline-syntax", "globals"])).await
    }
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response.headers().get(name)?.to_str().ok()
}

fn transport(url: &Url, error: reqwest::Error) -> JenkinsError {
    JenkinsError::Transport { url: url.to_string(), message: error.to_string() }
}

async fn status_error(response: Response, url: &Url) -> JenkinsError {
    let status = response.status().as_u16();
    let mut body = response.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    JenkinsError::Status { url: url.to_string(), status, body: body.trim().to_string() }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
