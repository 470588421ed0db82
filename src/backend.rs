//! HTTP client for the Buildkite REST API (pipelines, builds).

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::builds::{duration_between, Build, BuildSource, BuildStatus, Pipeline};
use crate::config::BuildkiteConfig;

const PIPELINES_PER_PAGE: usize = 100;
const WEB_BASE: &str = "https://buildkite.com";

/// Pipeline entry from GET /v2/organizations/{org}/pipelines.
#[derive(Debug, Deserialize)]
struct PipelineResponse {
    id: String,
    slug: String,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    web_url: Option<String>,
}

impl From<PipelineResponse> for Pipeline {
    fn from(p: PipelineResponse) -> Self {
        Self {
            id: p.id,
            slug: p.slug,
            name: p.name,
            description: p.description.filter(|d| !d.trim().is_empty()),
            web_url: p.web_url,
        }
    }
}

/// Build entry from GET .../pipelines/{slug}/builds.
#[derive(Debug, Deserialize)]
struct BuildResponse {
    id: String,
    number: u64,
    state: String,
    #[serde(default)]
    branch: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    web_url: Option<String>,
}

impl From<BuildResponse> for Build {
    fn from(b: BuildResponse) -> Self {
        Self {
            id: b.id,
            number: b.number,
            status: BuildStatus::from_state(&b.state),
            branch: b.branch,
            message: b.message.map(|m| m.lines().next().unwrap_or_default().to_string()),
            duration_secs: duration_between(b.started_at, b.finished_at),
            created_at: b.created_at,
            started_at: b.started_at,
            finished_at: b.finished_at,
            web_url: b.web_url,
        }
    }
}

pub struct BuildkiteClient {
    base_url: String,
    org: String,
    token: String,
    client: reqwest::blocking::Client,
}

impl BuildkiteClient {
    pub fn new(config: &BuildkiteConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .user_agent(concat!("bk-palette/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            base_url: config.api_url.trim_end_matches('/').to_string(),
            org: config.org.clone(),
            token: config.token.clone(),
            client,
        })
    }

    fn org_url(&self, path: &str) -> String {
        format!("{}/v2/organizations/{}/{}", self.base_url, self.org, path)
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        if !resp.status().is_success() {
            bail!("HTTP {}: {}", resp.status(), resp.text().unwrap_or_default());
        }
        Ok(resp)
    }
}

impl BuildSource for BuildkiteClient {
    fn pipelines(&self) -> Result<Vec<Pipeline>> {
        let url = self.org_url("pipelines");
        debug!(%url, "fetching pipelines");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("per_page", PIPELINES_PER_PAGE)])
            .send()
            .context("requesting pipelines")?;
        let pipelines: Vec<PipelineResponse> =
            Self::check(resp)?.json().context("decoding pipelines")?;
        Ok(pipelines.into_iter().map(Pipeline::from).collect())
    }

    fn recent_builds(&self, pipeline: &str, limit: usize) -> Result<Vec<Build>> {
        let url = self.org_url(&format!("pipelines/{pipeline}/builds"));
        debug!(%url, limit, "fetching builds");
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("per_page", limit)])
            .send()
            .with_context(|| format!("requesting builds for {pipeline}"))?;
        let builds: Vec<BuildResponse> = Self::check(resp)?.json().context("decoding builds")?;
        Ok(builds.into_iter().map(Build::from).collect())
    }

    fn create_build(&self, pipeline: &str, branch: &str) -> Result<Build> {
        let url = self.org_url(&format!("pipelines/{pipeline}/builds"));
        let body = serde_json::json!({
            "commit": "HEAD",
            "branch": branch,
            "message": format!("Triggered from bk-palette on {branch}"),
        });
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .with_context(|| format!("creating build for {pipeline}"))?;
        let build: BuildResponse = Self::check(resp)?.json().context("decoding created build")?;
        Ok(build.into())
    }

    fn pipeline_url(&self, pipeline: &str) -> String {
        format!("{WEB_BASE}/{}/{pipeline}", self.org)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_response_maps_state_duration_and_message() {
        let json = r#"{
            "id": "b-1",
            "number": 42,
            "state": "passed",
            "branch": "main",
            "message": "Fix flaky test\n\nlong body",
            "created_at": "2024-05-01T09:59:00Z",
            "started_at": "2024-05-01T10:00:00Z",
            "finished_at": "2024-05-01T10:01:30Z"
        }"#;
        let build: Build = serde_json::from_str::<BuildResponse>(json).unwrap().into();
        assert_eq!(build.number, 42);
        assert_eq!(build.status, BuildStatus::Passed);
        assert_eq!(build.duration_secs, Some(90));
        assert_eq!(build.message.as_deref(), Some("Fix flaky test"));
    }

    #[test]
    fn running_build_has_no_duration() {
        let json = r#"{"id":"b-2","number":43,"state":"running",
            "started_at":"2024-05-01T10:00:00Z"}"#;
        let build: Build = serde_json::from_str::<BuildResponse>(json).unwrap().into();
        assert_eq!(build.status, BuildStatus::Running);
        assert_eq!(build.duration_secs, None);
    }

    #[test]
    fn blank_pipeline_description_is_dropped() {
        let json = r#"{"id":"p","slug":"web","name":"Web","description":" "}"#;
        let p: Pipeline = serde_json::from_str::<PipelineResponse>(json).unwrap().into();
        assert_eq!(p.description, None);
    }
}
