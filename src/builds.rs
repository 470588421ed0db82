//! Pipeline and build records, the build data source boundary, pipeline search.

use std::borrow::Cow;
use std::fmt;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::{self, Field, Ranked, Searchable};

/// Pipeline search fields: name dominates slug, slug dominates description.
pub const PIPELINE_FIELDS: &[Field] = &[
    Field::new("name", 3.0),
    Field::new("slug", 2.0),
    Field::new("description", 1.0),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pipeline {
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
}

impl Searchable for Pipeline {
    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        match key {
            "name" => Some(Cow::Borrowed(&self.name)),
            "slug" => Some(Cow::Borrowed(&self.slug)),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

/// Ranked pipelines for `query`; a blank query matches nothing.
pub fn search_pipelines<'a>(pipelines: &'a [Pipeline], query: &str) -> Vec<Ranked<'a, Pipeline>> {
    search::search(pipelines, query, PIPELINE_FIELDS)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Passed,
    Failed,
    Running,
    Scheduled,
    Canceled,
    #[default]
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    /// Map a Buildkite build state; states without a counterpart are `Unknown`.
    pub fn from_state(state: &str) -> Self {
        match state {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "running" => Self::Running,
            "scheduled" => Self::Scheduled,
            "canceled" | "cancelled" => Self::Canceled,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Running => "running",
            Self::Scheduled => "scheduled",
            Self::Canceled => "canceled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    pub id: String,
    pub number: u64,
    pub status: BuildStatus,
    #[serde(default)]
    pub branch: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub web_url: Option<String>,
}

/// Whole seconds between start and finish, when both are known and ordered.
pub fn duration_between(
    started: Option<DateTime<Utc>>,
    finished: Option<DateTime<Utc>>,
) -> Option<u64> {
    let secs = (finished? - started?).num_seconds();
    u64::try_from(secs).ok()
}

/// `1h 02m`, `3m 05s`, `42s`.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h {m:02}m")
    } else if m > 0 {
        format!("{m}m {s:02}s")
    } else {
        format!("{s}s")
    }
}

/// Source of already-parsed pipeline and build records.
pub trait BuildSource: Send + Sync {
    fn pipelines(&self) -> Result<Vec<Pipeline>>;
    fn recent_builds(&self, pipeline: &str, limit: usize) -> Result<Vec<Build>>;
    fn create_build(&self, pipeline: &str, branch: &str) -> Result<Build>;
    /// Browser URL for a pipeline page.
    fn pipeline_url(&self, pipeline: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn pipeline(slug: &str, name: &str, description: Option<&str>) -> Pipeline {
        Pipeline {
            id: format!("id-{slug}"),
            slug: slug.into(),
            name: name.into(),
            description: description.map(Into::into),
            web_url: None,
        }
    }

    #[test]
    fn pipeline_search_prefers_name_over_description() {
        let pipelines = vec![
            pipeline("docs", "Docs", Some("deploys the backend docs")),
            pipeline("backend-api", "Backend", None),
        ];
        let hits = search_pipelines(&pipelines, "backend");
        assert_eq!(hits[0].item.slug, "backend-api");
        assert_eq!(hits.len(), 2);
        assert!(search_pipelines(&pipelines, " ").is_empty());
    }

    #[test]
    fn status_from_state_and_serde() {
        assert_eq!(BuildStatus::from_state("passed"), BuildStatus::Passed);
        assert_eq!(BuildStatus::from_state("blocked"), BuildStatus::Unknown);
        let parsed: BuildStatus = serde_json::from_str("\"not_run\"").unwrap();
        assert_eq!(parsed, BuildStatus::Unknown);
        assert_eq!(serde_json::to_string(&BuildStatus::Canceled).unwrap(), "\"canceled\"");
    }

    #[test]
    fn durations() {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 5, 1, 10, 3, 5).unwrap();
        assert_eq!(duration_between(Some(start), Some(end)), Some(185));
        assert_eq!(duration_between(Some(end), Some(start)), None);
        assert_eq!(duration_between(None, Some(end)), None);
        assert_eq!(format_duration(185), "3m 05s");
        assert_eq!(format_duration(3720), "1h 02m");
        assert_eq!(format_duration(7), "7s");
    }
}
