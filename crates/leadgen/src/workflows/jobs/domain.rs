use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Progress of one background pipeline job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub status: JobStatus,
    pub domains_processed: usize,
    pub leads_discovered: usize,
    pub leads_qualified: usize,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    pub fn queued(job_id: JobId, started_at: DateTime<Utc>) -> Self {
        Self {
            job_id,
            status: JobStatus::Queued,
            domains_processed: 0,
            leads_discovered: 0,
            leads_qualified: 0,
            error: None,
            started_at,
            completed_at: None,
        }
    }
}

/// Body of `POST /pipeline/run`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRequest {
    pub domains: Vec<String>,
    #[serde(default = "default_max_leads_per_domain")]
    pub max_leads_per_domain: usize,
}

pub const DEFAULT_MAX_LEADS_PER_DOMAIN: usize = 5;

fn default_max_leads_per_domain() -> usize {
    DEFAULT_MAX_LEADS_PER_DOMAIN
}

/// Acknowledgement returned when a job is queued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineAccepted {
    pub job_id: JobId,
    pub status: JobStatus,
    pub message: String,
    pub started_at: DateTime<Utc>,
}
