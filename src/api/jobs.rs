//! Commits and jobs
//!
//! Pushing staged configuration to devices is asynchronous on the server: a
//! commit returns a job id and the job is then polled for completion.

use super::client::{object_path, operations_path, ApiClient};
use crate::error::{Result, ScmError};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

/// Interval between job status polls while waiting on a synchronous commit
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Outcome of a commit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResult {
    #[serde(default)]
    pub success: bool,
    pub job_id: String,
    #[serde(default)]
    pub message: String,
    /// Final job state, present when the commit was waited on
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobStatus>,
}

/// Status of a single job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    pub id: String,
    /// `ACT`, `PEND` or `FIN`
    #[serde(default)]
    pub status_str: String,
    /// `OK`, `FAIL`, `PEND`, ...
    #[serde(default)]
    pub result_str: String,
    #[serde(default)]
    pub type_str: String,
    #[serde(default)]
    pub percent: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub start_ts: Option<String>,
    #[serde(default)]
    pub end_ts: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobStatus {
    /// True once the job has stopped running
    pub fn is_finished(&self) -> bool {
        self.status_str == "FIN"
    }

    /// True when the job finished and reported success
    pub fn succeeded(&self) -> bool {
        self.is_finished() && self.result_str == "OK"
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_ts.as_deref().and_then(parse_timestamp)
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.end_ts.as_deref().and_then(parse_timestamp)
    }
}

/// Parse job timestamps, which come as RFC 3339 or `YYYY-MM-DD HH:MM:SS` (UTC)
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// One page of the job list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub data: Vec<JobStatus>,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

/// Commit and job operations
#[derive(Clone)]
pub struct JobService {
    api: ApiClient,
    poll_interval: Duration,
}

impl JobService {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Push the candidate configuration of `folders`.
    ///
    /// With `sync`, waits up to `timeout` seconds for the job to finish and
    /// returns the final job state in [`CommitResult::job`].
    pub async fn commit(
        &self,
        folders: &[String],
        description: &str,
        sync: bool,
        timeout: u64,
    ) -> Result<CommitResult> {
        if folders.is_empty() {
            return Err(ScmError::InvalidObject(
                "commit requires at least one folder".to_string(),
            ));
        }

        let body = json!({
            "folders": folders,
            "description": description,
        });

        tracing::info!("Committing folders {:?}: {}", folders, description);

        let response = self
            .api
            .post(&operations_path("config-versions/candidate:push"), body)
            .await?;
        let mut result: CommitResult = serde_json::from_value(response)?;

        tracing::info!("Commit job {} submitted", result.job_id);

        if sync {
            let job = self.wait_for_job(&result.job_id, timeout).await?;
            result.success = job.succeeded();
            result.job = Some(job);
        }

        Ok(result)
    }

    /// Get the status of a job
    pub async fn get_job_status(&self, job_id: &str) -> Result<JobStatus> {
        if job_id.is_empty() {
            return Err(ScmError::MissingQueryParameter("job_id".to_string()));
        }

        let response = self
            .api
            .get(&object_path(&operations_path("jobs"), job_id), &[])
            .await?;

        // The API wraps the single job in a `data` array
        let job = match response.get("data").and_then(|v| v.as_array()) {
            Some(arr) => arr.first().cloned().ok_or_else(|| {
                ScmError::ObjectNotPresent(format!("job {}", job_id))
            })?,
            None => response,
        };

        Ok(serde_json::from_value(job)?)
    }

    /// List the most recent jobs
    pub async fn list_jobs(&self, limit: usize) -> Result<JobList> {
        if limit == 0 {
            return Err(ScmError::InvalidObject("limit must be positive".to_string()));
        }

        let response = self
            .api
            .get(&operations_path("jobs"), &[("limit", limit.to_string())])
            .await?;

        Ok(serde_json::from_value(response)?)
    }

    /// Poll a job until it finishes or `timeout` seconds elapse
    pub async fn wait_for_job(&self, job_id: &str, timeout: u64) -> Result<JobStatus> {
        let deadline = Instant::now() + Duration::from_secs(timeout);

        loop {
            let status = self.get_job_status(job_id).await?;
            if status.is_finished() {
                tracing::info!("Job {} finished: {}", job_id, status.result_str);
                return Ok(status);
            }

            tracing::debug!(
                "Job {} is {} ({}%)",
                job_id,
                status.status_str,
                status.percent
            );

            if Instant::now() + self.poll_interval > deadline {
                return Err(ScmError::Timeout(timeout));
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
