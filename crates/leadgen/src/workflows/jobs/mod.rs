//! Background pipeline jobs tracked in process memory.
//!
//! Records live only as long as the process. Each job runs its domains
//! sequentially on a spawned task; one stage-level failure ends the job.

pub mod domain;
pub mod router;

pub use domain::{
    JobId, JobRecord, JobStatus, PipelineAccepted, PipelineRequest, DEFAULT_MAX_LEADS_PER_DOMAIN,
};
pub use router::pipeline_router;

use crate::workflows::pipeline::{DomainOutcome, LeadPipeline, RunOptions};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("At least one domain is required.")]
    NoDomains,
    #[error("Job ID not found.")]
    NotFound,
}

/// Shared map of job records.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    records: Arc<Mutex<HashMap<JobId, JobRecord>>>,
}

impl JobRegistry {
    fn records(&self) -> MutexGuard<'_, HashMap<JobId, JobRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create(&self) -> JobRecord {
        let record = JobRecord::queued(JobId::new(), Utc::now());
        self.records()
            .insert(record.job_id.clone(), record.clone());
        record
    }

    pub fn get(&self, job_id: &JobId) -> Option<JobRecord> {
        self.records().get(job_id).cloned()
    }

    /// Apply `change` to a record in place.
    pub fn update<F>(&self, job_id: &JobId, change: F) -> Result<JobRecord, JobError>
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut records = self.records();
        let record = records.get_mut(job_id).ok_or(JobError::NotFound)?;
        change(record);
        Ok(record.clone())
    }

    /// Jobs currently executing. Queued jobs are not counted.
    pub fn active_count(&self) -> usize {
        self.records()
            .values()
            .filter(|record| record.status == JobStatus::Running)
            .count()
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// A submitted job. Awaiting `task` waits for the job to finish.
#[derive(Debug)]
pub struct JobHandle {
    pub job_id: JobId,
    pub started_at: DateTime<Utc>,
    pub task: JoinHandle<()>,
}

#[derive(Clone)]
pub struct JobRunner {
    registry: JobRegistry,
    pipeline: Arc<LeadPipeline>,
}

impl JobRunner {
    pub fn new(registry: JobRegistry, pipeline: Arc<LeadPipeline>) -> Self {
        Self { registry, pipeline }
    }

    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    pub fn submit(&self, request: PipelineRequest) -> Result<JobHandle, JobError> {
        let domains: Vec<String> = request
            .domains
            .iter()
            .map(|domain| domain.trim().to_string())
            .filter(|domain| !domain.is_empty())
            .collect();
        if domains.is_empty() {
            return Err(JobError::NoDomains);
        }

        let record = self.registry.create();
        let job_id = record.job_id.clone();
        info!(job_id = %job_id, domains = domains.len(), "pipeline job queued");

        let options = RunOptions {
            max_leads_per_domain: Some(request.max_leads_per_domain),
        };
        let task = tokio::spawn(run_job(
            self.registry.clone(),
            self.pipeline.clone(),
            job_id.clone(),
            domains,
            options,
        ));

        Ok(JobHandle {
            job_id,
            started_at: record.started_at,
            task,
        })
    }
}

async fn run_job(
    registry: JobRegistry,
    pipeline: Arc<LeadPipeline>,
    job_id: JobId,
    domains: Vec<String>,
    options: RunOptions,
) {
    track(&registry, &job_id, |record| record.status = JobStatus::Running);
    let mut qualified_total = 0;

    for domain in &domains {
        info!(job_id = %job_id, domain = %domain, "processing domain");
        match pipeline.run_domain(domain, &options).await {
            Ok(outcome) => {
                qualified_total += outcome.leads_qualified;
                track(&registry, &job_id, |record| record_progress(record, outcome));
            }
            Err(err) => {
                error!(job_id = %job_id, domain = %domain, error = %err, "pipeline job failed");
                track(&registry, &job_id, |record| {
                    record.status = JobStatus::Failed;
                    record.error = Some(err.to_string());
                    record.completed_at = Some(Utc::now());
                });
                return;
            }
        }
    }

    track(&registry, &job_id, |record| {
        record.status = JobStatus::Completed;
        record.completed_at = Some(Utc::now());
    });
    info!(job_id = %job_id, qualified = qualified_total, "pipeline job completed");
}

/// Apply `change` to a tracked job, logging when the record has gone missing.
fn track<F>(registry: &JobRegistry, job_id: &JobId, change: F) -> Option<JobRecord>
where
    F: FnOnce(&mut JobRecord),
{
    match registry.update(job_id, change) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!(job_id = %job_id, error = %err, "job record update skipped");
            None
        }
    }
}

fn record_progress(record: &mut JobRecord, outcome: DomainOutcome) {
    record.domains_processed += 1;
    record.leads_discovered += outcome.leads_discovered;
    record.leads_qualified += outcome.leads_qualified;
}
