use async_trait::async_trait;
use leadgen::config::{AppConfig, IcpConfig};
use leadgen::error::AppError;
use leadgen::providers::{ApolloClient, HunterClient, OpenAiClient, SupabaseLeadStore};
use leadgen::workflows::export::{ExportLayer, LeadQuery, LeadRecord, LeadStore, StoreError};
use leadgen::workflows::jobs::JobRegistry;
use leadgen::workflows::outreach::OutreachAgent;
use leadgen::workflows::pipeline::LeadPipeline;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) store: Arc<dyn LeadStore>,
    pub(crate) jobs: JobRegistry,
    pub(crate) icp: Arc<IcpConfig>,
}

/// Process-local lead store used when no hosted store is configured.
#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadStore {
    records: Arc<Mutex<HashMap<String, LeadRecord>>>,
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn upsert(&self, record: LeadRecord) -> Result<(), StoreError> {
        let mut guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(record.contact_email.clone(), record);
        Ok(())
    }

    async fn list(&self, query: LeadQuery) -> Result<Vec<LeadRecord>, StoreError> {
        let guard = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records: Vec<LeadRecord> = guard
            .values()
            .filter(|record| {
                query
                    .min_score
                    .map_or(true, |min| record.qualification_score >= min)
            })
            .cloned()
            .collect();
        records.sort_by(|left, right| {
            right
                .qualification_score
                .cmp(&left.qualification_score)
                .then_with(|| left.contact_email.cmp(&right.contact_email))
        });
        records.truncate(query.limit);
        Ok(records)
    }
}

pub(crate) fn lead_store(config: &AppConfig) -> Result<Arc<dyn LeadStore>, AppError> {
    match &config.store {
        Some(store) => Ok(Arc::new(SupabaseLeadStore::new(&store.url, &store.key)?)),
        None => {
            warn!("SUPABASE_URL/SUPABASE_KEY not set, leads are kept in memory");
            Ok(Arc::new(InMemoryLeadStore::default()))
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PipelineStages {
    pub(crate) skip_outreach: bool,
    pub(crate) skip_export: bool,
}

/// Wire the provider clients into a pipeline. Credentials are checked here.
pub(crate) fn build_pipeline(
    config: &AppConfig,
    icp: Arc<IcpConfig>,
    store: Arc<dyn LeadStore>,
    stages: PipelineStages,
) -> Result<LeadPipeline, AppError> {
    let hunter = Arc::new(HunterClient::new(config.providers.hunter()?)?);
    let apollo = Arc::new(ApolloClient::new(config.providers.apollo()?)?);

    let mut pipeline = LeadPipeline::new(hunter.clone(), apollo, hunter, icp);

    if !stages.skip_outreach {
        let openai = OpenAiClient::new(config.providers.openai()?)?;
        pipeline = pipeline.with_outreach(OutreachAgent::new(Arc::new(openai)));
    }
    if !stages.skip_export {
        pipeline = pipeline.with_export(ExportLayer::new(config.export_dir.clone(), store));
    }

    Ok(pipeline)
}
