use crate::infra::AppState;
use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use leadgen::error::AppError;
use leadgen::workflows::export::{LeadQuery, LeadRecord};
use leadgen::workflows::jobs::{pipeline_router, JobRunner};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Upper bound on rows scanned for `/leads/metrics`.
const METRICS_SCAN_LIMIT: usize = 10_000;

#[derive(Debug, Deserialize)]
pub(crate) struct LeadsParams {
    #[serde(default)]
    pub(crate) min_score: Option<u32>,
    #[serde(default = "default_limit")]
    pub(crate) limit: usize,
}

fn default_limit() -> usize {
    LeadQuery::default().limit
}

#[derive(Debug, Serialize)]
pub(crate) struct LeadsResponse {
    pub(crate) total: usize,
    pub(crate) leads: Vec<LeadRecord>,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub(crate) struct LeadMetrics {
    pub(crate) total_leads_in_db: usize,
    pub(crate) qualified_leads: usize,
    pub(crate) qualification_rate: String,
    pub(crate) email_enrichment_rate: String,
    pub(crate) active_jobs: usize,
}

pub(crate) fn with_service_routes(runner: Arc<JobRunner>) -> Router {
    pipeline_router(runner)
        .route("/", get(root))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/leads", get(leads_endpoint))
        .route("/leads/metrics", get(lead_metrics_endpoint))
}

pub(crate) async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "product": "B2B Lead Generation System",
        "version": "1.0.0",
        "status": "operational",
        "docs": "/docs",
    }))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn leads_endpoint(
    Extension(state): Extension<AppState>,
    Query(params): Query<LeadsParams>,
) -> Result<Json<LeadsResponse>, AppError> {
    let leads = state
        .store
        .list(LeadQuery {
            min_score: params.min_score,
            limit: params.limit,
        })
        .await?;

    Ok(Json(LeadsResponse {
        total: leads.len(),
        leads,
    }))
}

pub(crate) async fn lead_metrics_endpoint(
    Extension(state): Extension<AppState>,
) -> Result<Json<LeadMetrics>, AppError> {
    let leads = state
        .store
        .list(LeadQuery {
            min_score: None,
            limit: METRICS_SCAN_LIMIT,
        })
        .await?;

    let threshold = state.icp.min_qualification_score;
    let qualified = leads
        .iter()
        .filter(|lead| lead.qualification_score >= threshold)
        .count();
    let with_email = leads
        .iter()
        .filter(|lead| !lead.contact_email.trim().is_empty())
        .count();

    Ok(Json(LeadMetrics {
        total_leads_in_db: leads.len(),
        qualified_leads: qualified,
        qualification_rate: one_decimal_rate(qualified, leads.len()),
        email_enrichment_rate: one_decimal_rate(with_email, leads.len()),
        active_jobs: state.jobs.active_count(),
    }))
}

fn one_decimal_rate(part: usize, whole: usize) -> String {
    if whole == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", part as f64 / whole as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tests::record;
    use crate::infra::InMemoryLeadStore;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use leadgen::config::IcpConfig;
    use leadgen::providers::ProviderError;
    use leadgen::workflows::discovery::{ContactSource, DomainContacts};
    use leadgen::workflows::enrichment::{CompanyEnricher, CompanyProfile, EmailVerifier};
    use leadgen::workflows::export::LeadStore;
    use leadgen::workflows::jobs::JobRegistry;
    use leadgen::workflows::pipeline::LeadPipeline;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    struct NoContacts;

    #[async_trait]
    impl ContactSource for NoContacts {
        async fn search_domain(&self, _domain: &str) -> Result<DomainContacts, ProviderError> {
            Ok(DomainContacts::default())
        }
    }

    #[async_trait]
    impl CompanyEnricher for NoContacts {
        async fn enrich_company(
            &self,
            _domain: &str,
        ) -> Result<Option<CompanyProfile>, ProviderError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl EmailVerifier for NoContacts {
        async fn verify_email(&self, _email: &str) -> bool {
            false
        }
    }

    fn app(store: InMemoryLeadStore) -> (Router, JobRegistry) {
        let icp = Arc::new(IcpConfig::default());
        let registry = JobRegistry::default();
        let fake = Arc::new(NoContacts);
        let pipeline = LeadPipeline::new(fake.clone(), fake.clone(), fake, icp.clone());
        let runner = Arc::new(JobRunner::new(registry.clone(), Arc::new(pipeline)));

        let state = AppState {
            readiness: Arc::new(AtomicBool::new(true)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            store: Arc::new(store),
            jobs: registry.clone(),
            icp,
        };

        (with_service_routes(runner).layer(Extension(state)), registry)
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn root_reports_product_banner() {
        let (router, _) = app(InMemoryLeadStore::default());
        let (status, body) = get_json(router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["product"], "B2B Lead Generation System");
        assert_eq!(body["status"], "operational");
    }

    #[tokio::test]
    async fn leads_endpoint_filters_by_score() {
        let store = InMemoryLeadStore::default();
        store.upsert(record("jordan@acme.io", 90)).await.expect("upsert");
        store.upsert(record("pat@acme.io", 30)).await.expect("upsert");

        let (router, _) = app(store);
        let (status, body) = get_json(router, "/leads?min_score=60").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["leads"][0]["contact_email"], "jordan@acme.io");
    }

    #[tokio::test]
    async fn lead_metrics_use_icp_threshold() {
        let store = InMemoryLeadStore::default();
        store.upsert(record("jordan@acme.io", 60)).await.expect("upsert");
        store.upsert(record("alex@acme.io", 59)).await.expect("upsert");
        store.upsert(record("pat@acme.io", 10)).await.expect("upsert");

        let (router, _) = app(store);
        let (status, body) = get_json(router, "/leads/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_leads_in_db"], 3);
        assert_eq!(body["qualified_leads"], 1);
        assert_eq!(body["qualification_rate"], "33.3%");
        assert_eq!(body["email_enrichment_rate"], "100.0%");
        assert_eq!(body["active_jobs"], 0);
    }

    #[tokio::test]
    async fn lead_metrics_on_empty_store_report_zero() {
        let (router, _) = app(InMemoryLeadStore::default());
        let (_, body) = get_json(router, "/leads/metrics").await;
        assert_eq!(body["qualification_rate"], "0%");
        assert_eq!(body["email_enrichment_rate"], "0%");
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let (router, registry) = app(InMemoryLeadStore::default());
        let (status, body) = get_json(router, "/pipeline/status/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Job ID not found.");
        assert!(registry.is_empty());
    }
}
