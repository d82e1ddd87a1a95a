use crate::cli::ServeArgs;
use crate::infra::{build_pipeline, lead_store, AppState, PipelineStages};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use leadgen::config::{AppConfig, IcpConfig};
use leadgen::error::AppError;
use leadgen::telemetry;
use leadgen::workflows::jobs::{JobRegistry, JobRunner};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let icp = Arc::new(IcpConfig::load(config.icp_path.as_deref())?);
    let store = lead_store(&config)?;
    let pipeline = build_pipeline(&config, icp.clone(), store.clone(), PipelineStages::default())?;

    let registry = JobRegistry::default();
    let runner = Arc::new(JobRunner::new(registry.clone(), Arc::new(pipeline)));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        store,
        jobs: registry,
        icp,
    };

    let app = with_service_routes(runner)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead generation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
