use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{JobId, JobStatus, PipelineAccepted, PipelineRequest};
use super::{JobError, JobRunner};

/// Routes for queuing pipeline runs and polling their progress.
pub fn pipeline_router(runner: Arc<JobRunner>) -> Router {
    Router::new()
        .route("/pipeline/run", post(run_handler))
        .route("/pipeline/status/:job_id", get(status_handler))
        .with_state(runner)
}

pub(crate) async fn run_handler(
    State(runner): State<Arc<JobRunner>>,
    Json(request): Json<PipelineRequest>,
) -> Response {
    let domain_count = request.domains.len();
    match runner.submit(request) {
        Ok(handle) => {
            let accepted = PipelineAccepted {
                job_id: handle.job_id,
                status: JobStatus::Queued,
                message: format!("Pipeline started for {domain_count} domain(s)."),
                started_at: handle.started_at,
            };
            (StatusCode::OK, Json(accepted)).into_response()
        }
        Err(error) => error_response(StatusCode::BAD_REQUEST, &error),
    }
}

pub(crate) async fn status_handler(
    State(runner): State<Arc<JobRunner>>,
    Path(job_id): Path<String>,
) -> Response {
    match runner.registry().get(&JobId(job_id)) {
        Some(record) => (StatusCode::OK, Json(record)).into_response(),
        None => error_response(StatusCode::NOT_FOUND, &JobError::NotFound),
    }
}

fn error_response(status: StatusCode, error: &JobError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
