use axum::{Json, extract::State};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use crate::error::ApiError;
use crate::metrics::{GENERATION_LATENCY, RATE_LIMITED, REQUEST_TOTAL, VALIDATION_FAILURES};
use crate::models::{GenerateResponse, GenerationJob, GenerationRequest, GenerationResult};
use crate::state::AppState;

// Validate, throttle, queue to the worker and wait for its answer
pub(crate) async fn run_generation(
    state: &AppState,
    request: GenerationRequest,
) -> Result<GenerationResult, ApiError> {
    REQUEST_TOTAL.inc();

    // rejected submissions do not use up the quota
    if let Err(e) = request.validate() {
        VALIDATION_FAILURES.inc();
        return Err(e.into());
    }

    if !state.rate_limiter.check("global") {
        RATE_LIMITED.inc();
        return Err(ApiError::RateLimited);
    }

    let start_time = Instant::now();
    let (response_tx, response_rx) = oneshot::channel();

    state
        .job_tx
        .send(GenerationJob {
            request,
            response_tx,
        })
        .await
        .map_err(|_| ApiError::Unavailable("Failed to queue request".to_string()))?;

    let result = response_rx
        .await
        .map_err(|_| ApiError::Unavailable("Worker failed to respond".to_string()))?;

    GENERATION_LATENCY.observe(start_time.elapsed().as_secs_f64());

    Ok(result?)
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let result = run_generation(&state, payload).await?;
    let editor_url = state.editor.to_embeddable_url(&result.normalized_text);

    Ok(Json(GenerateResponse {
        model: state.model.clone(),
        tune: result.normalized_text,
        editor_url: editor_url.into(),
    }))
}
