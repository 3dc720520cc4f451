use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use crate::error::TuneError;
use crate::metrics::{GENERATION_FAILURES, VALIDATION_FAILURES};
use crate::models::GenerationJob;
use crate::service::TuneService;

// Background worker -> runs queued generations one at a time
pub async fn generation_worker(mut rx: mpsc::Receiver<GenerationJob>, service: Arc<TuneService>) {
    info!("Generation worker started - processing requests sequentially");

    while let Some(job) = rx.recv().await {
        let req = &job.request;
        info!(
            prompt_chars = req.prompt.chars().count(),
            max_length = req.max_length,
            top_p = req.top_p,
            temperature = req.temperature,
            "Generating tune"
        );

        let result = service.generate(req).await;
        match &result {
            Ok(tune) => info!(raw_chars = tune.raw_text.chars().count(), "Tune generated"),
            Err(TuneError::Validation(msg)) => {
                VALIDATION_FAILURES.inc();
                info!(reason = %msg, "Submission rejected");
            }
            Err(TuneError::Generation(msg)) => {
                GENERATION_FAILURES.inc();
                warn!(error = %msg, "Generation failed");
            }
        }

        // handler may have gone away (client disconnected)
        let _ = job.response_tx.send(result);
    }
    info!("Generation queue closed, worker exiting");
}
