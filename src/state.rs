use minijinja::Environment;
use tokio::sync::mpsc;
use crate::export::EditorLink;
use crate::models::GenerationJob;
use crate::rate_limit::RateLimiter;
// app's shared state

pub struct AppState {
    pub model: String,
    pub editor: EditorLink,
    pub rate_limiter: RateLimiter,
    pub job_tx: mpsc::Sender<GenerationJob>,
    pub templates: Environment<'static>,
}
