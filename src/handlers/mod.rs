mod health;
mod metrics;
mod generate;
mod page;

use axum::{Router, routing::{get, post}};
use std::sync::Arc;
use crate::state::AppState;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use generate::generate_handler;
pub use page::{index_handler, submit_handler, templates};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(submit_handler))
        .route("/health", get(health_handler))
        .route("/api/generate", post(generate_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}
