use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

// The two outcomes a generation can fail with
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuneError {
    // rejected before the model is called
    #[error("validation error: {0}")]
    Validation(String),

    // anything raised while encoding, generating or decoding
    #[error("generation error: {0}")]
    Generation(String),
}

// Errors the HTTP layer can answer with
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tune(#[from] TuneError),

    #[error("Rate limit exceeded. Try again later.")]
    RateLimited,

    #[error("generation queue unavailable: {0}")]
    Unavailable(String),

    #[error("page render failed: {0}")]
    Render(#[from] minijinja::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Tune(TuneError::Validation(_)) => StatusCode::BAD_REQUEST,
            ApiError::Tune(TuneError::Generation(_)) => StatusCode::BAD_GATEWAY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
