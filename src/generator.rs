use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};
use crate::load_balancer::LoadBalancer;
use crate::models::SamplingCall;

// The pretrained text-conditioned sequence generator
#[async_trait]
pub trait SequenceGenerator: Send + Sync {
    // Run one sampling pass and return the generated token ids
    async fn generate(&self, call: &SamplingCall) -> Result<Vec<u32>, String>;
}

// Backend request body
#[derive(Serialize)]
struct BackendRequest<'a> {
    model: &'a str,
    #[serde(flatten)]
    call: &'a SamplingCall,
}

// Backend response body
#[derive(Deserialize)]
struct BackendResponse {
    sequences: Vec<Vec<u32>>,
}

// Generator served by one or more model backends over HTTP
pub struct RemoteGenerator {
    client: reqwest::Client,
    load_balancer: Arc<LoadBalancer>,
    model: String,
}

impl RemoteGenerator {
    pub fn new(client: reqwest::Client, load_balancer: Arc<LoadBalancer>, model: String) -> Self {
        Self {
            client,
            load_balancer,
            model,
        }
    }
}

#[async_trait]
impl SequenceGenerator for RemoteGenerator {
    async fn generate(&self, call: &SamplingCall) -> Result<Vec<u32>, String> {
        let backend = self
            .load_balancer
            .get_backend()
            .ok_or_else(|| "No healthy backends available".to_string())?;
        debug!(backend = %backend.url, "Using backend");

        let body = BackendRequest {
            model: &self.model,
            call,
        };
        let res = match self
            .client
            .post(format!("{}/generate", backend.url))
            .json(&body)
            .send()
            .await
        {
            Ok(res) => res,
            // Marking backend as unhealthy on transport errors
            Err(e) => {
                self.load_balancer.mark_unhealthy(&backend);
                warn!(backend = %backend.url, "Backend failed, marked unhealthy");
                return Err(format!("Request failed: {e}"));
            }
        };

        let status = res.status();
        if !status.is_success() {
            let detail = res.text().await.unwrap_or_default();
            return Err(format!("Backend returned {status}: {detail}"));
        }

        let parsed = res
            .json::<BackendResponse>()
            .await
            .map_err(|e| format!("Parse Error: {e}"))?;

        parsed
            .sequences
            .into_iter()
            .next()
            .ok_or_else(|| "Backend returned no sequences".to_string())
    }
}
