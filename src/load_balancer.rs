use prometheus::Gauge;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::time::{Duration, interval};
use tracing::{info, warn};
use crate::metrics::HEALTHY_BACKENDS;

// Single model backend

pub struct Backend {
    pub url: String,
    healthy: AtomicBool,
}

impl Backend {
    pub fn new(url: String) -> Self {
        Self {
            url,
            healthy: AtomicBool::new(true),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::Relaxed);
    }
}

// Round-robin pool over the model backends

pub struct LoadBalancer {
    backends: Vec<Arc<Backend>>,
    current: AtomicUsize,
    healthy_gauge: Gauge,
}

impl LoadBalancer {
    // Create from comma-separated urls "localhost:8000, localhost:8001"
    pub fn new(backends_str: &str) -> anyhow::Result<Self> {
        Self::with_gauge(backends_str, HEALTHY_BACKENDS.clone())
    }

    // Same, reporting healthy backends through `healthy_gauge`
    pub fn with_gauge(backends_str: &str, healthy_gauge: Gauge) -> anyhow::Result<Self> {
        let backends: Vec<Arc<Backend>> = backends_str
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|url| {
                let full_url = if url.starts_with("http") {
                    url.trim_end_matches('/').to_string()
                } else {
                    format!("http://{}", url.trim_end_matches('/'))
                };
                Arc::new(Backend::new(full_url))
            })
            .collect();
        if backends.is_empty() {
            anyhow::bail!("At least one backend required");
        }

        info!(count = backends.len(), "Load balancer initialized");
        for (i, b) in backends.iter().enumerate() {
            info!("  [{}] {}", i + 1, b.url);
        }
        healthy_gauge.set(backends.len() as f64);

        Ok(Self {
            backends,
            current: AtomicUsize::new(0),
            healthy_gauge,
        })
    }

    // Get next healthy backend (round-robin)
    pub fn get_backend(&self) -> Option<Arc<Backend>> {
        let len = self.backends.len();
        let start = self.current.fetch_add(1, Ordering::Relaxed) % len;

        for i in 0..len {
            let backend = &self.backends[(start + i) % len];
            if backend.is_healthy() {
                return Some(Arc::clone(backend));
            }
        }
        None
    }

    pub fn all_backends(&self) -> &[Arc<Backend>] {
        &self.backends
    }

    pub fn healthy_count(&self) -> usize {
        self.backends.iter().filter(|b| b.is_healthy()).count()
    }

    // Take a backend out of rotation after a failed request
    pub fn mark_unhealthy(&self, backend: &Backend) {
        backend.set_healthy(false);
        self.publish_health();
    }

    pub fn publish_health(&self) {
        self.healthy_gauge.set(self.healthy_count() as f64);
    }

    #[cfg(test)]
    pub fn reported_healthy(&self) -> f64 {
        self.healthy_gauge.get()
    }
}

// Probe every backend once
pub async fn probe_backends(load_balancer: &LoadBalancer, client: &reqwest::Client) {
    for backend in load_balancer.all_backends() {
        let url = format!("{}/health", backend.url);
        let was_healthy = backend.is_healthy();

        let is_healthy = match client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(res) => res.status().is_success(),
            Err(_) => false,
        };
        backend.set_healthy(is_healthy);

        // Log status changes
        if was_healthy != is_healthy {
            if is_healthy {
                info!(backend = %backend.url, "Backend is now healthy");
            } else {
                warn!(backend = %backend.url, "Backend is now unhealthy");
            }
        }
    }
    load_balancer.publish_health();
}

// Health check loop - runs every `check_interval`
pub async fn health_checker(
    load_balancer: Arc<LoadBalancer>,
    client: reqwest::Client,
    check_interval: Duration,
) {
    let mut interval = interval(check_interval);
    info!(?check_interval, "Health checker started");

    loop {
        interval.tick().await;
        probe_backends(&load_balancer, &client).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_added_and_blanks_skipped() {
        let lb = LoadBalancer::new(" gpu-a:8000 , ,https://gpu-b/ ").unwrap();
        let urls: Vec<&str> = lb.all_backends().iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["http://gpu-a:8000", "https://gpu-b"]);
    }

    #[test]
    fn empty_backend_list_is_an_error() {
        assert!(LoadBalancer::new(" , ").is_err());
    }

    #[test]
    fn round_robin_skips_unhealthy_backends() {
        let lb = LoadBalancer::new("a:1,b:2,c:3").unwrap();
        lb.all_backends()[1].set_healthy(false);

        let picked: Vec<String> = (0..4)
            .map(|_| lb.get_backend().unwrap().url.clone())
            .collect();
        assert_eq!(
            picked,
            vec!["http://a:1", "http://c:3", "http://c:3", "http://a:1"]
        );
    }

    #[test]
    fn marking_unhealthy_updates_reported_count() {
        let gauge = Gauge::new("test_healthy_backends", "healthy backends").unwrap();
        let lb = LoadBalancer::with_gauge("a:1,b:2", gauge).unwrap();
        assert_eq!(lb.reported_healthy(), 2.0);

        let backend = lb.get_backend().unwrap();
        lb.mark_unhealthy(&backend);
        assert_eq!(lb.reported_healthy(), 1.0);
        assert_eq!(lb.healthy_count(), 1);
    }

    #[test]
    fn no_backend_when_all_unhealthy() {
        let lb = LoadBalancer::new("a:1").unwrap();
        lb.all_backends()[0].set_healthy(false);
        assert!(lb.get_backend().is_none());
        assert_eq!(lb.healthy_count(), 0);
    }
}
