use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("tune_requests_total", "Total number of generation submissions").unwrap();
    pub static ref VALIDATION_FAILURES: Counter =
        register_counter!("tune_validation_failures_total", "Submissions rejected before generation").unwrap();
    pub static ref GENERATION_FAILURES: Counter =
        register_counter!("tune_generation_failures_total", "Generations the model backend failed").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("tune_rate_limited_total", "Submissions refused by the rate limiter").unwrap();
    pub static ref GENERATION_LATENCY: Histogram = register_histogram!(
        "tune_generation_latency_seconds",
        "Time from queueing a submission to its result",
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0]
    )
    .unwrap();
    pub static ref HEALTHY_BACKENDS: Gauge =
        register_gauge!("tune_healthy_backends", "Model backends currently passing health checks").unwrap();
}
