mod codec;
mod config;
mod error;
mod export;
mod generator;
mod handlers;
mod load_balancer;
mod metrics;
mod models;
mod rate_limit;
mod service;
mod state;
mod worker;
#[cfg(test)]
mod testing;

use anyhow::Context;
use clap::Parser; // for cli
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::codec::HfCodec;
use crate::config::Args;
use crate::export::EditorLink;
use crate::generator::RemoteGenerator;
use crate::load_balancer::{LoadBalancer, health_checker};
use crate::models::GenerationJob;
use crate::rate_limit::RateLimiter;
use crate::service::TuneService;
use crate::state::AppState;
use crate::worker::generation_worker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // tokenizer: local file or one-time download from the Hub
    let tokenizer_path = match args.tokenizer.clone() {
        Some(path) => path,
        None => {
            let model = args.model.clone();
            info!(%model, "Fetching tokenizer from the Hugging Face Hub");
            tokio::task::spawn_blocking(move || HfCodec::fetch_tokenizer(&model)).await??
        }
    };
    let codec = Arc::new(HfCodec::from_file(&tokenizer_path, &args.eos_token)?);

    let client = reqwest::Client::new();
    let load_balancer = Arc::new(LoadBalancer::new(&args.backends)?);
    let generator = Arc::new(RemoteGenerator::new(
        client.clone(),
        Arc::clone(&load_balancer),
        args.model.clone(),
    ));
    let service = Arc::new(TuneService::new(codec, generator));

    // spawn the background worker
    let (job_tx, job_rx) = mpsc::channel::<GenerationJob>(args.queue_capacity);
    tokio::spawn(generation_worker(job_rx, service));

    // spawn health checker
    tokio::spawn(health_checker(
        Arc::clone(&load_balancer),
        client,
        Duration::from_secs(args.health_interval),
    ));

    let state = Arc::new(AppState {
        model: args.model.clone(),
        editor: EditorLink::new(&args.editor_url)?,
        rate_limiter: RateLimiter::new(args.rate_limit, Duration::from_secs(args.rate_window)),
        job_tx,
        templates: handlers::templates().context("loading page template")?,
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!("Gateway running on http://localhost:{}", args.port);
    info!(model = %args.model, editor = %args.editor_url, "Serving text-to-music");
    info!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    axum::serve(listener, app).await?;
    Ok(())
}
