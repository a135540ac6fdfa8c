// The accept loop. tiny_http hands out requests from a shared listener;
// a fixed pool of worker threads pulls from it and drives the async
// handlers to completion on the shared tokio runtime. Each request is
// handled sequentially end-to-end; concurrency comes from the pool.

use std::sync::Arc;

use anyhow::Context;

use super::handlers::AppState;
use super::router;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKERS: usize = 8;
/// 10 MB of JSON.
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Runtime configuration, resolved once at startup. No process-wide
/// mutable state exists beyond this value and the shared services.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: String,
    pub port: u16,
    pub workers: usize,
    pub max_body_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let workers = std::env::var("HTTP_WORKERS")
            .ok()
            .and_then(|value| value.parse().ok())
            .filter(|&workers| workers > 0)
            .unwrap_or(DEFAULT_WORKERS);
        let max_body_bytes = std::env::var("MAX_BODY_BYTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);
        Self {
            bind_address,
            port,
            workers,
            max_body_bytes,
        }
    }
}

/// Binds the listener and serves until the process dies.
pub fn serve(
    config: &AppConfig,
    state: Arc<AppState>,
    runtime: tokio::runtime::Handle,
) -> anyhow::Result<()> {
    let address = format!("{}:{}", config.bind_address, config.port);
    let server = tiny_http::Server::http(&address)
        .map_err(|e| anyhow::anyhow!("failed to bind {address}: {e}"))?;
    let server = Arc::new(server);
    tracing::info!("docbridge listening on {}", address);

    let mut workers = Vec::with_capacity(config.workers);
    for worker_id in 0..config.workers {
        let server = Arc::clone(&server);
        let state = Arc::clone(&state);
        let runtime = runtime.clone();
        let max_body_bytes = config.max_body_bytes;
        let worker = std::thread::Builder::new()
            .name(format!("http-worker-{worker_id}"))
            .spawn(move || loop {
                match server.recv() {
                    Ok(request) => {
                        runtime.block_on(router::dispatch(&state, request, max_body_bytes));
                    }
                    Err(err) => tracing::error!("Accept failed: {}", err),
                }
            })
            .context("failed to spawn HTTP worker")?;
        workers.push(worker);
    }

    for worker in workers {
        let _ = worker.join();
    }
    Ok(())
}
