// This is the entry point of the DocBridge service.
//
// **Architecture Overview:**
// - `core/` = Document transformation logic (platform-agnostic)
// - `infra/` = Google REST clients implementing the core ports
// - `http/` = HTTP-specific adapters (routing, validation, CORS)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Start the HTTP server

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "http/http_layer.rs"]
mod http;
#[path = "infra/infra_layer.rs"]
mod infra;

use std::sync::Arc;

use crate::core::docs::doc_service::DocPublishService;
use crate::core::sheets::sheet_service::SheetComposeService;
use crate::core::slides::deck_service::SlideDeckService;
use crate::http::handlers::AppState;
use crate::http::server::{self, AppConfig};
use crate::infra::google::{
    DriveFilesClient, GoogleDocsClient, GoogleSheetsClient, GoogleSlidesClient,
};

fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt::init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    // The runtime drives every outbound Google call; the HTTP workers
    // block on it per request.
    let runtime = tokio::runtime::Runtime::new()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // Create our services with their dependencies.
    // This is the "composition root" where we wire everything together.

    // One reqwest client is shared by every Google surface.
    let http_client = reqwest::Client::new();
    let drive = DriveFilesClient::new(http_client.clone());

    let docs = DocPublishService::new(GoogleDocsClient::new(http_client.clone(), drive.clone()));
    let sheets = SheetComposeService::new(GoogleSheetsClient::new(
        http_client.clone(),
        drive.clone(),
    ));
    let slides = SlideDeckService::new(GoogleSlidesClient::new(http_client, drive));

    let state = Arc::new(AppState {
        docs,
        sheets,
        slides,
    });

    server::serve(&config, state, runtime.handle().clone())
}
