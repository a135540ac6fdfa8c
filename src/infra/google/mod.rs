// =============================================================================
// GOOGLE REST INTEGRATION
// =============================================================================
//
// One client per API surface (Drive, Docs, Sheets, Slides), each exposing
// only the calls the core flows need. The caller's OAuth access token is
// attached per call as a Bearer header; no token is stored, validated or
// refreshed here.

pub mod docs_client;
pub mod drive_client;
pub mod sheets_client;
pub mod slides_client;

pub use docs_client::GoogleDocsClient;
pub use drive_client::DriveFilesClient;
pub use sheets_client::GoogleSheetsClient;
pub use slides_client::GoogleSlidesClient;

/// Folds a failed response into "<status>: <body>" for error messages.
pub(crate) async fn error_text(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.is_empty() => format!("{status}: {body}"),
        _ => status.to_string(),
    }
}
