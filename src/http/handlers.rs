// One handler per endpoint. Each parses its DTO, rejects missing fields
// before any outbound call, delegates to a core service and wraps the
// returned link as `{"url": ...}`.

use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use crate::core::docs::doc_service::{DocPublishService, DocumentHost};
use crate::core::sheets::sheet_service::{SheetComposeService, SpreadsheetHost};
use crate::core::slides::deck_service::{PresentationHost, SlideDeckService};
use crate::core::slides::segmenter::SegmentStrategy;
use crate::infra::google::{GoogleDocsClient, GoogleSheetsClient, GoogleSlidesClient};

/// Services shared by every request. Built once in `main`; nothing in it
/// is mutable.
pub struct AppState {
    pub docs: DocPublishService<GoogleDocsClient>,
    pub sheets: SheetComposeService<GoogleSheetsClient>,
    pub slides: SlideDeckService<GoogleSlidesClient>,
}

#[derive(Debug, Deserialize)]
struct UploadDocRequest {
    html_base64: Option<String>,
    access_token: Option<String>,
    file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateSheetRequest {
    access_token: Option<String>,
    html_base64: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreateSlidesRequest {
    access_token: Option<String>,
    html_base64: Option<String>,
    file_name: Option<String>,
}

/// Missing and empty are the same thing to the API.
fn require(field: Option<String>, name: &str) -> Result<String, ApiError> {
    field
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ApiError::missing_field(name))
}

fn optional(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn parse<T: for<'de> Deserialize<'de>>(body: &Value) -> Result<T, ApiError> {
    serde_json::from_value(body.clone())
        .map_err(|e| ApiError::Validation(format!("Invalid request body: {e}")))
}

pub async fn upload_doc<H: DocumentHost>(
    service: &DocPublishService<H>,
    body: &Value,
) -> Result<Value, ApiError> {
    let request: UploadDocRequest = parse(body)?;
    let html_base64 = require(request.html_base64, "html_base64")?;
    let access_token = require(request.access_token, "access_token")?;
    let file_name = require(request.file_name, "file_name")?;

    let url = service.publish(&access_token, &html_base64, &file_name).await?;
    Ok(json!({ "url": url }))
}

pub async fn create_styled_sheet<H: SpreadsheetHost>(
    service: &SheetComposeService<H>,
    body: &Value,
) -> Result<Value, ApiError> {
    let request: CreateSheetRequest = parse(body)?;
    let access_token = require(request.access_token, "access_token")?;
    let html_base64 = require(request.html_base64, "html_base64")?;
    let title = optional(request.title);

    let url = service
        .compose(&access_token, &html_base64, title.as_deref())
        .await?;
    Ok(json!({ "url": url }))
}

pub async fn create_slides<H: PresentationHost>(
    service: &SlideDeckService<H>,
    body: &Value,
    strategy: SegmentStrategy,
) -> Result<Value, ApiError> {
    let request: CreateSlidesRequest = parse(body)?;
    let access_token = require(request.access_token, "access_token")?;
    let html_base64 = require(request.html_base64, "html_base64")?;
    let file_name = optional(request.file_name);

    let url = service
        .generate(&access_token, &html_base64, file_name.as_deref(), strategy)
        .await?;
    Ok(json!({ "url": url }))
}
