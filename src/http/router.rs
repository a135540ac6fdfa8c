// Routing and dispatch. The route table is a pure function so it can be
// tested without a socket; dispatch owns body reading, the size cap, CORS
// headers and the request log line.

use std::io::{Cursor, Read};

use serde_json::{json, Value};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use super::error::ApiError;
use super::handlers::{self, AppState};
use crate::core::slides::segmenter::SegmentStrategy;

pub const LIVENESS_MESSAGE: &str = "docbridge is alive";

/// The JSON endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    UploadDoc,
    CreateStyledSheet,
    CreateSlides,
    CreateSlidesShow,
}

/// Where a request goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Liveness,
    Preflight,
    Api(Endpoint),
    NotFound,
}

/// Maps (method, path) onto a route. Query strings are ignored.
pub fn resolve(method: &Method, url: &str) -> Route {
    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => Route::Liveness,
        (Method::Post, "/upload-doc") => Route::Api(Endpoint::UploadDoc),
        (Method::Post, "/create-styled-sheet") => Route::Api(Endpoint::CreateStyledSheet),
        (Method::Post, "/create-slides") => Route::Api(Endpoint::CreateSlides),
        (Method::Post, "/create-slides-show") => Route::Api(Endpoint::CreateSlidesShow),
        (Method::Options, _) => Route::Preflight,
        _ => Route::NotFound,
    }
}

fn standard_headers(content_type: &str) -> Vec<Header> {
    [
        ("Content-Type", content_type),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type, Authorization"),
    ]
    .iter()
    .filter_map(|(name, value)| Header::from_bytes(name.as_bytes(), value.as_bytes()).ok())
    .collect()
}

fn with_headers(
    mut response: Response<Cursor<Vec<u8>>>,
    content_type: &str,
) -> Response<Cursor<Vec<u8>>> {
    for header in standard_headers(content_type) {
        response.add_header(header);
    }
    response
}

fn text_response(status: u16, body: &str) -> Response<Cursor<Vec<u8>>> {
    with_headers(
        Response::from_string(body).with_status_code(StatusCode(status)),
        "text/plain; charset=utf-8",
    )
}

fn json_response(status: u16, body: &Value) -> Response<Cursor<Vec<u8>>> {
    with_headers(
        Response::from_string(body.to_string()).with_status_code(StatusCode(status)),
        "application/json",
    )
}

fn read_body(request: &mut Request, max_bytes: usize) -> Result<Vec<u8>, ApiError> {
    if let Some(length) = request.body_length() {
        if length > max_bytes {
            return Err(ApiError::Validation(format!(
                "Request body exceeds the {max_bytes} byte limit"
            )));
        }
    }

    let mut body = Vec::new();
    let reader = request.as_reader();
    reader
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut body)
        .map_err(|e| ApiError::Downstream(format!("Failed to read request body: {e}")))?;
    if body.len() > max_bytes {
        return Err(ApiError::Validation(format!(
            "Request body exceeds the {max_bytes} byte limit"
        )));
    }
    Ok(body)
}

async fn run_endpoint(
    state: &AppState,
    endpoint: Endpoint,
    request: &mut Request,
    max_body_bytes: usize,
) -> Result<Value, ApiError> {
    let body = read_body(request, max_body_bytes)?;
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::Validation(format!("Invalid JSON body: {e}")))?;

    match endpoint {
        Endpoint::UploadDoc => handlers::upload_doc(&state.docs, &body).await,
        Endpoint::CreateStyledSheet => handlers::create_styled_sheet(&state.sheets, &body).await,
        Endpoint::CreateSlides => {
            handlers::create_slides(&state.slides, &body, SegmentStrategy::BoldTitles).await
        }
        Endpoint::CreateSlidesShow => {
            handlers::create_slides(&state.slides, &body, SegmentStrategy::Headings).await
        }
    }
}

/// Handles one request end-to-end and answers it. Never panics the worker:
/// every failure path becomes a JSON error response.
pub async fn dispatch(state: &AppState, mut request: Request, max_body_bytes: usize) {
    let method = request.method().clone();
    let path = request.url().split('?').next().unwrap_or("").to_string();

    let (status, response) = match resolve(&method, request.url()) {
        Route::Liveness => (200, text_response(200, LIVENESS_MESSAGE)),
        Route::Preflight => (204, text_response(204, "")),
        Route::NotFound => (404, json_response(404, &json!({ "error": "Not found" }))),
        Route::Api(endpoint) => {
            match run_endpoint(state, endpoint, &mut request, max_body_bytes).await {
                Ok(value) => (200, json_response(200, &value)),
                Err(err) => {
                    let status = err.status_code();
                    if status >= 500 {
                        tracing::error!(%method, %path, "{}", err);
                    }
                    (status, json_response(status, &json!({ "error": err.to_string() })))
                }
            }
        }
    };

    tracing::info!(%method, %path, status, "handled request");
    if let Err(err) = request.respond(response) {
        tracing::warn!("Failed to send response: {}", err);
    }
}
