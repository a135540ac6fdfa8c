// The styled-sheet flow: decode, pull the first table, create the
// spreadsheet, write raw values from A1, then apply header and banding
// formats in one batch.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::table_extract::first_table_grid;
use crate::core::html::parser::HtmlError;
use crate::core::html::{decode_base64_html, parse_blocks};

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Document contains no table")]
    NoTable,

    #[error("Invalid base64 payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Sheets API error: {0}")]
    Api(String),
}

/// Handle to a spreadsheet created by the backend.
#[derive(Debug, Clone)]
pub struct CreatedSpreadsheet {
    pub spreadsheet_id: String,
    pub spreadsheet_url: String,
}

/// What the sheet flow needs from the Sheets backend.
#[async_trait]
pub trait SpreadsheetHost: Send + Sync {
    async fn create_spreadsheet(
        &self,
        access_token: &str,
        title: &str,
    ) -> Result<CreatedSpreadsheet, SheetError>;

    /// Writes the grid as raw values starting at A1.
    async fn write_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        values: &[Vec<String>],
    ) -> Result<(), SheetError>;

    async fn apply_formats(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        requests: &[Value],
    ) -> Result<(), SheetError>;

    /// Best-effort removal of a sheet whose population failed.
    async fn delete_spreadsheet(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
    ) -> Result<(), SheetError>;
}

pub const DEFAULT_SHEET_TITLE: &str = "Imported table";

// Header fill plus the two shades data rows alternate between.
const HEADER_FILL: (f64, f64, f64) = (0.26, 0.52, 0.96);
const BAND_SHADE_A: (f64, f64, f64) = (0.95, 0.95, 0.95);
const BAND_SHADE_B: (f64, f64, f64) = (1.0, 1.0, 1.0);

fn color(rgb: (f64, f64, f64)) -> Value {
    json!({ "red": rgb.0, "green": rgb.1, "blue": rgb.2 })
}

/// Builds the repeatCell requests for a grid of the given shape: one for
/// the bold white-on-fill header row, then one per data row, banded by
/// row parity.
pub fn styling_requests(row_count: usize, column_count: usize) -> Vec<Value> {
    if row_count == 0 || column_count == 0 {
        return Vec::new();
    }

    let mut requests = Vec::with_capacity(row_count);
    requests.push(json!({
        "repeatCell": {
            "range": {
                "sheetId": 0,
                "startRowIndex": 0,
                "endRowIndex": 1,
                "startColumnIndex": 0,
                "endColumnIndex": column_count,
            },
            "cell": {
                "userEnteredFormat": {
                    "backgroundColor": color(HEADER_FILL),
                    "textFormat": {
                        "bold": true,
                        "foregroundColor": color((1.0, 1.0, 1.0)),
                    },
                }
            },
            "fields": "userEnteredFormat(backgroundColor,textFormat)",
        }
    }));

    for row in 1..row_count {
        let shade = if row % 2 == 1 {
            BAND_SHADE_A
        } else {
            BAND_SHADE_B
        };
        requests.push(json!({
            "repeatCell": {
                "range": {
                    "sheetId": 0,
                    "startRowIndex": row,
                    "endRowIndex": row + 1,
                    "startColumnIndex": 0,
                    "endColumnIndex": column_count,
                },
                "cell": {
                    "userEnteredFormat": { "backgroundColor": color(shade) }
                },
                "fields": "userEnteredFormat.backgroundColor",
            }
        }));
    }
    requests
}

pub struct SheetComposeService<H: SpreadsheetHost> {
    host: H,
}

impl<H: SpreadsheetHost> SheetComposeService<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Runs the whole flow and returns the spreadsheet URL.
    pub async fn compose(
        &self,
        access_token: &str,
        html_base64: &str,
        title: Option<&str>,
    ) -> Result<String, SheetError> {
        let html =
            decode_base64_html(html_base64).map_err(|e| SheetError::Payload(e.to_string()))?;
        let blocks = parse_blocks(&html)?;
        let grid = first_table_grid(&blocks).ok_or(SheetError::NoTable)?;

        let title = title.unwrap_or(DEFAULT_SHEET_TITLE);
        let created = self.host.create_spreadsheet(access_token, title).await?;
        tracing::info!(
            spreadsheet_id = %created.spreadsheet_id,
            rows = grid.len(),
            "Created spreadsheet"
        );

        if let Err(err) = self
            .populate(access_token, &created.spreadsheet_id, &grid)
            .await
        {
            tracing::error!(
                "Populating spreadsheet {} failed: {}",
                created.spreadsheet_id,
                err
            );
            if let Err(cleanup_err) = self
                .host
                .delete_spreadsheet(access_token, &created.spreadsheet_id)
                .await
            {
                tracing::warn!(
                    "Could not remove orphaned spreadsheet {}: {}",
                    created.spreadsheet_id,
                    cleanup_err
                );
            }
            return Err(err);
        }

        Ok(created.spreadsheet_url)
    }

    async fn populate(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        grid: &[Vec<String>],
    ) -> Result<(), SheetError> {
        self.host
            .write_values(access_token, spreadsheet_id, grid)
            .await?;
        let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
        let requests = styling_requests(grid.len(), column_count);
        self.host
            .apply_formats(access_token, spreadsheet_id, &requests)
            .await
    }
}
