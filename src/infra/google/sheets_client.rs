use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::drive_client::DriveFilesClient;
use super::error_text;
use crate::core::sheets::sheet_service::{CreatedSpreadsheet, SheetError, SpreadsheetHost};

const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Sheets API client; deletes go through Drive.
pub struct GoogleSheetsClient {
    client: Client,
    drive: DriveFilesClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Spreadsheet {
    spreadsheet_id: String,
    spreadsheet_url: Option<String>,
}

impl GoogleSheetsClient {
    pub fn new(client: Client, drive: DriveFilesClient) -> Self {
        Self {
            client,
            drive,
            base_url: SHEETS_BASE_URL.to_string(),
        }
    }
}

/// A1 notation for a grid of the given shape anchored at A1.
fn a1_range(row_count: usize, column_count: usize) -> String {
    format!("A1:{}{}", column_letters(column_count.max(1)), row_count.max(1))
}

fn column_letters(mut column: usize) -> String {
    let mut letters = Vec::new();
    while column > 0 {
        let remainder = (column - 1) % 26;
        letters.push(b'A' + remainder as u8);
        column = (column - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

#[async_trait]
impl SpreadsheetHost for GoogleSheetsClient {
    async fn create_spreadsheet(
        &self,
        access_token: &str,
        title: &str,
    ) -> Result<CreatedSpreadsheet, SheetError> {
        let body = serde_json::json!({ "properties": { "title": title } });
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SheetError::Api(error_text(response).await));
        }

        let spreadsheet: Spreadsheet = response
            .json()
            .await
            .map_err(|e| SheetError::Api(e.to_string()))?;
        let spreadsheet_url = spreadsheet.spreadsheet_url.unwrap_or_else(|| {
            format!(
                "https://docs.google.com/spreadsheets/d/{}/edit",
                spreadsheet.spreadsheet_id
            )
        });
        Ok(CreatedSpreadsheet {
            spreadsheet_id: spreadsheet.spreadsheet_id,
            spreadsheet_url,
        })
    }

    async fn write_values(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        values: &[Vec<String>],
    ) -> Result<(), SheetError> {
        let column_count = values.iter().map(Vec::len).max().unwrap_or(0);
        let range = a1_range(values.len(), column_count);
        let url = format!("{}/{}/values/{}", self.base_url, spreadsheet_id, range);
        let body = serde_json::json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": values,
        });

        let response = self
            .client
            .put(&url)
            .query(&[("valueInputOption", "RAW")])
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SheetError::Api(error_text(response).await));
        }
        Ok(())
    }

    async fn apply_formats(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        requests: &[Value],
    ) -> Result<(), SheetError> {
        if requests.is_empty() {
            return Ok(());
        }
        let url = format!("{}/{}:batchUpdate", self.base_url, spreadsheet_id);
        let body = serde_json::json!({ "requests": requests });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SheetError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SheetError::Api(error_text(response).await));
        }
        Ok(())
    }

    async fn delete_spreadsheet(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
    ) -> Result<(), SheetError> {
        self.drive
            .delete(access_token, spreadsheet_id)
            .await
            .map_err(SheetError::Api)
    }
}
