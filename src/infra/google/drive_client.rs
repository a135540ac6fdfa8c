use reqwest::Client;
use serde::Deserialize;

use super::error_text;

const DRIVE_UPLOAD_URL: &str = "https://www.googleapis.com/upload/drive/v3/files";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";

/// Minimal Drive files client: conversion uploads plus deletes. Errors are
/// plain strings; callers fold them into their own error types.
#[derive(Clone)]
pub struct DriveFilesClient {
    client: Client,
    upload_url: String,
    files_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub web_view_link: Option<String>,
}

impl DriveFilesClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            upload_url: DRIVE_UPLOAD_URL.to_string(),
            files_url: DRIVE_FILES_URL.to_string(),
        }
    }

    /// Uploads `content` and asks Drive to convert it into
    /// `target_mime_type`. Drive's multipart upload requires a
    /// `multipart/related` body, which reqwest's form support does not
    /// produce, so the body is assembled by hand.
    pub async fn upload_convert(
        &self,
        access_token: &str,
        name: &str,
        source_mime_type: &str,
        target_mime_type: &str,
        content: &[u8],
    ) -> Result<DriveFile, String> {
        const BOUNDARY: &str = "docbridge_upload_boundary";

        let metadata = serde_json::json!({
            "name": name,
            "mimeType": target_mime_type,
        });

        let mut body: Vec<u8> = Vec::with_capacity(content.len() + 512);
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{metadata}\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Type: {source_mime_type}\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let response = self
            .client
            .post(&self.upload_url)
            .query(&[("uploadType", "multipart"), ("fields", "id,webViewLink")])
            .bearer_auth(access_token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={BOUNDARY}"),
            )
            .body(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(error_text(response).await);
        }
        response.json::<DriveFile>().await.map_err(|e| e.to_string())
    }

    /// Deletes a Drive file. Docs, Sheets and Slides ids are all Drive
    /// file ids, so this covers cleanup for every flow.
    pub async fn delete(&self, access_token: &str, file_id: &str) -> Result<(), String> {
        let url = format!("{}/{}", self.files_url, file_id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(error_text(response).await);
        }
        Ok(())
    }
}
