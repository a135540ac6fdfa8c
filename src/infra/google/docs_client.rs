use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::drive_client::DriveFilesClient;
use super::error_text;
use crate::core::docs::direction::TextDirection;
use crate::core::docs::doc_service::{DocError, DocumentHost, UploadedDocument};

const DOCS_BASE_URL: &str = "https://docs.googleapis.com/v1/documents";

const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const GOOGLE_DOC_MIME: &str = "application/vnd.google-apps.document";

/// Docs API client; uploads go through Drive with conversion.
pub struct GoogleDocsClient {
    client: Client,
    drive: DriveFilesClient,
    base_url: String,
}

// Just enough of documents.get to find the end of the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    body: Option<Body>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Body {
    #[serde(default)]
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StructuralElement {
    end_index: Option<u64>,
}

impl GoogleDocsClient {
    pub fn new(client: Client, drive: DriveFilesClient) -> Self {
        Self {
            client,
            drive,
            base_url: DOCS_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl DocumentHost for GoogleDocsClient {
    async fn upload_as_document(
        &self,
        access_token: &str,
        file_name: &str,
        staged: &Path,
    ) -> Result<UploadedDocument, DocError> {
        let content = tokio::fs::read(staged)
            .await
            .map_err(|e| DocError::Staging(e.to_string()))?;
        let file = self
            .drive
            .upload_convert(access_token, file_name, DOCX_MIME, GOOGLE_DOC_MIME, &content)
            .await
            .map_err(DocError::Api)?;
        Ok(UploadedDocument {
            document_id: file.id,
            web_view_link: file.web_view_link,
        })
    }

    async fn document_end_index(
        &self,
        access_token: &str,
        document_id: &str,
    ) -> Result<u64, DocError> {
        let url = format!("{}/{}", self.base_url, document_id);
        let response = self
            .client
            .get(&url)
            .query(&[("fields", "body.content.endIndex")])
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| DocError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DocError::Api(error_text(response).await));
        }

        let document: Document = response
            .json()
            .await
            .map_err(|e| DocError::Api(e.to_string()))?;
        let end_index = document
            .body
            .map(|body| {
                body.content
                    .iter()
                    .filter_map(|element| element.end_index)
                    .max()
                    .unwrap_or(1)
            })
            .unwrap_or(1);
        Ok(end_index)
    }

    async fn set_text_direction(
        &self,
        access_token: &str,
        document_id: &str,
        end_index: u64,
        direction: TextDirection,
    ) -> Result<(), DocError> {
        let url = format!("{}/{}:batchUpdate", self.base_url, document_id);
        // The final index is the body's trailing newline, which the API
        // refuses to restyle.
        let body = serde_json::json!({
            "requests": [{
                "updateParagraphStyle": {
                    "range": {
                        "startIndex": 1,
                        "endIndex": end_index.saturating_sub(1).max(2),
                    },
                    "paragraphStyle": { "direction": direction.as_api_value() },
                    "fields": "direction",
                }
            }]
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| DocError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(DocError::Api(error_text(response).await));
        }
        Ok(())
    }
}
