use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::drive_client::DriveFilesClient;
use super::error_text;
use crate::core::slides::deck_service::{CreatedPresentation, PresentationHost, SlideError};
use crate::core::slides::layout::LayoutCommand;

const SLIDES_BASE_URL: &str = "https://slides.googleapis.com/v1/presentations";

/// Slides API client; deletes go through Drive.
pub struct GoogleSlidesClient {
    client: Client,
    drive: DriveFilesClient,
    base_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Presentation {
    presentation_id: String,
}

impl GoogleSlidesClient {
    pub fn new(client: Client, drive: DriveFilesClient) -> Self {
        Self {
            client,
            drive,
            base_url: SLIDES_BASE_URL.to_string(),
        }
    }
}

#[async_trait]
impl PresentationHost for GoogleSlidesClient {
    async fn create_presentation(
        &self,
        access_token: &str,
        title: &str,
    ) -> Result<CreatedPresentation, SlideError> {
        let body = serde_json::json!({ "title": title });
        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SlideError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SlideError::Api(error_text(response).await));
        }

        let presentation: Presentation = response
            .json()
            .await
            .map_err(|e| SlideError::Api(e.to_string()))?;
        Ok(CreatedPresentation {
            presentation_id: presentation.presentation_id,
        })
    }

    async fn apply_layout(
        &self,
        access_token: &str,
        presentation_id: &str,
        commands: &[LayoutCommand],
    ) -> Result<(), SlideError> {
        let url = format!("{}/{}:batchUpdate", self.base_url, presentation_id);
        let body = serde_json::json!({ "requests": commands });

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| SlideError::Api(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SlideError::Api(error_text(response).await));
        }
        Ok(())
    }

    async fn delete_presentation(
        &self,
        access_token: &str,
        presentation_id: &str,
    ) -> Result<(), SlideError> {
        self.drive
            .delete(access_token, presentation_id)
            .await
            .map_err(SlideError::Api)
    }
}
