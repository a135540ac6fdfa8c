// The deck flow: decode, segment, project, then drive the Slides backend.
// The whole deck is submitted as one batch; a mid-batch failure leaves the
// presentation partially built, so the service deletes it best-effort
// rather than leaving an orphan behind.

use async_trait::async_trait;
use thiserror::Error;

use super::layout::{project_deck, DescriptionOffset, LayoutCommand};
use super::segmenter::{segment, SegmentStrategy};
use crate::core::html::parser::HtmlError;
use crate::core::html::{decode_base64_html, parse_blocks};

#[derive(Debug, Error)]
pub enum SlideError {
    #[error("No valid slides found in the document")]
    NoSlides,

    #[error("Invalid base64 payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error("Slides API error: {0}")]
    Api(String),
}

/// Handle to a presentation created by the backend.
#[derive(Debug, Clone)]
pub struct CreatedPresentation {
    pub presentation_id: String,
}

/// What the deck flow needs from the Slides backend. The caller's OAuth
/// access token travels with every call; the service neither validates
/// nor refreshes it.
#[async_trait]
pub trait PresentationHost: Send + Sync {
    async fn create_presentation(
        &self,
        access_token: &str,
        title: &str,
    ) -> Result<CreatedPresentation, SlideError>;

    async fn apply_layout(
        &self,
        access_token: &str,
        presentation_id: &str,
        commands: &[LayoutCommand],
    ) -> Result<(), SlideError>;

    /// Best-effort removal of a deck whose population failed.
    async fn delete_presentation(
        &self,
        access_token: &str,
        presentation_id: &str,
    ) -> Result<(), SlideError>;
}

pub const DEFAULT_DECK_TITLE: &str = "Untitled presentation";

pub fn presentation_url(presentation_id: &str) -> String {
    format!("https://docs.google.com/presentation/d/{presentation_id}/edit")
}

pub struct SlideDeckService<H: PresentationHost> {
    host: H,
}

impl<H: PresentationHost> SlideDeckService<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Runs the whole flow and returns the presentation URL. Validation
    /// (including the empty-segmentation case) happens before any call
    /// leaves the process.
    pub async fn generate(
        &self,
        access_token: &str,
        html_base64: &str,
        file_name: Option<&str>,
        strategy: SegmentStrategy,
    ) -> Result<String, SlideError> {
        let html =
            decode_base64_html(html_base64).map_err(|e| SlideError::Payload(e.to_string()))?;
        let blocks = parse_blocks(&html)?;
        let records = segment(&blocks, strategy);
        if records.is_empty() {
            return Err(SlideError::NoSlides);
        }

        let offset = match strategy {
            SegmentStrategy::BoldTitles => DescriptionOffset::Compact,
            SegmentStrategy::Headings => DescriptionOffset::Spacious,
        };
        let commands = project_deck(&records, offset);

        let title = file_name.unwrap_or(DEFAULT_DECK_TITLE);
        let created = self.host.create_presentation(access_token, title).await?;
        tracing::info!(
            presentation_id = %created.presentation_id,
            slides = records.len(),
            "Created presentation"
        );

        if let Err(err) = self
            .host
            .apply_layout(access_token, &created.presentation_id, &commands)
            .await
        {
            tracing::error!(
                "Populating presentation {} failed: {}",
                created.presentation_id,
                err
            );
            if let Err(cleanup_err) = self
                .host
                .delete_presentation(access_token, &created.presentation_id)
                .await
            {
                tracing::warn!(
                    "Could not remove orphaned presentation {}: {}",
                    created.presentation_id,
                    cleanup_err
                );
            }
            return Err(err);
        }

        Ok(presentation_url(&created.presentation_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        created_titles: Mutex<Vec<String>>,
        applied_command_counts: Mutex<Vec<usize>>,
        deleted: Mutex<Vec<String>>,
        fail_apply: bool,
    }

    #[async_trait]
    impl PresentationHost for RecordingHost {
        async fn create_presentation(
            &self,
            _access_token: &str,
            title: &str,
        ) -> Result<CreatedPresentation, SlideError> {
            self.created_titles.lock().unwrap().push(title.to_string());
            Ok(CreatedPresentation {
                presentation_id: "pres-1".to_string(),
            })
        }

        async fn apply_layout(
            &self,
            _access_token: &str,
            _presentation_id: &str,
            commands: &[LayoutCommand],
        ) -> Result<(), SlideError> {
            self.applied_command_counts
                .lock()
                .unwrap()
                .push(commands.len());
            if self.fail_apply {
                Err(SlideError::Api("batch rejected".to_string()))
            } else {
                Ok(())
            }
        }

        async fn delete_presentation(
            &self,
            _access_token: &str,
            presentation_id: &str,
        ) -> Result<(), SlideError> {
            self.deleted.lock().unwrap().push(presentation_id.to_string());
            Ok(())
        }
    }

    fn encode(html: &str) -> String {
        general_purpose::STANDARD.encode(html)
    }

    #[tokio::test]
    async fn returns_the_presentation_url() {
        let service = SlideDeckService::new(RecordingHost::default());
        let html = encode("<p><b>Title</b></p><p>body</p>");
        let url = service
            .generate("token", &html, Some("My deck"), SegmentStrategy::BoldTitles)
            .await
            .unwrap();
        assert_eq!(url, "https://docs.google.com/presentation/d/pres-1/edit");
        assert_eq!(
            *service.host.created_titles.lock().unwrap(),
            vec!["My deck".to_string()]
        );
        // One batch: slide, two images, three boxes, two insert/style pairs
        // plus the footer pair.
        assert_eq!(*service.host.applied_command_counts.lock().unwrap(), vec![12]);
    }

    #[tokio::test]
    async fn empty_segmentation_fails_before_any_backend_call() {
        let service = SlideDeckService::new(RecordingHost::default());
        let html = encode("<p>no titles here</p>");
        let err = service
            .generate("token", &html, None, SegmentStrategy::Headings)
            .await
            .unwrap_err();
        assert!(matches!(err, SlideError::NoSlides));
        assert!(service.host.created_titles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_base64_fails_before_any_backend_call() {
        let service = SlideDeckService::new(RecordingHost::default());
        let err = service
            .generate("token", "!!!", None, SegmentStrategy::BoldTitles)
            .await
            .unwrap_err();
        assert!(matches!(err, SlideError::Payload(_)));
        assert!(service.host.created_titles.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_batch_triggers_best_effort_cleanup() {
        let service = SlideDeckService::new(RecordingHost {
            fail_apply: true,
            ..RecordingHost::default()
        });
        let html = encode("<h2>A</h2><p>x</p>");
        let err = service
            .generate("token", &html, None, SegmentStrategy::Headings)
            .await
            .unwrap_err();
        assert!(matches!(err, SlideError::Api(_)));
        assert_eq!(
            *service.host.deleted.lock().unwrap(),
            vec!["pres-1".to_string()]
        );
    }

    #[tokio::test]
    async fn missing_file_name_falls_back_to_the_default_title() {
        let service = SlideDeckService::new(RecordingHost::default());
        let html = encode("<h2>A</h2><p>x</p>");
        service
            .generate("token", &html, None, SegmentStrategy::Headings)
            .await
            .unwrap();
        assert_eq!(
            *service.host.created_titles.lock().unwrap(),
            vec![DEFAULT_DECK_TITLE.to_string()]
        );
    }
}
