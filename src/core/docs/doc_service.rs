// The document flow: decode, build a DOCX, stage it to a unique temp
// file, upload it with conversion, then style the converted document's
// direction across its probed length. The staging file is owned by this
// function and disappears on every exit path, success or failure.

use std::path::Path;

use async_trait::async_trait;
use tempfile::NamedTempFile;
use thiserror::Error;

use super::direction::{detect_direction, TextDirection};
use super::docx_builder::{build_docx, DocxError};
use crate::core::html::parser::HtmlError;
use crate::core::html::{decode_base64_html, parse_blocks};

#[derive(Debug, Error)]
pub enum DocError {
    #[error("Invalid base64 payload: {0}")]
    Payload(String),

    #[error(transparent)]
    Html(#[from] HtmlError),

    #[error(transparent)]
    Docx(#[from] DocxError),

    #[error("Failed to stage upload file: {0}")]
    Staging(String),

    #[error("Docs API error: {0}")]
    Api(String),
}

/// Handle to a document created by the upload.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub document_id: String,
    pub web_view_link: Option<String>,
}

/// What the document flow needs from Drive and Docs.
#[async_trait]
pub trait DocumentHost: Send + Sync {
    /// Uploads the staged DOCX, converting it into a Google Doc.
    async fn upload_as_document(
        &self,
        access_token: &str,
        file_name: &str,
        staged: &Path,
    ) -> Result<UploadedDocument, DocError>;

    /// Probes the created document for its body end index.
    async fn document_end_index(
        &self,
        access_token: &str,
        document_id: &str,
    ) -> Result<u64, DocError>;

    /// Applies one direction update across the given index range.
    async fn set_text_direction(
        &self,
        access_token: &str,
        document_id: &str,
        end_index: u64,
        direction: TextDirection,
    ) -> Result<(), DocError>;
}

pub fn document_url(document_id: &str) -> String {
    format!("https://docs.google.com/document/d/{document_id}/edit")
}

pub struct DocPublishService<H: DocumentHost> {
    host: H,
}

impl<H: DocumentHost> DocPublishService<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Runs the whole flow and returns the document URL.
    pub async fn publish(
        &self,
        access_token: &str,
        html_base64: &str,
        file_name: &str,
    ) -> Result<String, DocError> {
        let html = decode_base64_html(html_base64).map_err(|e| DocError::Payload(e.to_string()))?;
        let direction = detect_direction(&html);
        let blocks = parse_blocks(&html)?;
        let docx = build_docx(&blocks)?;

        let staged = NamedTempFile::new().map_err(|e| DocError::Staging(e.to_string()))?;
        tokio::fs::write(staged.path(), &docx)
            .await
            .map_err(|e| DocError::Staging(e.to_string()))?;

        let uploaded = self
            .host
            .upload_as_document(access_token, file_name, staged.path())
            .await?;
        tracing::info!(
            document_id = %uploaded.document_id,
            ?direction,
            "Uploaded document"
        );

        let end_index = self
            .host
            .document_end_index(access_token, &uploaded.document_id)
            .await?;
        if end_index > 1 {
            self.host
                .set_text_direction(access_token, &uploaded.document_id, end_index, direction)
                .await?;
        }

        Ok(uploaded
            .web_view_link
            .unwrap_or_else(|| document_url(&uploaded.document_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose, Engine as _};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        uploads: Mutex<Vec<(String, Vec<u8>)>>,
        probes: Mutex<Vec<String>>,
        directions: Mutex<Vec<(u64, TextDirection)>>,
        end_index: u64,
        web_view_link: Option<String>,
    }

    #[async_trait]
    impl DocumentHost for RecordingHost {
        async fn upload_as_document(
            &self,
            _access_token: &str,
            file_name: &str,
            staged: &Path,
        ) -> Result<UploadedDocument, DocError> {
            let bytes = std::fs::read(staged).map_err(|e| DocError::Staging(e.to_string()))?;
            self.uploads
                .lock()
                .unwrap()
                .push((file_name.to_string(), bytes));
            Ok(UploadedDocument {
                document_id: "doc-1".to_string(),
                web_view_link: self.web_view_link.clone(),
            })
        }

        async fn document_end_index(
            &self,
            _access_token: &str,
            document_id: &str,
        ) -> Result<u64, DocError> {
            self.probes.lock().unwrap().push(document_id.to_string());
            Ok(self.end_index)
        }

        async fn set_text_direction(
            &self,
            _access_token: &str,
            _document_id: &str,
            end_index: u64,
            direction: TextDirection,
        ) -> Result<(), DocError> {
            self.directions.lock().unwrap().push((end_index, direction));
            Ok(())
        }
    }

    fn encode(html: &str) -> String {
        general_purpose::STANDARD.encode(html)
    }

    #[tokio::test]
    async fn uploads_staged_docx_and_styles_direction() {
        let service = DocPublishService::new(RecordingHost {
            end_index: 42,
            ..RecordingHost::default()
        });
        let url = service
            .publish("token", &encode("<p>hello</p>"), "report.docx")
            .await
            .unwrap();
        assert_eq!(url, "https://docs.google.com/document/d/doc-1/edit");

        let uploads = service.host.uploads.lock().unwrap();
        assert_eq!(uploads[0].0, "report.docx");
        // The staged bytes are a zip (DOCX) package.
        assert_eq!(&uploads[0].1[..2], b"PK");

        assert_eq!(*service.host.probes.lock().unwrap(), vec!["doc-1".to_string()]);
        assert_eq!(
            *service.host.directions.lock().unwrap(),
            vec![(42, TextDirection::LeftToRight)]
        );
    }

    #[tokio::test]
    async fn hebrew_html_is_styled_right_to_left() {
        let service = DocPublishService::new(RecordingHost {
            end_index: 10,
            ..RecordingHost::default()
        });
        service
            .publish("token", &encode("<p>שלום</p>"), "hebrew.docx")
            .await
            .unwrap();
        assert_eq!(
            *service.host.directions.lock().unwrap(),
            vec![(10, TextDirection::RightToLeft)]
        );
    }

    #[tokio::test]
    async fn empty_documents_skip_the_style_update() {
        let service = DocPublishService::new(RecordingHost {
            end_index: 1,
            ..RecordingHost::default()
        });
        service
            .publish("token", &encode(""), "empty.docx")
            .await
            .unwrap();
        assert!(service.host.directions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn prefers_the_host_returned_link() {
        let service = DocPublishService::new(RecordingHost {
            end_index: 5,
            web_view_link: Some("https://docs.google.com/document/d/doc-1/view".to_string()),
            ..RecordingHost::default()
        });
        let url = service
            .publish("token", &encode("<p>x</p>"), "doc.docx")
            .await
            .unwrap();
        assert_eq!(url, "https://docs.google.com/document/d/doc-1/view");
    }

    #[tokio::test]
    async fn invalid_base64_fails_before_any_backend_call() {
        let service = DocPublishService::new(RecordingHost::default());
        let err = service
            .publish("token", "%%%", "doc.docx")
            .await
            .unwrap_err();
        assert!(matches!(err, DocError::Payload(_)));
        assert!(service.host.uploads.lock().unwrap().is_empty());
    }
}
