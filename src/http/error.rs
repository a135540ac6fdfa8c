use thiserror::Error;

use crate::core::docs::doc_service::DocError;
use crate::core::sheets::sheet_service::SheetError;
use crate::core::slides::deck_service::SlideError;

/// The surface knows exactly two failure kinds: bad input, answered with
/// 400 before anything leaves the process, and everything downstream,
/// answered with 500 and the error's message text.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Downstream(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Downstream(_) => 500,
        }
    }

    pub fn missing_field(name: &str) -> Self {
        ApiError::Validation(format!("Missing required field: {name}"))
    }
}

impl From<SlideError> for ApiError {
    fn from(err: SlideError) -> Self {
        match err {
            // Empty segmentation is the caller's document, not our failure.
            SlideError::NoSlides => ApiError::Validation(err.to_string()),
            other => ApiError::Downstream(other.to_string()),
        }
    }
}

impl From<DocError> for ApiError {
    fn from(err: DocError) -> Self {
        ApiError::Downstream(err.to_string())
    }
}

impl From<SheetError> for ApiError {
    fn from(err: SheetError) -> Self {
        ApiError::Downstream(err.to_string())
    }
}
