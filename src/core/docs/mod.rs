// Google Doc generation - DOCX staging, upload and whole-document styling.

pub mod direction;
pub mod doc_service;
pub mod docx_builder;

#[allow(unused_imports)]
pub use direction::{detect_direction, TextDirection};
#[allow(unused_imports)]
pub use doc_service::{DocError, DocPublishService, DocumentHost};
