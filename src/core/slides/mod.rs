// Slide generation - segmentation heuristics and deck layout projection.

pub mod deck_service;
pub mod layout;
pub mod segmenter;

#[allow(unused_imports)]
pub use deck_service::{PresentationHost, SlideDeckService, SlideError};
#[allow(unused_imports)]
pub use segmenter::{SegmentStrategy, SlideRecord};
