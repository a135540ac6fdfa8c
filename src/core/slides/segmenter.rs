// Partitions a flat document into (title, description) slide records.
// Two heuristics exist because the two slide endpoints grew apart in the
// product: one keys on bold-only paragraphs, the other on h2 headings.

use crate::core::html::model::{collapse_whitespace, Block, Run};

/// One slide to be created: a title and the text that goes under it.
/// Records have no identity beyond their position in the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRecord {
    pub title: String,
    pub description: String,
}

/// Which heuristic partitions the document into slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentStrategy {
    /// A paragraph whose entire text is one bolded run starts a slide.
    BoldTitles,
    /// Every `<h2>` heading starts a slide.
    Headings,
}

/// Runs the chosen heuristic and drops records without a title.
pub fn segment(blocks: &[Block], strategy: SegmentStrategy) -> Vec<SlideRecord> {
    let records = match strategy {
        SegmentStrategy::BoldTitles => segment_by_bold_titles(blocks),
        SegmentStrategy::Headings => segment_by_headings(blocks),
    };
    records
        .into_iter()
        .filter(|record| !record.title.is_empty())
        .collect()
}

/// A paragraph is a title boundary iff its whole normalized text equals
/// the normalized text of its bolded runs and is non-empty. A paragraph
/// mixing bold and plain text is ordinary content.
fn bold_only_title(runs: &[Run]) -> Option<String> {
    let full: String = runs.iter().map(|run| run.text.as_str()).collect();
    let full = collapse_whitespace(&full);
    let bold: String = runs
        .iter()
        .filter(|run| run.bold)
        .map(|run| run.text.as_str())
        .collect();
    let bold = collapse_whitespace(&bold);
    if !full.is_empty() && full == bold {
        Some(full)
    } else {
        None
    }
}

fn segment_by_bold_titles(blocks: &[Block]) -> Vec<SlideRecord> {
    let mut slides = Vec::new();
    let mut current: Option<SlideRecord> = None;
    let mut buffer: Vec<String> = Vec::new();

    for block in blocks {
        if let Block::Paragraph(runs) = block {
            if let Some(title) = bold_only_title(runs) {
                if let Some(mut slide) = current.take() {
                    slide.description = buffer.join("\n");
                    slides.push(slide);
                }
                // Content before the first boundary has no slide to land in.
                buffer.clear();
                current = Some(SlideRecord {
                    title,
                    description: String::new(),
                });
                continue;
            }
        }
        let text = block.normalized_text();
        if !text.is_empty() {
            buffer.push(text);
        }
    }

    if let Some(mut slide) = current {
        slide.description = buffer.join("\n");
        slides.push(slide);
    }
    slides
}

fn segment_by_headings(blocks: &[Block]) -> Vec<SlideRecord> {
    let mut slides = Vec::new();
    let mut current: Option<SlideRecord> = None;

    for block in blocks {
        match block {
            Block::Heading { level: 2, text } => {
                if let Some(mut slide) = current.take() {
                    slide.description = slide.description.trim().to_string();
                    slides.push(slide);
                }
                current = Some(SlideRecord {
                    title: text.trim().to_string(),
                    description: String::new(),
                });
            }
            other => {
                // Raw sibling text, one line break per element; only the
                // final assembled string is trimmed.
                if let Some(slide) = current.as_mut() {
                    slide.description.push_str(&other.raw_text());
                    slide.description.push('\n');
                }
            }
        }
    }

    if let Some(mut slide) = current.take() {
        slide.description = slide.description.trim().to_string();
        slides.push(slide);
    }
    slides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Block {
        Block::Paragraph(vec![Run {
            text: text.to_string(),
            bold: false,
        }])
    }

    fn bold_para(text: &str) -> Block {
        Block::Paragraph(vec![Run {
            text: text.to_string(),
            bold: true,
        }])
    }

    fn h2(text: &str) -> Block {
        Block::Heading {
            level: 2,
            text: text.to_string(),
        }
    }

    fn record(title: &str, description: &str) -> SlideRecord {
        SlideRecord {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn bold_titles_pair_each_title_with_following_text() {
        let blocks = vec![
            bold_para("Title A"),
            para("text1"),
            bold_para("Title B"),
            para("text2"),
        ];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Title A", "text1"), record("Title B", "text2")]
        );
    }

    #[test]
    fn bold_titles_drop_leading_content() {
        let blocks = vec![
            para("preamble"),
            para("more preamble"),
            bold_para("Title"),
            para("body"),
        ];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Title", "body")]
        );
    }

    #[test]
    fn mixed_bold_and_plain_is_not_a_boundary() {
        let blocks = vec![
            bold_para("Title"),
            Block::Paragraph(vec![
                Run {
                    text: "Bold bit".to_string(),
                    bold: true,
                },
                Run {
                    text: " then plain".to_string(),
                    bold: false,
                },
            ]),
        ];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Title", "Bold bit then plain")]
        );
    }

    #[test]
    fn bold_titles_join_buffered_text_with_newlines() {
        let blocks = vec![bold_para("Title"), para("one"), para("two")];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Title", "one\ntwo")]
        );
    }

    #[test]
    fn bold_titles_skip_empty_content_blocks() {
        let blocks = vec![bold_para("Title"), para("   "), para("body")];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Title", "body")]
        );
    }

    #[test]
    fn trailing_title_gets_an_empty_description() {
        let blocks = vec![bold_para("Only title")];
        assert_eq!(
            segment(&blocks, SegmentStrategy::BoldTitles),
            vec![record("Only title", "")]
        );
    }

    #[test]
    fn an_empty_bold_paragraph_is_not_a_title() {
        let blocks = vec![
            Block::Paragraph(vec![Run {
                text: "   ".to_string(),
                bold: true,
            }]),
            para("text"),
        ];
        assert!(segment(&blocks, SegmentStrategy::BoldTitles).is_empty());
    }

    #[test]
    fn headings_collect_siblings_until_the_next_h2() {
        let blocks = vec![h2("A"), para("x"), h2("B"), para("y"), para("z")];
        assert_eq!(
            segment(&blocks, SegmentStrategy::Headings),
            vec![record("A", "x"), record("B", "y\nz")]
        );
    }

    #[test]
    fn no_headings_means_no_slides() {
        let blocks = vec![para("just"), para("paragraphs"), bold_para("even bold")];
        assert!(segment(&blocks, SegmentStrategy::Headings).is_empty());
    }

    #[test]
    fn other_heading_levels_are_content_not_boundaries() {
        let blocks = vec![
            h2("A"),
            Block::Heading {
                level: 3,
                text: "sub".to_string(),
            },
            para("x"),
        ];
        assert_eq!(
            segment(&blocks, SegmentStrategy::Headings),
            vec![record("A", "sub\nx")]
        );
    }

    #[test]
    fn headings_keep_internal_line_breaks() {
        let blocks = vec![
            h2("A"),
            Block::Paragraph(vec![Run {
                text: "line one\nline two".to_string(),
                bold: false,
            }]),
        ];
        assert_eq!(
            segment(&blocks, SegmentStrategy::Headings),
            vec![record("A", "line one\nline two")]
        );
    }
}
