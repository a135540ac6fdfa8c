// The block model is deliberately flat: the segmenters and the table
// extractor only ever look at the top-level sequence of blocks, so nested
// containers are dissolved by the parser rather than represented here.

/// One run of text inside a paragraph. `bold` is set while the run sits
/// inside a `<b>` or `<strong>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: bool,
}

/// A top-level block of the parsed document, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Vec<Run>),
    Heading { level: u8, text: String },
    /// Rows of raw cell text (`<td>` and `<th>` alike).
    Table(Vec<Vec<String>>),
}

/// Collapses every run of whitespace to a single space and trims the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Block {
    /// Text content as parsed, internal line breaks kept.
    pub fn raw_text(&self) -> String {
        match self {
            Block::Paragraph(runs) => runs.iter().map(|run| run.text.as_str()).collect(),
            Block::Heading { text, .. } => text.clone(),
            Block::Table(rows) => rows
                .iter()
                .map(|row| row.join(" "))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Whitespace-collapsed, trimmed text content.
    pub fn normalized_text(&self) -> String {
        collapse_whitespace(&self.raw_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapse_whitespace_flattens_runs_and_trims() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("\u{a0}\u{a0}"), "");
    }

    #[test]
    fn paragraph_raw_text_concatenates_runs() {
        let block = Block::Paragraph(vec![
            Run {
                text: "one ".to_string(),
                bold: true,
            },
            Run {
                text: "two".to_string(),
                bold: false,
            },
        ]);
        assert_eq!(block.raw_text(), "one two");
        assert_eq!(block.normalized_text(), "one two");
    }

    #[test]
    fn table_text_joins_cells_and_rows() {
        let block = Block::Table(vec![
            vec!["a".to_string(), "b".to_string()],
            vec!["c".to_string()],
        ]);
        assert_eq!(block.raw_text(), "a b\nc");
    }
}
