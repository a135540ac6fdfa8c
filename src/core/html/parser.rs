// Lowers HTML markup into the flat block model. The scan is deliberately
// forgiving: real-world export HTML carries unclosed void elements, stray
// end tags and entities XML has never heard of, none of which should sink
// a whole request.

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;

use super::model::{Block, Run};

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("HTML parse error: {0}")]
    Malformed(String),
}

/// Elements that carry no text content and routinely appear unclosed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

fn is_paragraph_tag(name: &str) -> bool {
    matches!(name, "p" | "li" | "blockquote" | "pre")
}

fn heading_level(name: &str) -> Option<u8> {
    match name {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

enum OpenBlock {
    Paragraph,
    Heading(u8),
}

#[derive(Default)]
struct TableState {
    rows: Vec<Vec<String>>,
    row: Option<Vec<String>>,
    cell: Option<String>,
}

#[derive(Default)]
struct BlockCollector {
    blocks: Vec<Block>,
    open: Option<OpenBlock>,
    runs: Vec<Run>,
    bold_depth: usize,
    table: Option<TableState>,
    skip_depth: usize,
}

impl BlockCollector {
    /// Routes text to whatever is currently collecting it: an open table
    /// cell, then an open paragraph or heading. Text between blocks is
    /// dropped, matching how element-only DOM traversal ignores stray
    /// text nodes.
    fn append_text(&mut self, text: &str) {
        if self.skip_depth > 0 {
            return;
        }
        if let Some(table) = self.table.as_mut() {
            if let Some(cell) = table.cell.as_mut() {
                cell.push_str(text);
            }
            return;
        }
        if self.open.is_none() {
            return;
        }
        let bold = self.bold_depth > 0;
        match self.runs.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                bold,
            }),
        }
    }

    fn flush_open_block(&mut self) {
        let Some(open) = self.open.take() else {
            self.runs.clear();
            return;
        };
        let runs = std::mem::take(&mut self.runs);
        match open {
            OpenBlock::Paragraph => {
                if runs.iter().any(|run| !run.text.is_empty()) {
                    self.blocks.push(Block::Paragraph(runs));
                }
            }
            OpenBlock::Heading(level) => {
                let text: String = runs.into_iter().map(|run| run.text).collect();
                self.blocks.push(Block::Heading { level, text });
            }
        }
    }

    fn open_block(&mut self, block: OpenBlock) {
        self.flush_open_block();
        self.open = Some(block);
    }

    fn start_element(&mut self, name: &str) {
        if name == "script" || name == "style" {
            self.skip_depth += 1;
            return;
        }
        if self.skip_depth > 0 {
            return;
        }
        if name == "br" {
            self.append_text("\n");
            return;
        }
        if let Some(table) = self.table.as_mut() {
            match name {
                "tr" => {
                    table.row = Some(Vec::new());
                    table.cell = None;
                }
                "td" | "th" => {
                    if table.row.is_none() {
                        table.row = Some(Vec::new());
                    }
                    table.cell = Some(String::new());
                }
                _ => {}
            }
            return;
        }
        if name == "table" {
            self.flush_open_block();
            self.table = Some(TableState::default());
            return;
        }
        if is_paragraph_tag(name) {
            self.open_block(OpenBlock::Paragraph);
        } else if let Some(level) = heading_level(name) {
            self.open_block(OpenBlock::Heading(level));
        } else if name == "b" || name == "strong" {
            self.bold_depth += 1;
        }
        // Anything else (div, span, a, em, ...) is a transparent container.
    }

    fn end_element(&mut self, name: &str) {
        if name == "script" || name == "style" {
            self.skip_depth = self.skip_depth.saturating_sub(1);
            return;
        }
        if self.skip_depth > 0 {
            return;
        }
        if let Some(table) = self.table.as_mut() {
            match name {
                "td" | "th" => {
                    if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                        row.push(cell);
                    }
                }
                "tr" => {
                    if let Some(row) = table.row.take() {
                        table.rows.push(row);
                    }
                }
                "table" => {
                    let mut table = match self.table.take() {
                        Some(table) => table,
                        None => return,
                    };
                    if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                        row.push(cell);
                    }
                    if let Some(row) = table.row.take() {
                        table.rows.push(row);
                    }
                    self.blocks.push(Block::Table(table.rows));
                }
                _ => {}
            }
            return;
        }
        if is_paragraph_tag(name) || heading_level(name).is_some() {
            self.flush_open_block();
        } else if name == "b" || name == "strong" {
            self.bold_depth = self.bold_depth.saturating_sub(1);
        }
    }

    fn finish(mut self) -> Vec<Block> {
        // Unclosed trailing content still belongs to the document.
        if let Some(mut table) = self.table.take() {
            if let (Some(cell), Some(row)) = (table.cell.take(), table.row.as_mut()) {
                row.push(cell);
            }
            if let Some(row) = table.row.take() {
                table.rows.push(row);
            }
            self.blocks.push(Block::Table(table.rows));
        }
        self.flush_open_block();
        self.blocks
    }
}

/// Parses an HTML document into its ordered top-level blocks.
pub fn parse_blocks(html: &str) -> Result<Vec<Block>, HtmlError> {
    let mut reader = Reader::from_str(html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut collector = BlockCollector::default();
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if !VOID_ELEMENTS.contains(&name.as_str()) {
                    collector.start_element(&name);
                }
            }
            Ok(Event::Empty(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                if name == "br" {
                    collector.append_text("\n");
                }
            }
            Ok(Event::Text(ref e)) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                let decoded = html_escape::decode_html_entities(&raw);
                collector.append_text(&decoded);
            }
            Ok(Event::CData(ref e)) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                collector.append_text(&raw);
            }
            Ok(Event::End(ref e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                collector.end_element(&name);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(HtmlError::Malformed(err.to_string())),
        }
        buf.clear();
    }
    Ok(collector.finish())
}
