// Builds a minimal DOCX package from the block model, entirely in memory.
// Drive converts it to a Google Doc on upload, so only the parts the
// converter reads are emitted: content types, the package relationship and
// word/document.xml.

use std::io::{Cursor, Write};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::core::html::model::{Block, Run};

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("Failed to assemble DOCX package: {0}")]
    Package(String),
}

impl From<std::io::Error> for DocxError {
    fn from(err: std::io::Error) -> Self {
        DocxError::Package(err.to_string())
    }
}

impl From<zip::result::ZipError> for DocxError {
    fn from(err: zip::result::ZipError) -> Self {
        DocxError::Package(err.to_string())
    }
}

impl From<quick_xml::Error> for DocxError {
    fn from(err: quick_xml::Error) -> Self {
        DocxError::Package(err.to_string())
    }
}

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// Assembles the full DOCX byte stream for the given blocks.
pub fn build_docx(blocks: &[Block]) -> Result<Vec<u8>, DocxError> {
    let document = document_xml(blocks)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    zip.start_file("[Content_Types].xml", options)?;
    zip.write_all(CONTENT_TYPES_XML.as_bytes())?;

    zip.start_file("_rels/.rels", options)?;
    zip.write_all(RELS_XML.as_bytes())?;

    zip.start_file("word/document.xml", options)?;
    zip.write_all(&document)?;

    Ok(zip.finish()?.into_inner())
}

// Heading sizes in half-points, the unit w:sz speaks.
fn heading_size_half_points(level: u8) -> u32 {
    match level {
        1 => 72,
        2 => 56,
        3 => 48,
        _ => 44,
    }
}

fn document_xml(blocks: &[Block]) -> Result<Vec<u8>, DocxError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut document = BytesStart::new("w:document");
    document.push_attribute(("xmlns:w", WORDML_NS));
    writer.write_event(Event::Start(document))?;
    writer.write_event(Event::Start(BytesStart::new("w:body")))?;

    for block in blocks {
        match block {
            Block::Paragraph(runs) => write_paragraph(&mut writer, runs, None)?,
            Block::Heading { level, text } => {
                let runs = [Run {
                    text: text.clone(),
                    bold: true,
                }];
                write_paragraph(&mut writer, &runs, Some(heading_size_half_points(*level)))?;
            }
            Block::Table(rows) => write_table(&mut writer, rows)?,
        }
    }

    writer.write_event(Event::End(BytesEnd::new("w:body")))?;
    writer.write_event(Event::End(BytesEnd::new("w:document")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_paragraph<W: Write>(
    writer: &mut Writer<W>,
    runs: &[Run],
    half_point_size: Option<u32>,
) -> Result<(), DocxError> {
    writer.write_event(Event::Start(BytesStart::new("w:p")))?;
    for run in runs {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;
        if run.bold || half_point_size.is_some() {
            writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;
            if run.bold {
                writer.write_event(Event::Empty(BytesStart::new("w:b")))?;
            }
            if let Some(size) = half_point_size {
                let mut sz = BytesStart::new("w:sz");
                sz.push_attribute(("w:val", size.to_string().as_str()));
                writer.write_event(Event::Empty(sz))?;
            }
            writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
        }
        let mut text = BytesStart::new("w:t");
        text.push_attribute(("xml:space", "preserve"));
        writer.write_event(Event::Start(text))?;
        writer.write_event(Event::Text(BytesText::new(&run.text)))?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;
        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    Ok(())
}

fn write_table<W: Write>(writer: &mut Writer<W>, rows: &[Vec<String>]) -> Result<(), DocxError> {
    writer.write_event(Event::Start(BytesStart::new("w:tbl")))?;
    for row in rows {
        writer.write_event(Event::Start(BytesStart::new("w:tr")))?;
        for cell in row {
            writer.write_event(Event::Start(BytesStart::new("w:tc")))?;
            let runs = [Run {
                text: cell.clone(),
                bold: false,
            }];
            write_paragraph(writer, &runs, None)?;
            writer.write_event(Event::End(BytesEnd::new("w:tc")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:tr")))?;
    }
    writer.write_event(Event::End(BytesEnd::new("w:tbl")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn read_entry(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = archive.by_name(name).unwrap();
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        content
    }

    fn sample_blocks() -> Vec<Block> {
        vec![
            Block::Heading {
                level: 2,
                text: "Section".to_string(),
            },
            Block::Paragraph(vec![
                Run {
                    text: "Bold lead".to_string(),
                    bold: true,
                },
                Run {
                    text: " and Fish & chips".to_string(),
                    bold: false,
                },
            ]),
            Block::Table(vec![vec!["a".to_string(), "b".to_string()]]),
        ]
    }

    #[test]
    fn package_contains_the_mandatory_parts() {
        let bytes = build_docx(&sample_blocks()).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in ["[Content_Types].xml", "_rels/.rels", "word/document.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn document_text_is_escaped_and_preserved() {
        let bytes = build_docx(&sample_blocks()).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains(r#"<w:t xml:space="preserve">Bold lead</w:t>"#));
        assert!(document.contains("Fish &amp; chips"));
    }

    #[test]
    fn bold_runs_carry_run_properties() {
        let bytes = build_docx(&sample_blocks()).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains("<w:rPr><w:b/></w:rPr>"));
    }

    #[test]
    fn headings_are_sized_paragraphs() {
        let bytes = build_docx(&sample_blocks()).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains(r#"<w:sz w:val="56"/>"#));
    }

    #[test]
    fn tables_nest_cells_inside_rows() {
        let bytes = build_docx(&sample_blocks()).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains("<w:tbl><w:tr><w:tc>"));
    }

    #[test]
    fn empty_documents_still_package() {
        let bytes = build_docx(&[]).unwrap();
        let document = read_entry(&bytes, "word/document.xml");
        assert!(document.contains("<w:body></w:body>"));
    }
}
