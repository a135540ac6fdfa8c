// Projects slide records onto the absolute-positioned element commands of
// a presentation page. Every command serializes directly to one entry of a
// Slides batchUpdate, externally tagged (`{"createSlide": {...}}`).
//
// Object identifiers derive from the slide's 1-based ordinal and must be
// unique within one presentation.

use serde::Serialize;

use super::segmenter::SlideRecord;

/// Brand line inserted into every slide footer.
pub const FOOTER_TEXT: &str = "Generated by DocBridge";

const BACKGROUND_IMAGE_URL: &str =
    "https://storage.googleapis.com/docbridge-assets/slide-background.png";
const LOGO_IMAGE_URL: &str = "https://storage.googleapis.com/docbridge-assets/logo.png";

// 16:9 page in points.
const PAGE_WIDTH_PT: f64 = 720.0;
const PAGE_HEIGHT_PT: f64 = 405.0;

const BODY_LEFT_PT: f64 = 40.0;
const BODY_WIDTH_PT: f64 = 640.0;
const TITLE_TOP_PT: f64 = 20.0;
const TITLE_HEIGHT_PT: f64 = 45.0;
const DESCRIPTION_HEIGHT_PT: f64 = 280.0;

const LOGO_LEFT_PT: f64 = 20.0;
const LOGO_TOP_PT: f64 = 370.0;
const LOGO_WIDTH_PT: f64 = 80.0;
const LOGO_HEIGHT_PT: f64 = 24.0;

const FOOTER_LEFT_PT: f64 = 500.0;
const FOOTER_TOP_PT: f64 = 375.0;
const FOOTER_WIDTH_PT: f64 = 200.0;
const FOOTER_HEIGHT_PT: f64 = 20.0;

const TITLE_FONT_PT: f64 = 24.0;
const DESCRIPTION_FONT_PT: f64 = 14.0;
const FOOTER_FONT_PT: f64 = 10.0;

/// Vertical placement of the description box. The only layout difference
/// between the two slide endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DescriptionOffset {
    /// 70pt from the top of the page (/create-slides).
    Compact,
    /// 100pt from the top of the page (/create-slides-show).
    Spacious,
}

impl DescriptionOffset {
    fn top_pt(self) -> f64 {
        match self {
            DescriptionOffset::Compact => 70.0,
            DescriptionOffset::Spacious => 100.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimension {
    pub magnitude: f64,
    pub unit: &'static str,
}

fn pt(magnitude: f64) -> Dimension {
    Dimension {
        magnitude,
        unit: "PT",
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    pub width: Dimension,
    pub height: Dimension,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementProperties {
    pub page_object_id: String,
    pub size: Size,
    pub transform: Transform,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutReference {
    pub predefined_layout: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSlide {
    pub object_id: String,
    pub slide_layout_reference: LayoutReference,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImage {
    pub object_id: String,
    pub url: &'static str,
    pub element_properties: ElementProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShape {
    pub object_id: String,
    pub shape_type: &'static str,
    pub element_properties: ElementProperties,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertText {
    pub object_id: String,
    pub insertion_index: u32,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    pub font_size: Dimension,
    pub bold: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TextRange {
    #[serde(rename = "type")]
    pub range_type: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTextStyle {
    pub object_id: String,
    pub style: TextStyle,
    pub text_range: TextRange,
    pub fields: &'static str,
}

/// One entry of a presentation batchUpdate, in dependency order: the
/// container (slide or shape) is always emitted before any command that
/// references its identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayoutCommand {
    CreateSlide(CreateSlide),
    CreateImage(CreateImage),
    CreateShape(CreateShape),
    InsertText(InsertText),
    UpdateTextStyle(UpdateTextStyle),
}

#[allow(dead_code)]
impl LayoutCommand {
    /// The identifier this command brings into existence, if any.
    pub fn created_object_id(&self) -> Option<&str> {
        match self {
            LayoutCommand::CreateSlide(c) => Some(&c.object_id),
            LayoutCommand::CreateImage(c) => Some(&c.object_id),
            LayoutCommand::CreateShape(c) => Some(&c.object_id),
            _ => None,
        }
    }

    /// Identifiers this command requires to exist already.
    pub fn referenced_object_ids(&self) -> Vec<&str> {
        match self {
            LayoutCommand::CreateSlide(_) => Vec::new(),
            LayoutCommand::CreateImage(c) => vec![c.element_properties.page_object_id.as_str()],
            LayoutCommand::CreateShape(c) => vec![c.element_properties.page_object_id.as_str()],
            LayoutCommand::InsertText(c) => vec![c.object_id.as_str()],
            LayoutCommand::UpdateTextStyle(c) => vec![c.object_id.as_str()],
        }
    }
}

fn element(slide_id: &str, width: f64, height: f64, left: f64, top: f64) -> ElementProperties {
    ElementProperties {
        page_object_id: slide_id.to_string(),
        size: Size {
            width: pt(width),
            height: pt(height),
        },
        transform: Transform {
            scale_x: 1.0,
            scale_y: 1.0,
            translate_x: left,
            translate_y: top,
            unit: "PT",
        },
    }
}

fn text_box(object_id: String, slide_id: &str, width: f64, height: f64, left: f64, top: f64) -> LayoutCommand {
    LayoutCommand::CreateShape(CreateShape {
        object_id,
        shape_type: "TEXT_BOX",
        element_properties: element(slide_id, width, height, left, top),
    })
}

fn insert_text(object_id: String, text: &str) -> LayoutCommand {
    LayoutCommand::InsertText(InsertText {
        object_id,
        insertion_index: 0,
        text: text.to_string(),
    })
}

fn text_style(object_id: String, font_pt: f64, bold: bool) -> LayoutCommand {
    LayoutCommand::UpdateTextStyle(UpdateTextStyle {
        object_id,
        style: TextStyle {
            font_size: pt(font_pt),
            bold,
        },
        text_range: TextRange { range_type: "ALL" },
        fields: "fontSize,bold",
    })
}

/// Projects the slide records onto one flat command list, ready to submit
/// as a single batchUpdate.
pub fn project_deck(records: &[SlideRecord], offset: DescriptionOffset) -> Vec<LayoutCommand> {
    let mut commands = Vec::with_capacity(records.len() * 12);
    for (index, record) in records.iter().enumerate() {
        push_slide(&mut commands, record, index + 1, offset);
    }
    commands
}

fn push_slide(
    commands: &mut Vec<LayoutCommand>,
    record: &SlideRecord,
    ordinal: usize,
    offset: DescriptionOffset,
) {
    let slide_id = format!("slide_{ordinal}");

    commands.push(LayoutCommand::CreateSlide(CreateSlide {
        object_id: slide_id.clone(),
        slide_layout_reference: LayoutReference {
            predefined_layout: "BLANK",
        },
    }));

    commands.push(LayoutCommand::CreateImage(CreateImage {
        object_id: format!("bg_{ordinal}"),
        url: BACKGROUND_IMAGE_URL,
        element_properties: element(&slide_id, PAGE_WIDTH_PT, PAGE_HEIGHT_PT, 0.0, 0.0),
    }));

    commands.push(LayoutCommand::CreateImage(CreateImage {
        object_id: format!("logo_{ordinal}"),
        url: LOGO_IMAGE_URL,
        element_properties: element(
            &slide_id,
            LOGO_WIDTH_PT,
            LOGO_HEIGHT_PT,
            LOGO_LEFT_PT,
            LOGO_TOP_PT,
        ),
    }));

    let footer_id = format!("footer_{ordinal}");
    commands.push(text_box(
        footer_id.clone(),
        &slide_id,
        FOOTER_WIDTH_PT,
        FOOTER_HEIGHT_PT,
        FOOTER_LEFT_PT,
        FOOTER_TOP_PT,
    ));
    commands.push(insert_text(footer_id.clone(), FOOTER_TEXT));
    commands.push(text_style(footer_id, FOOTER_FONT_PT, false));

    let title_id = format!("title_{ordinal}");
    commands.push(text_box(
        title_id.clone(),
        &slide_id,
        BODY_WIDTH_PT,
        TITLE_HEIGHT_PT,
        BODY_LEFT_PT,
        TITLE_TOP_PT,
    ));
    commands.push(insert_text(title_id.clone(), &record.title));
    commands.push(text_style(title_id, TITLE_FONT_PT, true));

    let description_id = format!("desc_{ordinal}");
    commands.push(text_box(
        description_id.clone(),
        &slide_id,
        BODY_WIDTH_PT,
        DESCRIPTION_HEIGHT_PT,
        BODY_LEFT_PT,
        offset.top_pt(),
    ));
    // The API rejects empty insertions, so a slide without body text keeps
    // an empty box.
    if !record.description.is_empty() {
        commands.push(insert_text(description_id.clone(), &record.description));
        commands.push(text_style(description_id, DESCRIPTION_FONT_PT, false));
    }
}
