//! Rich text fields
//!
//! Prismic stores formatted text as an array of blocks, each carrying its
//! plain text plus character-indexed spans. Conversion to plain text and to
//! HTML goes through [`RichTextRenderer`] so callers can inject their own.

mod html;

use serde::{Deserialize, Serialize};

pub use html::render_html;

/// Structured text: an ordered list of blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText(pub Vec<Block>);

impl RichText {
    pub fn blocks(&self) -> &[Block] {
        &self.0
    }
}

/// A single rich text block (paragraph, heading, list item, image, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type; empty is treated as a paragraph
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image source for `image` blocks
    #[serde(default)]
    pub url: Option<String>,

    /// Image alt text
    #[serde(default)]
    pub alt: Option<String>,

    /// Provider payload for `embed` blocks
    #[serde(default)]
    pub oembed: Option<Embed>,
}

impl Block {
    /// A paragraph block with no formatting
    pub fn paragraph(text: &str) -> Self {
        Self {
            kind: "paragraph".to_string(),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

/// Inline formatting over a character range of a block's text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Option<SpanData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// A text field that the repository may model as key text or rich text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextField {
    Plain(String),
    Rich(RichText),
}

impl Default for TextField {
    fn default() -> Self {
        TextField::Plain(String::new())
    }
}

/// Converts rich text into display strings
pub trait RichTextRenderer: Send + Sync {
    /// Plain-text reduction, used for titles, subtitles and authors
    fn as_text(&self, text: &RichText) -> String;

    /// HTML markup, used for post bodies
    fn as_html(&self, text: &RichText) -> String;

    /// Plain text of a field that may be key text or rich text
    fn field_text(&self, field: Option<&TextField>) -> String {
        match field {
            Some(TextField::Plain(s)) => s.clone(),
            Some(TextField::Rich(rt)) => self.as_text(rt),
            None => String::new(),
        }
    }
}

/// Default renderer following Prismic's serialization rules
#[derive(Debug, Clone, Default)]
pub struct PrismicRichText;

impl RichTextRenderer for PrismicRichText {
    fn as_text(&self, text: &RichText) -> String {
        text.blocks()
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn as_html(&self, text: &RichText) -> String {
        render_html(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_text_joins_blocks() {
        let rt = RichText(vec![Block::paragraph("Hello"), Block::paragraph("World")]);
        assert_eq!(PrismicRichText.as_text(&rt), "Hello World");
    }

    #[test]
    fn test_field_text_accepts_both_shapes() {
        let plain: TextField = serde_json::from_str(r#""Joseph Oliveira""#).unwrap();
        let rich: TextField =
            serde_json::from_str(r#"[{"type":"heading1","text":"Hello","spans":[]}]"#).unwrap();
        let renderer = PrismicRichText;
        assert_eq!(renderer.field_text(Some(&plain)), "Joseph Oliveira");
        assert_eq!(renderer.field_text(Some(&rich)), "Hello");
        assert_eq!(renderer.field_text(None), "");
    }

    #[test]
    fn test_block_without_type_or_text() {
        let rt: RichText = serde_json::from_str(r#"[{"text":"C D E"},{"type":"image"}]"#).unwrap();
        assert_eq!(rt.blocks()[0].kind, "");
        assert_eq!(rt.blocks()[1].text(), "");
    }
}
