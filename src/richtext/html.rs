//! Rich text to HTML serialization

use super::{Block, RichText, Span};
use crate::helpers::html_escape;

/// Render a rich text field as HTML
///
/// Consecutive `list-item` / `o-list-item` blocks are grouped into a single
/// `<ul>` / `<ol>`. All block text is escaped; embed HTML is passed through.
pub fn render_html(text: &RichText) -> String {
    let mut out = String::new();
    let mut open_list: Option<&'static str> = None;

    for block in text.blocks() {
        let list_tag = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };

        if open_list != list_tag {
            if let Some(tag) = open_list {
                out.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list_tag {
                out.push_str(&format!("<{}>", tag));
            }
            open_list = list_tag;
        }

        out.push_str(&render_block(block));
    }

    if let Some(tag) = open_list {
        out.push_str(&format!("</{}>", tag));
    }

    out
}

fn render_block(block: &Block) -> String {
    let inner = || render_spans(block.text(), &block.spans);

    match block.kind.as_str() {
        "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
            let level = &block.kind["heading".len()..];
            format!("<h{}>{}</h{}>", level, inner(), level)
        }
        "preformatted" => format!("<pre>{}</pre>", inner()),
        "list-item" | "o-list-item" => format!("<li>{}</li>", inner()),
        "image" => {
            let src = block.url.as_deref().unwrap_or("");
            let alt = block.alt.as_deref().unwrap_or("");
            format!(
                r#"<p class="block-img"><img src="{}" alt="{}" /></p>"#,
                html_escape(src),
                html_escape(alt)
            )
        }
        "embed" => {
            let embed = block.oembed.clone().unwrap_or_default();
            format!(
                r#"<div data-oembed="{}" data-oembed-type="{}">{}</div>"#,
                html_escape(embed.embed_url.as_deref().unwrap_or("")),
                html_escape(embed.kind.as_deref().unwrap_or("")),
                embed.html.unwrap_or_default()
            )
        }
        "paragraph" | "" => format!("<p>{}</p>", inner()),
        other => {
            tracing::debug!("Unknown rich text block type {:?}, rendering as paragraph", other);
            format!("<p>{}</p>", inner())
        }
    }
}

/// Apply spans to a block's text
///
/// Span offsets count UTF-16 code units, as the API writes them. Overlapping
/// spans that do not nest are closed and reopened so the output stays
/// well-formed.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let units = text.encode_utf16().count();

    let mut sorted: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < units && open_tag(s).is_some())
        .collect();
    sorted.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<&Span> = Vec::new();
    let mut next = 0;
    // UTF-16 offset of chars[i]
    let mut pos = 0;

    for i in 0..=chars.len() {
        if stack.iter().any(|s| s.end <= pos) {
            let mut reopen = Vec::new();
            while let Some(span) = stack.pop() {
                out.push_str(close_tag(span));
                if span.end > pos {
                    reopen.push(span);
                }
                if !stack.iter().any(|s| s.end <= pos) {
                    break;
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&open_tag(span).unwrap_or_default());
                stack.push(span);
            }
        }

        while next < sorted.len() && sorted[next].start <= pos {
            let span = sorted[next];
            out.push_str(&open_tag(span).unwrap_or_default());
            stack.push(span);
            next += 1;
        }

        if let Some(&c) = chars.get(i) {
            push_escaped(&mut out, c);
            pos += c.len_utf16();
        }
    }

    while let Some(span) = stack.pop() {
        out.push_str(close_tag(span));
    }

    out
}

fn open_tag(span: &Span) -> Option<String> {
    match span.kind.as_str() {
        "strong" => Some("<strong>".to_string()),
        "em" => Some("<em>".to_string()),
        "hyperlink" => {
            let data = span.data.clone().unwrap_or_default();
            let href = html_escape(data.url.as_deref().unwrap_or("#"));
            Some(match data.target {
                Some(target) => format!(
                    r#"<a href="{}" target="{}" rel="noopener">"#,
                    href,
                    html_escape(&target)
                ),
                None => format!(r#"<a href="{}">"#, href),
            })
        }
        _ => None,
    }
}

fn close_tag(span: &Span) -> &'static str {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        _ => "</a>",
    }
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        '\n' => out.push_str("<br />"),
        _ => out.push(c),
    }
}
