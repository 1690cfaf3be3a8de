//! Inline highlight directive used in editable copy.
//!
//! Admin-entered strings may wrap a span in `[highlight]` / `[/highlight]`.
//! Everything else renders verbatim.

pub const HIGHLIGHT_OPEN: &str = "[highlight]";
pub const HIGHLIGHT_CLOSE: &str = "[/highlight]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

impl<'a> TextSpan<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            TextSpan::Plain(s) | TextSpan::Highlight(s) => s,
        }
    }
}

/// Split `input` into plain and highlighted spans. An opener without a
/// matching closer is kept as literal text.
pub fn format_text(input: &str) -> Vec<TextSpan<'_>> {
    let mut spans = Vec::new();
    let mut rest = input;

    while let Some(open) = rest.find(HIGHLIGHT_OPEN) {
        let inner_start = open + HIGHLIGHT_OPEN.len();
        let Some(close) = rest[inner_start..].find(HIGHLIGHT_CLOSE) else {
            break;
        };
        if open > 0 {
            spans.push(TextSpan::Plain(&rest[..open]));
        }
        let inner = &rest[inner_start..inner_start + close];
        if !inner.is_empty() {
            spans.push(TextSpan::Highlight(inner));
        }
        rest = &rest[inner_start + close + HIGHLIGHT_CLOSE.len()..];
    }

    if !rest.is_empty() {
        spans.push(TextSpan::Plain(rest));
    }
    spans
}

/// Plain text with the directives removed, for list previews and terminals.
pub fn format_text_for_preview(input: &str) -> String {
    format_text(input).iter().map(TextSpan::text).collect()
}

pub fn to_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for span in format_text(input) {
        match span {
            TextSpan::Plain(text) => escape_into(&mut out, text),
            TextSpan::Highlight(text) => {
                out.push_str("<span class=\"highlight\">");
                escape_into(&mut out, text);
                out.push_str("</span>");
            }
        }
    }
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
