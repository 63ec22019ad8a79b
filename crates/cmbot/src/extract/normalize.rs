//! Flattens a raw email body into lowercase plain text for pattern matching.

use scraper::{Html, Node};

/// Quoted-printable escapes that show up inside the meeting banners.
const QP_ESCAPES: [(&str, &str); 2] = [("=22", "\""), ("=46", "F")];

/// Normalizes an email body: undoes quoted-printable wrapping, drops quoting
/// artifacts, strips HTML markup, collapses whitespace runs (line breaks
/// included) to one space and lower-cases the result.
///
/// Never fails; text without any of these artifacts passes through lower-cased.
pub fn normalize_email_text(raw: &str) -> String {
    // Soft line breaks
    let mut text = raw.replace("=\r\n", "").replace("=\n", "");

    for (escape, literal) in QP_ESCAPES {
        text = text.replace(escape, literal);
    }

    // Quote continuations from forwarded/replied fragments
    let text = text
        .replace("\r\n>", " ")
        .replace("\n>", " ")
        .replace('\r', "");

    // split_whitespace also covers the NBSP left by `&nbsp;`
    visible_text(&text)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Returns the text content of an HTML document, skipping script and style blocks.
fn visible_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut out = String::with_capacity(html.len());

    for node in document.tree.nodes() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|parent| parent.value().as_element().map(|el| el.name()))
            .is_some_and(|name| matches!(name, "script" | "style"));
        if !hidden {
            out.push_str(text);
        }
    }

    out
}
