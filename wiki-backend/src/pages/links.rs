//! Inter-page links: `[Word]` in page text becomes a link to `/view/Word`.
//!
//! Rewriting runs on already-escaped text, so the only markup in the output
//! is the anchors added here.

use maud::{html, Markup, PreEscaped};
use regex::{Captures, Regex};
use std::sync::LazyLock;

// Open bracket, one or more ASCII letters, close bracket
static BRACKET_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([a-zA-Z]+)\]").unwrap());
static LETTER_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]+").unwrap());

/// HTML-escape a raw page body for display
pub fn escape_body(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    html! { (&*text) }.into_string()
}

/// Replace every `[Word]` in escaped text with an anchor to that page
pub fn rewrite_links(escaped: &str) -> String {
    BRACKET_LINK_RE
        .replace_all(escaped, |caps: &Captures| {
            let matched = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
            // First letters-only run inside the match; empty if there is none
            let label = LETTER_RUN_RE
                .find(matched)
                .map(|m| m.as_str())
                .unwrap_or_default();
            format!("<a href=\"/view/{}\">{}</a>", label, label)
        })
        .into_owned()
}

/// Escape a raw body and link its `[Word]` references
pub fn display_body(body: &[u8]) -> Markup {
    PreEscaped(rewrite_links(&escape_body(body)))
}
