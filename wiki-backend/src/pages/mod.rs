//! Wiki pages: plain text files addressed by an alphanumeric title.
//!
//! The store owns the on-disk form; `Page` values are built per request and
//! dropped once the response is sent.

pub mod links;
pub mod store;

pub use store::PageStore;

use maud::{Markup, PreEscaped};

/// Title of the landing page `/` redirects to
pub const FRONT_PAGE: &str = "FrontPage";

/// A single wiki page
#[derive(Debug, Clone)]
pub struct Page {
    pub title: String,
    /// Raw bytes exactly as last saved
    pub body: Vec<u8>,
    /// Escaped and link-rewritten body, only filled in for the view template
    pub display_body: Markup,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            display_body: PreEscaped(String::new()),
        }
    }

    /// Placeholder used by the edit form when a page has never been saved
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body as text for the edit form (invalid UTF-8 is replaced, never persisted)
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Titles are one or more ASCII letters or digits
pub fn is_valid_title(title: &str) -> bool {
    !title.is_empty() && title.bytes().all(|b| b.is_ascii_alphanumeric())
}
