//! Error types for the page store and the template layer

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid page title: {0:?}")]
    InvalidTitle(String),

    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

impl PageError {
    /// True when the page simply does not exist yet
    pub fn is_not_found(&self) -> bool {
        matches!(self, PageError::NotFound(_))
    }
}
