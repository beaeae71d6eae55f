//! PageStore — one `<title>.txt` file per page under a fixed data directory
//!
//! Writes go to a uniquely named sibling temp file which is renamed over the
//! target, so a reader sees either the previous body or the new one.
//! Concurrent saves to the same title are last-writer-wins.

use super::{is_valid_title, Page};
use crate::error::PageError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const PAGE_EXTENSION: &str = "txt";

#[cfg(unix)]
const PAGE_FILE_MODE: u32 = 0o600;

pub struct PageStore {
    data_dir: PathBuf,
}

impl PageStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Create the data directory if it doesn't exist yet
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    /// Map a title to its file path (e.g. "FrontPage" -> "<data_dir>/FrontPage.txt")
    pub fn page_path(&self, title: &str) -> Result<PathBuf, PageError> {
        if !is_valid_title(title) {
            return Err(PageError::InvalidTitle(title.to_string()));
        }
        Ok(self
            .data_dir
            .join(format!("{}.{}", title, PAGE_EXTENSION)))
    }

    /// Read a page by title
    pub fn load(&self, title: &str) -> Result<Page, PageError> {
        let path = self.page_path(title)?;
        match fs::read(&path) {
            Ok(body) => Ok(Page::new(title, body)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(PageError::NotFound(title.to_string()))
            }
            Err(e) => Err(PageError::Io(e)),
        }
    }

    /// Write a page, fully replacing any previous body
    pub fn save(&self, page: &Page) -> Result<(), PageError> {
        let path = self.page_path(&page.title)?;

        // Dropping the temp file on any error path removes it
        let tmp = write_private(&self.data_dir, &page.title, &page.body)?;
        tmp.persist(&path).map_err(|e| PageError::Io(e.error))?;

        Ok(())
    }

    /// True if a page with this title has been saved
    pub fn exists(&self, title: &str) -> bool {
        self.page_path(title)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }
}

/// Write bytes to a fresh temp file in `dir`, readable and writable by the owner only
fn write_private(dir: &Path, title: &str, contents: &[u8]) -> io::Result<NamedTempFile> {
    let mut tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", title))
        .suffix(".tmp")
        .tempfile_in(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(PAGE_FILE_MODE))?;
    }

    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    Ok(tmp)
}
