//! Book downloads: the file-save half of the download button.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::AppError;
use crate::model::book::Book;

/// A file download triggered for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Resource locator, relative to the site root
    pub href: String,
    /// Suggested file name
    pub filename: String,
}

impl DownloadRequest {
    pub fn for_book(book: &Book) -> Self {
        Self {
            href: book.download_url.clone(),
            filename: safe_filename(&book.title),
        }
    }
}

/// Title with every character outside `[A-Za-z0-9]` replaced by `_`, plus
/// `.pdf`.
pub fn safe_filename(title: &str) -> String {
    let mut name: String = title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    name.push_str(".pdf");
    name
}

#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Saves the resource and returns where it landed.
    async fn save(&self, request: &DownloadRequest) -> Result<PathBuf, AppError>;
}

/// Copies site files into a downloads directory.
#[derive(Debug, Clone)]
pub struct FsDownloadSink {
    site_root: PathBuf,
    target_dir: PathBuf,
}

impl FsDownloadSink {
    pub fn new(site_root: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            site_root: site_root.into(),
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }
}

#[async_trait]
impl DownloadSink for FsDownloadSink {
    async fn save(&self, request: &DownloadRequest) -> Result<PathBuf, AppError> {
        let fail = |reason: String| AppError::download_failed(request.filename.as_str(), reason);

        if request.href.is_empty() {
            return Err(fail("book has no download location".into()));
        }
        if request.href.starts_with("http://") || request.href.starts_with("https://") {
            return Err(fail(format!("remote download {} not supported", request.href)));
        }

        let source = self.site_root.join(request.href.trim_start_matches('/'));
        let dest = self.target_dir.join(&request.filename);
        debug!("copying {} to {}", source.display(), dest.display());

        tokio::fs::create_dir_all(&self.target_dir)
            .await
            .map_err(|e| fail(format!("{}: {e}", self.target_dir.display())))?;
        tokio::fs::copy(&source, &dest)
            .await
            .map_err(|e| fail(format!("{}: {e}", source.display())))?;

        info!("Downloaded {}", dest.display());
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_filesystem_safe() {
        assert_eq!(safe_filename("Atomic Habits"), "Atomic_Habits.pdf");
        assert_eq!(safe_filename("C++: The Guide (2nd ed.)"), "C____The_Guide__2nd_ed__.pdf");
        assert_eq!(safe_filename("Café"), "Caf_.pdf");
    }

    #[tokio::test]
    async fn copies_into_target_dir() {
        let site = tempfile::tempdir().expect("site");
        let out = tempfile::tempdir().expect("out");
        tokio::fs::create_dir_all(site.path().join("downloads"))
            .await
            .expect("mkdir");
        tokio::fs::write(site.path().join("downloads/book.pdf"), b"%PDF-1.7")
            .await
            .expect("write");

        let sink = FsDownloadSink::new(site.path(), out.path().join("books"));
        let saved = sink
            .save(&DownloadRequest {
                href: "downloads/book.pdf".into(),
                filename: "Atomic_Habits.pdf".into(),
            })
            .await
            .expect("saved");

        assert_eq!(saved, out.path().join("books/Atomic_Habits.pdf"));
        assert_eq!(tokio::fs::read(&saved).await.expect("read"), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn missing_or_remote_sources_fail() {
        let site = tempfile::tempdir().expect("site");
        let sink = FsDownloadSink::new(site.path(), site.path().join("out"));

        for href in ["downloads/missing.pdf", "https://cdn.example.com/a.pdf", ""] {
            let err = sink
                .save(&DownloadRequest {
                    href: href.into(),
                    filename: "a.pdf".into(),
                })
                .await
                .expect_err("must fail");
            assert!(matches!(err, AppError::DownloadFailed { .. }), "{href}");
        }
    }
}
