//! src/error.rs
//! ============================================================================
//! # `AppError`: Unified Error Type for the Storefront
//!
//! Every library module returns `Result<T, AppError>`. Variants carry enough
//! context for the log file; [`AppError::user_message`] maps them onto the
//! short banner text a shopper actually sees.

use std::{io, path::PathBuf};
use thiserror::Error;

/// Unified error type for all storefront operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// The static catalog resource could not be read (non-success response).
    #[error("Catalog resource {path} unavailable: {reason}")]
    CatalogUnavailable { path: String, reason: String },

    /// The catalog resource was read but is not a valid book list.
    #[error("Catalog parse error: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// TOML config parsing error.
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// TOML config serialization error.
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Config or storage file I/O error with path.
    #[error("Failed to access {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Synthetic failure of a simulated form submission.
    #[error("Submission of '{form}' failed: {reason}")]
    SubmissionFailed { form: String, reason: String },

    /// A book file could not be delivered to the downloads directory.
    #[error("Download of '{title}' failed: {reason}")]
    DownloadFailed { title: String, reason: String },

    /// Navigation target could not be interpreted.
    #[error("Invalid location '{0}'")]
    InvalidLocation(String),

    /// Any other error, with description.
    #[error("Unexpected error: {0}")]
    Other(String),
}

impl AppError {
    pub fn catalog_unavailable<S1: Into<String>, S2: Into<String>>(path: S1, reason: S2) -> Self {
        Self::CatalogUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn file_access<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    pub fn submission_failed<S1: Into<String>, S2: Into<String>>(form: S1, reason: S2) -> Self {
        Self::SubmissionFailed {
            form: form.into(),
            reason: reason.into(),
        }
    }

    pub fn download_failed<S1: Into<String>, S2: Into<String>>(title: S1, reason: S2) -> Self {
        Self::DownloadFailed {
            title: title.into(),
            reason: reason.into(),
        }
    }

    /// Banner text for the shopper. Load failures leave the page usable, so
    /// the wording never suggests a fatal state.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable { .. } | Self::CatalogParse(_) => {
                "Failed to load books. Please try again later."
            }
            Self::SubmissionFailed { .. } => {
                "Sorry, your message could not be sent. Please try again."
            }
            Self::DownloadFailed { .. } => "Download failed. Please try again.",
            _ => "Failed to load application. Please refresh the page.",
        }
    }

    /// Whether this error belongs to the catalog-load category.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, Self::CatalogUnavailable { .. } | Self::CatalogParse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_failures_share_one_banner() {
        let unavailable = AppError::catalog_unavailable("data/ebooks.json", "status 404");
        let parse = AppError::CatalogParse(
            serde_json::from_str::<Vec<u8>>("{").expect_err("invalid json"),
        );

        assert!(unavailable.is_load_failure());
        assert!(parse.is_load_failure());
        assert_eq!(unavailable.user_message(), parse.user_message());
    }
    #[test]
    fn other_failures_keep_their_own_banner() {
        let download = AppError::download_failed("Deep Work", "no such file");
        let location = AppError::InvalidLocation("::".into());

        assert!(!download.is_load_failure());
        assert!(!location.is_load_failure());
        assert_eq!(download.user_message(), "Download failed. Please try again.");
        assert_eq!(
            location.user_message(),
            "Failed to load application. Please refresh the page."
        );
        assert_eq!(location.to_string(), "Invalid location '::'");
    }
}
