//! Browser-style local storage and the theme preference kept in it.
//!
//! Storage is a flat JSON object of string values, read once at startup.
//! Nothing writes it back: theme switching is disabled in this build.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::AppError;

pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Default)]
pub struct LocalStorage {
    entries: IndexMap<String, String>,
    origin: Option<PathBuf>,
}

impl LocalStorage {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Reads the storage file. A missing file is an empty storage.
    pub async fn open(path: &Path) -> Result<Self, AppError> {
        let entries = match tokio::fs::read(path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no local storage at {}", path.display());
                IndexMap::new()
            }
            Err(e) => return Err(AppError::file_access(path, e)),
        };
        Ok(Self {
            entries,
            origin: Some(path.to_path_buf()),
        })
    }

    #[must_use]
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Stored preference, `light` when absent or unrecognised.
    pub fn from_storage(storage: &LocalStorage) -> Self {
        match storage.get(THEME_KEY) {
            Some("dark") => Self::Dark,
            _ => Self::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Theme switching is disabled; the current theme is kept.
    pub fn toggled(self) -> Self {
        info!("theme toggle disabled, keeping {}", self.as_str());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_defaults_to_light() {
        assert_eq!(Theme::from_storage(&LocalStorage::in_memory()), Theme::Light);
        let storage = LocalStorage::in_memory().with_item(THEME_KEY, "sepia");
        assert_eq!(Theme::from_storage(&storage), Theme::Light);
    }

    #[test]
    fn toggle_is_a_no_op() {
        assert_eq!(Theme::Dark.toggled(), Theme::Dark);
    }

    #[tokio::test]
    async fn reads_storage_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("local_storage.json");
        tokio::fs::write(&path, r#"{"theme":"dark","cart":"[]"}"#)
            .await
            .expect("write");

        let storage = LocalStorage::open(&path).await.expect("open");
        assert_eq!(Theme::from_storage(&storage), Theme::Dark);
        assert_eq!(storage.get("cart"), Some("[]"));
        assert_eq!(storage.origin(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let storage = LocalStorage::open(&dir.path().join("nope.json"))
            .await
            .expect("open");
        assert_eq!(storage.get(THEME_KEY), None);
    }
}
