//! src/loader/data_loader.rs
//! ============================================================================
//! # Catalog loading
//!
//! The catalog is fetched at most once per session from a static JSON
//! resource. [`CatalogSource`] abstracts where the bytes come from so the
//! storefront can read a site directory in production and a fixture in
//! tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::error::AppError;
use crate::model::book::Book;
use crate::model::catalog::CatalogStore;

/// Where catalog bytes are read from.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Reads the resource at `path`. Any failure is a load failure.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError>;

    /// Source identifier for logging
    fn name(&self) -> &'static str;
}

/// Static files under a site root directory.
#[derive(Debug, Clone)]
pub struct SiteSource {
    root: PathBuf,
}

impl SiteSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl CatalogSource for SiteSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        let full = self.root.join(path);
        tokio::fs::read(&full)
            .await
            .map_err(|e| AppError::catalog_unavailable(full.display().to_string(), e.to_string()))
    }

    fn name(&self) -> &'static str {
        "site"
    }
}

/// In-memory resource, or a resource that always fails.
#[derive(Debug, Clone)]
pub struct StaticSource {
    body: Result<Vec<u8>, String>,
    reads: Arc<AtomicUsize>,
}

impl StaticSource {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Ok(body.into()),
            reads: Arc::default(),
        }
    }

    /// A source answering every fetch with a non-success response.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            body: Err(reason.into()),
            reads: Arc::default(),
        }
    }

    /// Shared read counter, still readable after the source is moved.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, AppError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        self.body
            .clone()
            .map_err(|reason| AppError::catalog_unavailable(path, reason))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

/// What a [`DataLoader::load`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Fetched { books: usize },
    AlreadyLoaded,
}

pub struct DataLoader {
    source: Box<dyn CatalogSource>,
    path: String,
    fetches: u32,
}

impl DataLoader {
    pub fn new(source: Box<dyn CatalogSource>, path: impl Into<String>) -> Self {
        Self {
            source,
            path: path.into(),
            fetches: 0,
        }
    }

    /// Populates `store` from the source unless it already is. On failure
    /// the store is left untouched and the error is returned to the caller,
    /// which surfaces it to the user.
    #[instrument(level = "debug", skip_all, fields(source = self.source.name(), path = %self.path))]
    pub async fn load(&mut self, store: &mut CatalogStore) -> Result<LoadOutcome, AppError> {
        if store.is_populated() {
            debug!("catalog already loaded, skipping fetch");
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        self.fetches += 1;
        let bytes = self.source.fetch(&self.path).await?;
        let books: Vec<Book> = serde_json::from_slice(&bytes)?;
        let count = books.len();
        store.populate(books);

        info!("Loaded {} books from {}", count, self.path);
        Ok(LoadOutcome::Fetched { books: count })
    }

    /// Fetch attempts made so far, failed ones included.
    pub fn fetches(&self) -> u32 {
        self.fetches
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"id":1,"title":"Atomic Habits","author":"James Clear","category":"Self-Help",
         "description":"Habits","price":"$12.99","rating":4.5}
    ]"#;

    #[tokio::test]
    async fn fetches_once() {
        let source = StaticSource::new(CATALOG);
        let reads = source.reads();
        let mut loader = DataLoader::new(Box::new(source), "data/ebooks.json");
        let mut store = CatalogStore::new();

        assert_eq!(
            loader.load(&mut store).await.expect("load"),
            LoadOutcome::Fetched { books: 1 }
        );
        assert_eq!(
            loader.load(&mut store).await.expect("load"),
            LoadOutcome::AlreadyLoaded
        );
        assert_eq!(reads.load(Ordering::Relaxed), 1);
        assert_eq!(store.filtered_len(), 1);
    }

    #[tokio::test]
    async fn empty_resource_is_fetched_again() {
        let source = StaticSource::new("[]");
        let reads = source.reads();
        let mut loader = DataLoader::new(Box::new(source), "data/ebooks.json");
        let mut store = CatalogStore::new();

        assert_eq!(
            loader.load(&mut store).await.expect("load"),
            LoadOutcome::Fetched { books: 0 }
        );
        assert_eq!(
            loader.load(&mut store).await.expect("load"),
            LoadOutcome::Fetched { books: 0 }
        );
        assert_eq!(reads.load(Ordering::Relaxed), 2);
        assert_eq!(loader.fetches(), 2);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unavailable_resource_is_a_load_failure() {
        let mut loader = DataLoader::new(
            Box::new(StaticSource::unavailable("404 Not Found")),
            "data/ebooks.json",
        );
        let mut store = CatalogStore::new();

        let err = loader.load(&mut store).await.expect_err("must fail");
        assert!(err.is_load_failure());
        assert!(!store.is_populated());
    }

    #[tokio::test]
    async fn malformed_json_is_a_load_failure() {
        let mut loader = DataLoader::new(Box::new(StaticSource::new("{not json")), "x.json");
        let mut store = CatalogStore::new();

        let err = loader.load(&mut store).await.expect_err("must fail");
        assert!(matches!(err, AppError::CatalogParse(_)));
        assert_eq!(loader.fetches(), 1);
    }

    #[tokio::test]
    async fn reads_from_site_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        tokio::fs::create_dir_all(dir.path().join("data"))
            .await
            .expect("mkdir");
        tokio::fs::write(dir.path().join("data/ebooks.json"), CATALOG)
            .await
            .expect("write");

        let mut loader = DataLoader::new(Box::new(SiteSource::new(dir.path())), "data/ebooks.json");
        let mut store = CatalogStore::new();
        loader.load(&mut store).await.expect("load");

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_site_file_is_unavailable() {
        let dir = tempfile::tempdir().expect("tempdir");
        let source = SiteSource::new(dir.path());
        let err = source.fetch("data/ebooks.json").await.expect_err("missing");
        assert!(matches!(err, AppError::CatalogUnavailable { .. }));
    }
}
