//! In-memory catalog: the full book list plus the currently filtered view.

use std::sync::Arc;

use tracing::debug;

use crate::model::book::{Book, BookId};
use crate::search::engine::{self, CategoryFilter};

/// Which filter produced the current view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewFilter {
    #[default]
    Unfiltered,
    Text(String),
    Category(CategoryFilter),
}

/// Full catalog (immutable once it holds records) and the filtered view
/// over it.
#[derive(Debug, Default)]
pub struct CatalogStore {
    books: Arc<[Book]>,
    view: Vec<usize>,
    filter: ViewFilter,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the catalog and resets the view to the full list. Returns
    /// `false` and changes nothing if the store already holds records; an
    /// empty catalog may be replaced.
    pub fn populate(&mut self, books: Vec<Book>) -> bool {
        if self.is_populated() {
            debug!("catalog already populated, ignoring {} records", books.len());
            return false;
        }
        self.view = (0..books.len()).collect();
        self.books = books.into();
        self.filter = ViewFilter::Unfiltered;
        debug!("catalog populated with {} books", self.books.len());
        true
    }

    /// Whether records are held. An empty resource leaves the store
    /// unpopulated, so the next load fetches again.
    #[inline]
    pub fn is_populated(&self) -> bool {
        !self.books.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Shared handle to the immutable catalog.
    pub fn shared(&self) -> Arc<[Book]> {
        Arc::clone(&self.books)
    }

    pub fn find(&self, id: BookId) -> Option<&Book> {
        engine::find_book(&self.books, id)
    }

    pub fn filter(&self) -> &ViewFilter {
        &self.filter
    }

    /// Books currently eligible for display, in catalog order.
    pub fn filtered(&self) -> impl ExactSizeIterator<Item = &Book> + '_ {
        self.view.iter().map(|&idx| &self.books[idx])
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    pub fn filtered_ids(&self) -> Vec<BookId> {
        self.filtered().map(|book| book.id).collect()
    }

    pub fn apply_text_search(&mut self, query: &str) {
        self.view = engine::text_search(&self.books, query);
        self.filter = match engine::normalize_query(query) {
            Some(_) => ViewFilter::Text(query.to_string()),
            None => ViewFilter::Unfiltered,
        };
        debug!(query, matches = self.view.len(), "text search applied");
    }

    pub fn apply_category(&mut self, filter: CategoryFilter) {
        self.view = engine::filter_by_category(&self.books, &filter);
        debug!(?filter, matches = self.view.len(), "category filter applied");
        self.filter = ViewFilter::Category(filter);
    }

    /// Back to the unfiltered full list, as a freshly loaded page sees it.
    pub fn reset_view(&mut self) {
        self.view = (0..self.books.len()).collect();
        self.filter = ViewFilter::Unfiltered;
    }

    pub fn related_to(&self, current: &Book, limit: usize) -> Vec<&Book> {
        engine::related_books(&self.books, current, limit)
    }

    pub fn count_in(&self, category: &str) -> usize {
        self.books.iter().filter(|b| b.category == category).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn books() -> Vec<Book> {
        serde_json::from_str(
            r#"[
            {"id":1,"title":"Rust in Action","author":"Tim McNamara","category":"Technology",
             "description":"Systems programming","price":"$39.99","rating":4.5},
            {"id":2,"title":"Atomic Habits","author":"James Clear","category":"Self-Help",
             "description":"Build good habits","price":"$12.99","rating":5},
            {"id":3,"title":"Clean Code","author":"Robert Martin","category":"Technology",
             "description":"Craftsmanship","price":"$29.99","rating":4}
        ]"#,
        )
        .expect("fixture")
    }

    #[test]
    fn populates_only_once() {
        let mut store = CatalogStore::new();
        assert!(!store.is_populated());

        assert!(store.populate(books()));
        assert!(!store.populate(Vec::new()));

        assert_eq!(store.len(), 3);
        assert_eq!(store.filtered_len(), 3);
    }

    #[test]
    fn empty_catalog_can_be_replaced() {
        let mut store = CatalogStore::new();

        assert!(store.populate(Vec::new()));
        assert!(!store.is_populated());

        assert!(store.populate(books()));
        assert_eq!(store.filtered_len(), 3);
    }

    #[test]
    fn filters_replace_each_other() {
        let mut store = CatalogStore::new();
        store.populate(books());

        store.apply_text_search("habits");
        assert_eq!(store.filtered_ids(), vec![BookId(2)]);

        store.apply_category(CategoryFilter::parse("Technology"));
        assert_eq!(store.filtered_ids(), vec![BookId(1), BookId(3)]);
        assert_eq!(
            store.filter(),
            &ViewFilter::Category(CategoryFilter::Only("Technology".into()))
        );

        store.apply_category(CategoryFilter::All);
        assert_eq!(store.filtered_ids(), vec![BookId(1), BookId(2), BookId(3)]);
    }

    #[test]
    fn blank_search_is_unfiltered() {
        let mut store = CatalogStore::new();
        store.populate(books());
        store.apply_text_search("clean");
        store.apply_text_search("  ");

        assert_eq!(store.filter(), &ViewFilter::Unfiltered);
        assert_eq!(store.filtered_len(), 3);
    }

    #[test]
    fn reset_view_restores_full_list() {
        let mut store = CatalogStore::new();
        store.populate(books());
        store.apply_category(CategoryFilter::parse("Self-Help"));
        store.reset_view();

        assert_eq!(store.filter(), &ViewFilter::Unfiltered);
        assert_eq!(store.filtered_ids(), vec![BookId(1), BookId(2), BookId(3)]);
    }

    #[test]
    fn lookup_and_counts() {
        let mut store = CatalogStore::new();
        store.populate(books());

        assert_eq!(store.find(BookId(3)).map(|b| b.title.as_str()), Some("Clean Code"));
        assert!(store.find(BookId(999)).is_none());
        assert_eq!(store.count_in("Technology"), 2);
        assert_eq!(store.count_in("Arts"), 0);
    }
}
