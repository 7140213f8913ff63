//! Pure filtering over the in-memory catalog.
//!
//! Every function returns positions into the catalog slice, in catalog order,
//! so a filtered view never copies book records.

use indexmap::IndexMap;

use crate::model::book::{Book, BookId};

/// Reserved category value meaning "every category".
pub const ALL_CATEGORIES: &str = "all";

/// Category filter derived from a filter control's `data-category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// `"all"` is the sentinel; any other value is an exact category name.
    pub fn parse(raw: &str) -> Self {
        if raw == ALL_CATEGORIES {
            Self::All
        } else {
            Self::Only(raw.to_string())
        }
    }

    pub fn admits(&self, book: &Book) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => book.category == *category,
        }
    }
}

/// Lowercased query, or `None` when it is blank and the view should reset.
pub fn normalize_query(query: &str) -> Option<String> {
    if query.trim().is_empty() {
        None
    } else {
        Some(query.to_lowercase())
    }
}

/// Case-insensitive substring search over title, author, category and
/// description. A blank query selects every book.
pub fn text_search(books: &[Book], query: &str) -> Vec<usize> {
    match normalize_query(query) {
        None => (0..books.len()).collect(),
        Some(needle) => books
            .iter()
            .enumerate()
            .filter(|(_, book)| book.matches_text(&needle))
            .map(|(idx, _)| idx)
            .collect(),
    }
}

pub fn filter_by_category(books: &[Book], filter: &CategoryFilter) -> Vec<usize> {
    books
        .iter()
        .enumerate()
        .filter(|(_, book)| filter.admits(book))
        .map(|(idx, _)| idx)
        .collect()
}

/// Up to `limit` books sharing `current`'s category, excluding `current`
/// itself, in catalog order.
pub fn related_books<'a>(books: &'a [Book], current: &Book, limit: usize) -> Vec<&'a Book> {
    books
        .iter()
        .filter(|book| book.category == current.category && book.id != current.id)
        .take(limit)
        .collect()
}

pub fn find_book(books: &[Book], id: BookId) -> Option<&Book> {
    books.iter().find(|book| book.id == id)
}

/// Number of books per category, keyed in first-seen order.
pub fn category_counts(books: &[Book]) -> IndexMap<&str, usize> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for book in books {
        *counts.entry(book.category.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Blurb shown above a category's drill-down listing.
pub fn category_description(category: &str) -> &'static str {
    match category {
        "Technology" => "Explore cutting-edge programming, AI, and web development resources",
        "Business" => "Master entrepreneurship, marketing, and business strategy",
        "Arts" => "Unleash your creativity with design, photography, and writing guides",
        "Health" => "Improve your wellbeing with fitness, nutrition, and lifestyle advice",
        "Finance" => "Build wealth with personal finance and investment strategies",
        "Self-Help" => "Transform your life with personal development resources",
        "Lifestyle" => "Live sustainably and create better life balance",
        _ => "Discover amazing books in this category",
    }
}

/// Category-card search on the categories page: the card stays visible when
/// the query occurs in its category key, heading or blurb.
pub fn category_card_matches(query: &str, category: &str, title: &str, description: &str) -> bool {
    let needle = query.to_lowercase();
    [category, title, description]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn book(id: u64, title: &str, category: &str) -> Book {
        Book {
            id: BookId(id),
            title: title.to_string(),
            author: format!("Author {id}"),
            category: category.to_string(),
            description: format!("About {title}"),
            full_description: None,
            price: "$9.99".to_string(),
            rating: 4.0,
            cover: String::new(),
            download_url: String::new(),
            pages: None,
            published_year: None,
            isbn: None,
        }
    }

    fn mixed_catalog() -> Vec<Book> {
        vec![
            book(1, "Rust in Action", "Technology"),
            book(2, "Atomic Habits", "Self-Help"),
            book(3, "The Psychology of Money", "Finance"),
            book(4, "Clean Code", "Technology"),
        ]
    }

    #[test]
    fn search_ignores_case() {
        let books = mixed_catalog();
        assert_eq!(text_search(&books, "Atomic"), text_search(&books, "atomic"));
        assert_eq!(text_search(&books, "ATOMIC"), vec![1]);
    }

    #[test]
    fn blank_query_resets_to_full_list() {
        let books = mixed_catalog();
        assert_eq!(text_search(&books, "   "), vec![0, 1, 2, 3]);
        assert_eq!(text_search(&books, ""), vec![0, 1, 2, 3]);
    }

    #[test]
    fn search_matches_author_and_category() {
        let books = mixed_catalog();
        assert_eq!(text_search(&books, "author 3"), vec![2]);
        assert_eq!(text_search(&books, "technology"), vec![0, 3]);
    }

    #[test]
    fn single_book_category_filter() {
        let books = vec![book(1, "Atomic Habits", "Self-Help")];

        assert_eq!(
            filter_by_category(&books, &CategoryFilter::parse("Self-Help")),
            vec![0]
        );
        assert!(filter_by_category(&books, &CategoryFilter::parse("Finance")).is_empty());
    }

    #[test]
    fn category_match_is_exact() {
        let books = mixed_catalog();
        assert!(filter_by_category(&books, &CategoryFilter::parse("technology")).is_empty());
    }

    #[test]
    fn all_sentinel_restores_order() {
        let books = mixed_catalog();
        let _narrowed = filter_by_category(&books, &CategoryFilter::parse("Finance"));
        assert_eq!(
            filter_by_category(&books, &CategoryFilter::parse(ALL_CATEGORIES)),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn related_books_capped_and_ordered() {
        let books: Vec<Book> = (1..=5)
            .map(|id| book(id, &format!("Tech {id}"), "Technology"))
            .chain(std::iter::once(book(6, "Money", "Finance")))
            .collect();
        let current = &books[2];

        let related: Vec<u64> = related_books(&books, current, 3)
            .iter()
            .map(|b| b.id.0)
            .collect();

        assert_eq!(related, vec![1, 2, 4]);
    }

    #[test]
    fn related_books_empty_for_lonely_category() {
        let books = mixed_catalog();
        assert!(related_books(&books, &books[2], 3).is_empty());
    }

    #[test]
    fn counts_follow_first_seen_order() {
        let books = mixed_catalog();
        let counts: Vec<(&str, usize)> = category_counts(&books).into_iter().collect();
        assert_eq!(
            counts,
            vec![("Technology", 2), ("Self-Help", 1), ("Finance", 1)]
        );
    }

    #[test]
    fn unmapped_category_gets_generic_blurb() {
        assert_eq!(
            category_description("Poetry"),
            "Discover amazing books in this category"
        );
        assert!(category_description("Finance").starts_with("Build wealth"));
    }

    #[test]
    fn category_cards_match_any_text() {
        assert!(category_card_matches("AI", "Technology", "Technology", "programming, AI"));
        assert!(category_card_matches("", "Arts", "Arts", ""));
        assert!(!category_card_matches("yoga", "Finance", "Finance", "wealth"));
    }
}
