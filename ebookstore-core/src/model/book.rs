//! Book records as they appear in the static catalog resource.
//!
//! Records are taken verbatim: nothing is validated or clamped, and `price`
//! stays the pre-formatted display string it was stored as.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique book identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u64);

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display-only metadata that catalogs store either as a number or a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DisplayValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 display drops a zero fraction: 2021.0 shows as 2021.
            Self::Number(n) if n.is_f64() => match n.as_f64() {
                Some(v) => write!(f, "{v}"),
                None => write!(f, "{n}"),
            },
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub category: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_description: Option<String>,
    pub price: String,
    pub rating: f64,
    #[serde(default)]
    pub cover: String,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub pages: Option<DisplayValue>,
    #[serde(default)]
    pub published_year: Option<DisplayValue>,
    #[serde(default)]
    pub isbn: Option<DisplayValue>,
}

impl Book {
    /// Long-form description for the detail page.
    pub fn detail_description(&self) -> &str {
        self.full_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.description)
    }

    /// Case-insensitive substring match against the searchable text fields.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        [&self.title, &self.author, &self.category, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    /// Relative location of this book's detail page.
    pub fn details_href(&self) -> String {
        format!("ebook-details.html?id={}", self.id)
    }
}

/// Renders optional display metadata, empty when absent.
pub fn display_or_empty(value: &Option<DisplayValue>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD: &str = r#"{
        "id": 7,
        "title": "Atomic Habits",
        "author": "James Clear",
        "category": "Self-Help",
        "description": "Tiny changes, remarkable results.",
        "price": "$12.99",
        "rating": 4.5,
        "cover": "assets/images/book7.jpg",
        "downloadUrl": "downloads/atomic-habits.pdf",
        "pages": 320,
        "publishedYear": "2018",
        "isbn": "978-0735211292"
    }"#;

    #[test]
    fn parses_camel_case_record() {
        let book: Book = serde_json::from_str(RECORD).expect("valid record");

        assert_eq!(book.id, BookId(7));
        assert_eq!(book.price, "$12.99");
        assert_eq!(book.download_url, "downloads/atomic-habits.pdf");
        assert_eq!(display_or_empty(&book.pages), "320");
        assert_eq!(display_or_empty(&book.published_year), "2018");
        assert!(book.full_description.is_none());
        assert_eq!(book.detail_description(), "Tiny changes, remarkable results.");
    }

    #[test]
    fn missing_optional_metadata_renders_empty() {
        let book: Book = serde_json::from_str(
            r#"{"id":1,"title":"T","author":"A","category":"C","description":"D",
                "price":"Free","rating":3}"#,
        )
        .expect("minimal record");

        assert_eq!(display_or_empty(&book.isbn), "");
        assert_eq!(book.cover, "");
        assert_eq!(book.details_href(), "ebook-details.html?id=1");
    }

    #[test]
    fn whole_floats_show_without_fraction() {
        let book: Book = serde_json::from_str(
            r#"{"id":2,"title":"T","author":"A","category":"C","description":"D",
                "price":"Free","rating":4,"pages":312.0,"publishedYear":2021.0,
                "isbn":9.5}"#,
        )
        .expect("float metadata");

        assert_eq!(display_or_empty(&book.pages), "312");
        assert_eq!(display_or_empty(&book.published_year), "2021");
        assert_eq!(display_or_empty(&book.isbn), "9.5");
    }

    #[test]
    fn text_match_covers_every_searchable_field() {
        let book: Book = serde_json::from_str(RECORD).expect("valid record");

        assert!(book.matches_text("atomic"));
        assert!(book.matches_text("clear"));
        assert!(book.matches_text("self-help"));
        assert!(book.matches_text("remarkable"));
        assert!(!book.matches_text("978"));
    }
}
