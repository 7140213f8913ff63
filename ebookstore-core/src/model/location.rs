//! Navigation targets: a page path plus its query parameters.

use std::fmt;

use indexmap::IndexMap;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::error::AppError;
use crate::model::book::BookId;

/// Characters left alone by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Storefront pages with page-specific behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Home,
    Categories,
    Details,
    Contact,
    /// Any other page (about, 404, ...); only shared widgets run there.
    Other(String),
}

impl Page {
    /// Page name from a path: last segment without `.html`, `index` when empty.
    pub fn from_path(path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or_default();
        let name = file.strip_suffix(".html").unwrap_or(file);
        match name {
            "" | "index" => Self::Home,
            "categories" => Self::Categories,
            "ebook-details" => Self::Details,
            "contact" => Self::Contact,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Home => "index",
            Self::Categories => "categories",
            Self::Details => "ebook-details",
            Self::Contact => "contact",
            Self::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: IndexMap<String, String>,
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: IndexMap::new(),
        }
    }

    /// Parses `path?key=value&...`; a `#fragment` is dropped.
    pub fn parse(href: &str) -> Result<Self, AppError> {
        let href = href.trim();
        let href = href.split('#').next().unwrap_or_default();
        let (path, raw_query) = match href.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (href, None),
        };
        if path.contains(char::is_whitespace) {
            return Err(AppError::InvalidLocation(href.to_string()));
        }

        let mut location = Self::new(path);
        for pair in raw_query.unwrap_or_default().split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            // first occurrence wins, as URLSearchParams.get does
            location
                .query
                .entry(decode_component(key))
                .or_insert_with(|| decode_component(value));
        }
        Ok(location)
    }

    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn page(&self) -> Page {
        Page::from_path(&self.path)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// The `search` parameter when present and non-empty.
    pub fn search_query(&self) -> Option<&str> {
        self.param("search").filter(|q| !q.is_empty())
    }

    /// The `id` parameter as a book id. Mirrors `parseInt` leniency: leading
    /// digits are used, anything without them (or zero) selects nothing.
    pub fn book_id(&self) -> Option<BookId> {
        self.param("id").and_then(parse_leading_id)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        for (i, (key, value)) in self.query.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// `encodeURIComponent` equivalent.
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

fn parse_leading_id(raw: &str) -> Option<BookId> {
    let digits: String = raw
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => None,
        Ok(id) => Some(BookId(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_from_paths() {
        assert_eq!(Page::from_path(""), Page::Home);
        assert_eq!(Page::from_path("/shop/index.html"), Page::Home);
        assert_eq!(Page::from_path("ebook-details.html"), Page::Details);
        assert_eq!(Page::from_path("categories"), Page::Categories);
        assert_eq!(Page::from_path("404.html"), Page::Other("404".into()));
    }

    #[test]
    fn parses_query_parameters() {
        let loc = Location::parse("index.html?search=deep%20work&x=1&search=ignored").expect("ok");

        assert_eq!(loc.page(), Page::Home);
        assert_eq!(loc.search_query(), Some("deep work"));
        assert_eq!(loc.param("x"), Some("1"));
    }

    #[test]
    fn empty_search_is_absent() {
        let loc = Location::parse("index.html?search=").expect("ok");
        assert_eq!(loc.search_query(), None);
    }

    #[test]
    fn id_parsing_is_lenient_like_parse_int() {
        let id = |href: &str| Location::parse(href).expect("ok").book_id();

        assert_eq!(id("ebook-details.html?id=42"), Some(BookId(42)));
        assert_eq!(id("ebook-details.html?id=7abc"), Some(BookId(7)));
        assert_eq!(id("ebook-details.html?id=0"), None);
        assert_eq!(id("ebook-details.html?id=abc"), None);
        assert_eq!(id("ebook-details.html"), None);
    }

    #[test]
    fn display_encodes_like_encode_uri_component() {
        let loc = Location::new("index.html").with_param("search", "C++ & Rust (2nd ed.)");
        assert_eq!(
            loc.to_string(),
            "index.html?search=C%2B%2B%20%26%20Rust%20(2nd%20ed.)"
        );
        let back = Location::parse(&loc.to_string()).expect("ok");
        assert_eq!(back.search_query(), Some("C++ & Rust (2nd ed.)"));
    }

    #[test]
    fn whitespace_in_path_is_rejected() {
        assert!(matches!(
            Location::parse("bad page.html"),
            Err(AppError::InvalidLocation(_))
        ));
    }
}
