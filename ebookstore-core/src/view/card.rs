//! src/view/card.rs
//! ============================================================================
//! # Book cards
//!
//! Pure projection of a [`Book`] into a card subtree. Nothing here touches
//! the document; callers attach the returned [`Fragment`] in one operation.

use std::borrow::Cow;

use crate::model::book::Book;
use crate::view::dom::{Fragment, Node};

/// Placeholder image used when a cover fails to load.
pub const FALLBACK_COVER: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iMjAwIiBoZWlnaHQ9IjI1NiIgdmlld0JveD0iMCAwIDIwMCAyNTYiIGZpbGw9Im5vbmUiIHhtbG5zPSJodHRwOi8vd3d3LnczLm9yZy8yMDAwL3N2ZyI+CjxyZWN0IHdpZHRoPSIyMDAiIGhlaWdodD0iMjU2IiBmaWxsPSIjRjNGNEY2Ii8+Cjwvc3ZnPgo=";

/// Star slots in a rating row.
pub const STAR_SLOTS: i64 = 5;

/// Full / half / empty star split of a rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StarCounts {
    pub full: i64,
    pub half: bool,
    pub empty: i64,
}

impl StarCounts {
    /// `full = floor(r)`, a half star when `r mod 1 >= 0.5`, the rest empty.
    /// Ratings are not clamped: outside [0, 5] the counts stop summing to 5
    /// and negative counts render nothing.
    pub fn from_rating(rating: f64) -> Self {
        let full = rating.floor() as i64;
        let half = rating % 1.0 >= 0.5;
        Self {
            full,
            half,
            empty: STAR_SLOTS - full - i64::from(half),
        }
    }

    pub fn total(&self) -> i64 {
        self.full + i64::from(self.half) + self.empty
    }
}

fn star(kind: &str) -> Node {
    Node::new("svg").class("star").class(kind)
}

/// Star icons for `rating`, in display order.
pub fn render_stars(rating: f64) -> Vec<Node> {
    let counts = StarCounts::from_rating(rating);
    let full = usize::try_from(counts.full).unwrap_or(0);
    let empty = usize::try_from(counts.empty).unwrap_or(0);

    let mut stars = Vec::with_capacity(full + empty + 1);
    stars.extend(std::iter::repeat_with(|| star("star-full")).take(full));
    if counts.half {
        stars.push(star("star-half"));
    }
    stars.extend(std::iter::repeat_with(|| star("star-empty")).take(empty));
    stars
}

/// First `max` characters of `text`, with an ellipsis when cut.
pub fn truncate_chars(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => Cow::Owned(format!("{}…", text[..cut].trim_end())),
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardRenderer {
    preview_chars: usize,
}

impl CardRenderer {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    pub fn render(&self, book: &Book) -> Node {
        let media = Node::new("div")
            .class("card-media")
            .child(
                Node::new("img")
                    .class("card-cover")
                    .attr("src", book.cover.as_str())
                    .attr("alt", book.title.as_str())
                    .attr("loading", "lazy")
                    .attr("data-fallback-src", FALLBACK_COVER),
            )
            .child(Node::new("span").class("card-category").text(book.category.as_str()))
            .child(
                Node::new("div")
                    .class("card-rating")
                    .child(Node::new("div").class("stars").children(render_stars(book.rating)))
                    .child(Node::new("span").class("card-rating-value").text(book.rating.to_string())),
            );

        let footer = Node::new("div")
            .class("card-footer")
            .child(Node::new("span").class("card-price").text(book.price.as_str()))
            .child(Node::new("span").class("card-format").text("Digital Download"))
            .child(
                Node::new("button")
                    .class("view-details")
                    .attr("data-href", book.details_href())
                    .text("View Details"),
            );

        let body = Node::new("div")
            .class("card-body")
            .child(Node::new("h3").class("card-title").text(book.title.as_str()))
            .child(Node::new("p").class("card-author").text(format!("by {}", book.author)))
            .child(
                Node::new("p")
                    .class("card-description line-clamp-3")
                    .text(truncate_chars(&book.description, self.preview_chars)),
            )
            .child(footer);

        Node::new("div")
            .class("book-card")
            .attr("data-id", book.id.to_string())
            .child(media)
            .child(body)
    }

    /// Builds every card off-tree; the caller attaches the result once.
    pub fn render_all<'a, I>(&self, books: I) -> Fragment
    where
        I: IntoIterator<Item = &'a Book>,
    {
        books.into_iter().map(|book| self.render(book)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::book::BookId;
    use proptest::prelude::*;

    fn sample() -> Book {
        Book {
            id: BookId(12),
            title: "Deep Work".into(),
            author: "Cal Newport".into(),
            category: "Self-Help".into(),
            description: "Rules for focused success in a distracted world".into(),
            full_description: None,
            price: "$14.99".into(),
            rating: 4.5,
            cover: "assets/images/book12.jpg".into(),
            download_url: "downloads/deep-work.pdf".into(),
            pages: None,
            published_year: None,
            isbn: None,
        }
    }

    proptest! {
        #[test]
        fn stars_always_fill_five_slots(r in 0.0f64..=5.0) {
            let counts = StarCounts::from_rating(r);
            prop_assert_eq!(counts.total(), STAR_SLOTS);
            prop_assert_eq!(counts.half, r % 1.0 >= 0.5);
            prop_assert_eq!(render_stars(r).len(), 5);
        }
    }

    #[test]
    fn star_split_examples() {
        assert_eq!(
            StarCounts::from_rating(4.5),
            StarCounts { full: 4, half: true, empty: 0 }
        );
        assert_eq!(
            StarCounts::from_rating(3.2),
            StarCounts { full: 3, half: false, empty: 2 }
        );
        assert_eq!(
            StarCounts::from_rating(0.0),
            StarCounts { full: 0, half: false, empty: 5 }
        );
    }

    #[test]
    fn out_of_range_ratings_are_not_clamped() {
        let over = StarCounts::from_rating(6.0);
        assert_eq!(over.total(), 5);
        assert_eq!(over.empty, -1);
        assert_eq!(render_stars(6.0).len(), 6);

        let under = StarCounts::from_rating(-1.0);
        assert_eq!(under.full, -1);
        assert_eq!(render_stars(-1.0).len(), 6);
    }

    #[test]
    fn card_carries_every_field() {
        let card = CardRenderer::new(160).render(&sample());

        let text = |class: &str| card.find_class(class).map(|n| n.text.clone());
        assert_eq!(text("card-title").as_deref(), Some("Deep Work"));
        assert_eq!(text("card-author").as_deref(), Some("by Cal Newport"));
        assert_eq!(text("card-price").as_deref(), Some("$14.99"));
        assert_eq!(text("card-category").as_deref(), Some("Self-Help"));
        assert_eq!(text("card-rating-value").as_deref(), Some("4.5"));
        assert_eq!(card.count_class("star"), 5);

        let button = card.find_class("view-details").expect("details action");
        assert_eq!(button.get_attr("data-href"), Some("ebook-details.html?id=12"));

        let cover = card.find_class("card-cover").expect("cover");
        assert_eq!(cover.get_attr("data-fallback-src"), Some(FALLBACK_COVER));
    }

    #[test]
    fn long_descriptions_are_truncated() {
        let card = CardRenderer::new(10).render(&sample());
        let desc = card.find_class("card-description").expect("description");
        assert_eq!(desc.text, "Rules for…");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("café au lait", 4), "café…");
        assert_eq!(truncate_chars("short", 10), "short");
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        let mut book = sample();
        book.rating = 5.0;
        let card = CardRenderer::new(160).render(&book);
        let value = card.find_class("card-rating-value").expect("rating");
        assert_eq!(value.text, "5");
    }
}
