//! src/view/markup.rs
//! ============================================================================
//! # Page skeletons
//!
//! Static markup for each storefront page: the ids and class hooks the
//! controllers bind to. Everything dynamic (cards, counts, detail fields) is
//! filled in later by the controllers.

use crate::model::location::Page;
use crate::search::engine::{self, ALL_CATEGORIES};
use crate::view::dom::{Display, Document, Element, REGION_ATTR};

/// Categories the storefront advertises in its filters and category cards.
pub const STORE_CATEGORIES: [&str; 7] = [
    "Technology",
    "Business",
    "Arts",
    "Health",
    "Finance",
    "Self-Help",
    "Lifestyle",
];

/// Classes marking the active category filter.
pub const FILTER_ACTIVE: &str = "bg-primary-200 dark:bg-primary-800";

pub const MENU_PANEL_OFFSCREEN: &str = "translate-x-full";
pub const BACK_TO_TOP_HIDDEN: &str = "translate-y-16 opacity-0";
pub const BACK_TO_TOP_SHOWN: &str = "translate-y-0 opacity-100";
pub const NEWSLETTER_IDLE: &str = "btn-primary";
pub const NEWSLETTER_DONE: &str = "bg-green-600 hover:bg-green-700";

pub const DOWNLOAD_LABEL: &str = "Download PDF";
pub const CONTACT_SUBMIT_LABEL: &str = "Send Message";
pub const NEWSLETTER_SUBMIT_LABEL: &str = "Subscribe";

const FAQS: [(&str, &str); 4] = [
    (
        "What formats are the e-books available in?",
        "Every title is delivered as a DRM-free PDF.",
    ),
    (
        "How do I download my purchase?",
        "Open the book's detail page and use the download button.",
    ),
    (
        "Can I read on multiple devices?",
        "Yes, downloaded files can be copied to any of your devices.",
    ),
    (
        "Do you offer refunds?",
        "Contact us within 30 days of purchase and we will help.",
    ),
];

/// Lowercase, dash-separated form of a category name for element ids.
pub fn slug(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect()
}

/// Builds the skeleton document for `page`.
pub fn page_document(page: &Page) -> Document {
    let doc = match page {
        Page::Home => home(),
        Page::Categories => categories(),
        Page::Details => details(),
        Page::Contact => contact(),
        Page::Other(name) if name == "404" => not_found(),
        Page::Other(name) => Document::new(format!("{name} - eBookStore")),
    };
    chrome(doc)
}

/// Navigation, overlays and the footer newsletter form shared by every page.
fn chrome(doc: Document) -> Document {
    doc.with(Element::new("mobile-menu-button", "button").text("Menu"))
        .with(Element::new("mobile-menu", "div").class("fixed inset-0").hidden())
        .with(in_menu(Element::new("mobile-menu-panel", "div").class(MENU_PANEL_OFFSCREEN)))
        .with(in_menu(Element::new("mobile-menu-close", "button").text("Close")))
        .with(in_menu(Element::new("menu-link-home", "a").attr("href", "index.html").text("Home")))
        .with(in_menu(
            Element::new("menu-link-categories", "a")
                .attr("href", "categories.html")
                .text("Categories"),
        ))
        .with(in_menu(
            Element::new("menu-link-contact", "a")
                .attr("href", "contact.html")
                .text("Contact"),
        ))
        .with(Element::new("theme-toggle", "button").text("Theme"))
        .with(Element::new("back-to-top", "button").class(BACK_TO_TOP_HIDDEN).text("Top"))
        .with(Element::new("newsletter-form", "form"))
        .with(
            Element::new("newsletter-email", "input")
                .attr("type", "email")
                .attr("placeholder", "Enter your email")
                .attr("form", "newsletter-form"),
        )
        .with(
            Element::new("newsletter-submit", "button")
                .class(NEWSLETTER_IDLE)
                .attr("type", "submit")
                .attr("form", "newsletter-form")
                .text(NEWSLETTER_SUBMIT_LABEL),
        )
}

fn in_menu(el: Element) -> Element {
    el.attr(REGION_ATTR, "mobile-menu")
}

fn home() -> Document {
    let mut doc = Document::new("eBookStore - Your Digital Library")
        .with(
            Element::new("browse-link", "a")
                .attr("href", "#books-grid")
                .text("Browse Books"),
        )
        .with(
            Element::new("search-input", "input")
                .attr("type", "search")
                .attr("placeholder", "Search books, authors, categories..."),
        )
        .with(
            Element::new("filter-all", "button")
                .class("category-filter")
                .class(FILTER_ACTIVE)
                .attr("data-category", ALL_CATEGORIES)
                .text("All"),
        );

    for name in STORE_CATEGORIES {
        let slug = slug(name);
        doc.insert(
            Element::new(&format!("filter-{slug}"), "button")
                .class("category-filter")
                .attr("data-category", name)
                .text(name),
        );
        doc.insert(
            Element::new(&format!("filter-count-{slug}"), "span")
                .class("category-count")
                .attr("data-category", name)
                .text("0"),
        );
    }

    doc.with(Element::new("loading-state", "div").hidden().text("Loading books..."))
        .with(Element::new("books-grid", "div").class("grid"))
        .with(
            Element::new("no-results", "div")
                .hidden()
                .text("No books found. Try a different search."),
        )
}

fn categories() -> Document {
    let mut doc = Document::new("Categories - eBookStore")
        .with(
            Element::new("category-search", "input")
                .attr("type", "search")
                .attr("placeholder", "Search categories..."),
        )
        .with(
            Element::new("category-grid", "div")
                .class("grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-8"),
        );

    for name in STORE_CATEGORIES {
        let slug = slug(name);
        doc.insert(
            Element::new(&format!("category-card-{slug}"), "div")
                .class("category-card")
                .attr("data-category", name)
                .attr("data-title", name)
                .attr("data-description", engine::category_description(name)),
        );
        doc.insert(
            Element::new(&format!("category-count-{slug}"), "span")
                .class("category-count")
                .attr("data-category", name)
                .text("0"),
        );
    }

    let section = |id: &str, tag: &str| Element::new(id, tag).attr(REGION_ATTR, "category-books");
    doc.with(Element::new("category-books", "section").hidden())
        .with(section("category-title", "h2"))
        .with(section("category-description", "p"))
        .with(section("show-all-categories", "button").text("All Categories"))
        .with(section("category-books-grid", "div").class("grid"))
        .with(
            section("no-books-message", "div")
                .hidden()
                .text("No books available in this category yet."),
        )
}

fn details() -> Document {
    let field = |id: &str, tag: &str| Element::new(id, tag).attr(REGION_ATTR, "book-details");
    Document::new("Book Details - eBookStore")
        .with(Element::new("loading-state", "div").text("Loading book details..."))
        .with(Element::new("book-details", "section").hidden())
        .with(
            Element::new("error-state", "div")
                .hidden()
                .text("Book not found. It may have been removed from the catalog."),
        )
        .with(field("breadcrumb-category", "span"))
        .with(field("breadcrumb-title", "span"))
        .with(field("book-cover", "img"))
        .with(field("book-title", "h1"))
        .with(field("book-author", "p"))
        .with(field("book-price", "span"))
        .with(field("book-category", "span"))
        .with(field("book-rating", "div").class("stars"))
        .with(field("book-pages", "span"))
        .with(field("book-year", "span"))
        .with(field("book-isbn", "span"))
        .with(field("book-description", "p"))
        .with(field("download-btn", "button").text(DOWNLOAD_LABEL))
        .with(field("related-books", "div").class("grid"))
}

fn contact() -> Document {
    let field = |id: &str, tag: &str, name: &str| {
        Element::new(id, tag)
            .attr("name", name)
            .attr("form", "contact-form")
    };

    let mut doc = Document::new("Contact Us - eBookStore")
        .with(Element::new("faq-link", "a").attr("href", "#faq").text("FAQ"))
        .with(Element::new("contact-form", "form"))
        .with(field("contact-name", "input", "name").attr("type", "text"))
        .with(
            field("contact-email", "input", "email")
                .attr("type", "email")
                .attr("placeholder", "you@example.com"),
        )
        .with(field("contact-subject", "input", "subject").attr("type", "text"))
        .with(field("contact-message", "textarea", "message"))
        .with(
            Element::new("submit-btn", "button")
                .attr("type", "submit")
                .attr("form", "contact-form")
                .text(CONTACT_SUBMIT_LABEL),
        )
        .with(
            Element::new("success-message", "div")
                .hidden()
                .text("Thank you! Your message has been sent."),
        )
        .with(
            Element::new("error-message", "div")
                .hidden()
                .text("Sorry, something went wrong. Please try again."),
        )
        .with(Element::new("faq", "section"));

    for (i, (question, answer)) in FAQS.iter().enumerate() {
        let answer_id = format!("faq-answer-{}", i + 1);
        doc.insert(
            Element::new(&format!("faq-toggle-{}", i + 1), "button")
                .class("faq-toggle")
                .attr("data-target", answer_id.as_str())
                .attr("data-icon-rotation", "rotate(0deg)")
                .text(*question),
        );
        doc.insert(Element::new(&answer_id, "div").hidden().text(*answer));
    }
    doc
}

fn not_found() -> Document {
    Document::new("Page Not Found - eBookStore").with(
        Element::new("error-search", "input")
            .attr("type", "search")
            .attr("placeholder", "Search for books..."),
    )
}

/// Whether the category grid is currently on screen.
pub fn grid_visible(doc: &Document) -> bool {
    doc.get("category-grid")
        .is_some_and(|grid| grid.display() != Some(Display::None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::dom::HIDDEN;

    #[test]
    fn slugs_are_id_safe() {
        assert_eq!(slug("Self-Help"), "self-help");
        assert_eq!(slug("Science Fiction"), "science-fiction");
    }

    #[test]
    fn every_page_has_shared_chrome() {
        for page in [
            Page::Home,
            Page::Categories,
            Page::Details,
            Page::Contact,
            Page::Other("about".into()),
        ] {
            let doc = page_document(&page);
            for id in ["mobile-menu-button", "mobile-menu", "back-to-top", "newsletter-form"] {
                assert!(doc.contains(id), "{id} missing on {}", page.name());
            }
        }
    }

    #[test]
    fn home_starts_with_all_filter_active() {
        let doc = page_document(&Page::Home);
        let filters = doc.ids_with_class("category-filter");
        assert_eq!(filters.len(), STORE_CATEGORIES.len() + 1);
        assert!(doc.get("filter-all").is_some_and(|e| e.has_class("bg-primary-200")));
        assert!(doc.get("no-results").is_some_and(|e| e.has_class(HIDDEN)));
    }

    #[test]
    fn details_page_starts_loading() {
        let doc = page_document(&Page::Details);
        assert!(!doc.get("loading-state").expect("loading").is_hidden());
        assert!(doc.get("book-details").expect("details").is_hidden());
    }

    #[test]
    fn faq_toggles_point_at_answers() {
        let doc = page_document(&Page::Contact);
        for id in doc.ids_with_class("faq-toggle") {
            let target = doc
                .get(&id)
                .and_then(|t| t.attr_value("data-target"))
                .expect("target");
            assert!(doc.get(target).is_some_and(|a| a.is_hidden()));
        }
    }

    #[test]
    fn detail_fields_wait_for_the_book() {
        let mut doc = page_document(&Page::Details);
        assert!(!doc.is_displayed("download-btn"));
        doc.update("book-details", Element::show);
        assert!(doc.is_displayed("download-btn"));
        assert!(!doc.is_displayed("menu-link-home"));
    }

    #[test]
    fn error_page_has_search_box() {
        assert!(page_document(&Page::Other("404".into())).contains("error-search"));
        assert!(grid_visible(&page_document(&Page::Categories)));
    }
}
