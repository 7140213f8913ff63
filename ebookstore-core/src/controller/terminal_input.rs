//! src/controller/terminal_input.rs
//! ============================================================================
//! # Terminal keyboard → storefront actions
//!
//! The terminal has no pointer, so interaction goes through a focus ring over
//! the on-screen controls and cards. `Tab`/`BackTab` (or `Up`/`Down`) move the
//! focus, `Enter` activates it, and typing edits a focused field.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{debug, trace};

use crate::controller::actions::{Action, Key};
use crate::model::location::Location;
use crate::view::dom::{Document, Element, ElementId};

/// Pixels one terminal row stands for when scrolling.
pub const LINE_PX: u32 = 20;
const PAGE_ROWS: u32 = 10;

/// Containers whose child nodes are book cards.
pub const CARD_CONTAINERS: [&str; 3] = ["books-grid", "category-books-grid", "related-books"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Focusable {
    Element(ElementId),
    Card { container: ElementId, index: usize },
}

fn is_control(el: &Element) -> bool {
    matches!(el.tag(), "input" | "textarea" | "button" | "a") || el.has_class("category-card")
}

fn is_text_field(el: &Element) -> bool {
    matches!(el.tag(), "input" | "textarea")
}

/// Focus ring of `doc`: controls in document order, cards at their
/// container's position.
pub fn focusables(doc: &Document) -> Vec<Focusable> {
    let mut ring = Vec::new();
    for el in doc.elements() {
        if !doc.is_displayed(el.id()) {
            continue;
        }
        if CARD_CONTAINERS.contains(&el.id()) {
            ring.extend(
                el.children()
                    .iter()
                    .enumerate()
                    .filter(|(_, node)| node.has_class("book-card"))
                    .map(|(index, _)| Focusable::Card {
                        container: el.id().into(),
                        index,
                    }),
            );
        } else if is_control(el) && !el.is_disabled() {
            ring.push(Focusable::Element(el.id().into()));
        }
    }
    ring
}

/// Maps crossterm events to [`Action`]s and tracks keyboard focus.
#[derive(Debug, Default)]
pub struct TerminalInput {
    focus: usize,
    /// Bumped whenever the focus moves, so the owner knows to redraw.
    moves: u64,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first control; called after every page load.
    pub fn reset(&mut self) {
        self.focus = 0;
        self.moves += 1;
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// The focused item, if the page has any.
    pub fn focused(&self, doc: &Document) -> Option<Focusable> {
        let ring = focusables(doc);
        if ring.is_empty() {
            return None;
        }
        ring.get(self.focus.min(ring.len() - 1)).cloned()
    }

    fn step(&mut self, doc: &Document, forward: bool) {
        let len = focusables(doc).len();
        if len == 0 {
            return;
        }
        let current = self.focus.min(len - 1);
        self.focus = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.moves += 1;
        trace!(focus = self.focus, "focus moved");
    }

    /// Moves focus to the first of `ids` that is on screen.
    fn focus_first_of(&mut self, doc: &Document, ids: &[&str]) -> bool {
        let ring = focusables(doc);
        let found = ids.iter().find_map(|id| {
            ring.iter()
                .position(|f| matches!(f, Focusable::Element(e) if e == id))
        });
        if let Some(index) = found {
            self.focus = index;
            self.moves += 1;
        }
        found.is_some()
    }

    pub fn map_event(&mut self, event: &Event, doc: &Document) -> Option<Action> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => self.map_key(key, doc),
            _ => None,
        }
    }

    fn map_key(&mut self, key: &KeyEvent, doc: &Document) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        let focused = self.focused(doc);
        let field = match &focused {
            Some(Focusable::Element(id)) => doc.get(id).filter(|el| is_text_field(el)),
            _ => None,
        };

        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.step(doc, true);
                None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.step(doc, false);
                None
            }
            KeyCode::Esc => Some(Action::KeyDown(Key::Escape)),
            KeyCode::F(1) => Some(Action::Navigate(Location::new("index.html"))),
            KeyCode::F(2) => Some(Action::Navigate(Location::new("categories.html"))),
            KeyCode::F(3) => Some(Action::Navigate(Location::new("contact.html"))),
            KeyCode::F(4) => Some(Action::click("mobile-menu-button")),
            KeyCode::PageDown => Some(Action::Scroll {
                offset: doc.scroll_y() + PAGE_ROWS * LINE_PX,
            }),
            KeyCode::PageUp => Some(Action::Scroll {
                offset: doc.scroll_y().saturating_sub(PAGE_ROWS * LINE_PX),
            }),
            KeyCode::Home if field.is_none() => Some(Action::Scroll { offset: 0 }),
            KeyCode::Enter => match (field, focused) {
                (Some(el), _) if el.tag() == "textarea" => {
                    Some(Action::input(el.id(), format!("{}\n", el.value())))
                }
                (Some(el), _) => Some(Action::key_press(el.id(), Key::Enter)),
                (None, Some(Focusable::Element(id))) => Some(Action::click(&id)),
                (None, Some(Focusable::Card { container, index })) => {
                    card_target(doc, &container, index)
                }
                (None, None) => None,
            },
            KeyCode::Backspace => field.map(|el| {
                let mut value = el.value().to_string();
                value.pop();
                Action::input(el.id(), value)
            }),
            KeyCode::Char(c) => match field {
                Some(el) => Some(Action::input(el.id(), format!("{}{c}", el.value()))),
                None => match c {
                    'q' => Some(Action::Quit),
                    '/' => {
                        self.focus_first_of(
                            doc,
                            &["search-input", "category-search", "error-search"],
                        );
                        None
                    }
                    other => Some(Action::KeyDown(Key::Char(other))),
                },
            },
            _ => None,
        }
    }
}

/// A card opens its "view details" link.
fn card_target(doc: &Document, container: &str, index: usize) -> Option<Action> {
    let card = doc.get(container)?.children().get(index)?;
    let href = card.find_class("view-details")?.get_attr("data-href")?;
    match Location::parse(href) {
        Ok(location) => Some(Action::Navigate(location)),
        Err(e) => {
            debug!("card link {href} ignored: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::Page;
    use crate::view::dom::{Fragment, Node};
    use crate::view::markup::page_document;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn with_cards(mut doc: Document) -> Document {
        let card = |id: u64| {
            Node::new("div").class("book-card").child(
                Node::new("button")
                    .class("view-details")
                    .attr("data-href", format!("book-details.html?id={id}")),
            )
        };
        doc.update("books-grid", |grid| {
            grid.replace_children([card(1), card(2)].into_iter().collect::<Fragment>())
        });
        doc
    }

    #[test]
    fn ring_skips_hidden_regions() {
        let doc = page_document(&Page::Home);
        let ring = focusables(&doc);
        assert!(ring.contains(&Focusable::Element("search-input".into())));
        assert!(!ring.contains(&Focusable::Element("menu-link-home".into())));
    }

    #[test]
    fn cards_join_the_ring_and_open_details() {
        let doc = with_cards(page_document(&Page::Home));
        let mut input = TerminalInput::new();
        let cards = focusables(&doc)
            .iter()
            .position(|f| matches!(f, Focusable::Card { index: 1, .. }))
            .expect("second card");
        input.focus = cards;

        match input.map_event(&press(KeyCode::Enter), &doc) {
            Some(Action::Navigate(location)) => assert_eq!(location.param("id"), Some("2")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut doc = page_document(&Page::Home);
        doc.update("search-input", |el| el.set_value("rus"));
        let mut input = TerminalInput::new();
        assert!(input.focus_first_of(&doc, &["search-input"]));

        match input.map_event(&press(KeyCode::Char('t')), &doc) {
            Some(Action::Input { target, value }) => {
                assert_eq!(target, "search-input");
                assert_eq!(value, "rust");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            input.map_event(&press(KeyCode::Enter), &doc),
            Some(Action::KeyPress { key: Key::Enter, .. })
        ));
    }

    #[test]
    fn q_quits_only_outside_fields() {
        let doc = page_document(&Page::Contact);
        let mut input = TerminalInput::new();
        assert!(input.focus_first_of(&doc, &["submit-btn"]));
        assert!(matches!(
            input.map_event(&press(KeyCode::Char('q')), &doc),
            Some(Action::Quit)
        ));

        assert!(input.focus_first_of(&doc, &["contact-name"]));
        assert!(matches!(
            input.map_event(&press(KeyCode::Char('q')), &doc),
            Some(Action::Input { .. })
        ));
    }

    #[test]
    fn tab_wraps_around() {
        let doc = page_document(&Page::Other("404".into()));
        let mut input = TerminalInput::new();
        let len = focusables(&doc).len();
        for _ in 0..len {
            input.map_event(&press(KeyCode::Tab), &doc);
        }
        assert_eq!(input.focus, 0);
        input.map_event(&press(KeyCode::BackTab), &doc);
        assert_eq!(input.focus, len - 1);
    }
}
