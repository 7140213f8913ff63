//! src/view/components/page_view.rs
//! ============================================================================
//! # Page body
//!
//! Lays the current [`Document`] out as terminal lines, one per visible
//! element in document order. Card containers expand to one row per card.
//! The mobile menu lives in an overlay and is skipped here.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tracing::trace;

use crate::controller::terminal_input::{Focusable, LINE_PX};
use crate::view::dom::{Document, Element, Node, REGION_ATTR};
use crate::view::markup::FILTER_ACTIVE;
use crate::view::theme::Palette;

const MENU: &str = "mobile-menu";

/// One laid-out row plus whether it holds the focused item.
struct Row {
    line: Line<'static>,
    focused: bool,
}

pub struct PageView<'a> {
    doc: &'a Document,
    focus: Option<&'a Focusable>,
    palette: Palette,
}

impl<'a> PageView<'a> {
    pub fn new(doc: &'a Document, focus: Option<&'a Focusable>, palette: Palette) -> Self {
        Self {
            doc,
            focus,
            palette,
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect, title: &str) {
        let rows = self.rows();
        let height = area.height.saturating_sub(2) as usize;
        let offset = viewport_offset(&rows, self.doc.scroll_y(), height);
        trace!(rows = rows.len(), offset, "page view laid out");

        let lines: Vec<Line<'static>> = rows.into_iter().map(|row| row.line).collect();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.palette.border())
            .title(format!(" {title} "));

        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .style(self.palette.base())
                .wrap(Wrap { trim: false })
                .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0)),
            area,
        );
    }

    fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        for el in self.doc.elements() {
            if !self.doc.is_displayed(el.id()) || is_menu_part(el) {
                continue;
            }
            if el.has_class("opacity-0") || el.has_class("category-count") {
                continue;
            }
            self.element_rows(el, &mut rows);
        }
        rows
    }

    fn is_focused(&self, id: &str) -> bool {
        matches!(self.focus, Some(Focusable::Element(f)) if f == id)
    }

    fn element_rows(&self, el: &Element, rows: &mut Vec<Row>) {
        let p = &self.palette;
        let focused = self.is_focused(el.id());

        if el.children().iter().any(|n| n.has_class("book-card")) {
            for (index, card) in el.children().iter().enumerate() {
                let focused = matches!(
                    self.focus,
                    Some(Focusable::Card { container, index: i }) if container == el.id() && *i == index
                );
                rows.push(Row {
                    line: self.card_line(card, focused),
                    focused,
                });
            }
            return;
        }

        let line = if el.children().iter().any(|n| n.has_class("star")) {
            Line::from(star_spans(el.children(), p))
        } else {
            match el.tag() {
                "input" | "textarea" => {
                    let label = el
                        .attr_value("placeholder")
                        .or_else(|| el.attr_value("name"))
                        .unwrap_or_else(|| el.id());
                    let cursor = if focused { "▏" } else { "" };
                    Line::from(vec![
                        Span::styled(format!("{label}: "), p.muted()),
                        Span::raw(format!("[{}{cursor}]", el.value())),
                    ])
                }
                "button" => {
                    let mut style = if el.is_disabled() {
                        p.muted()
                    } else {
                        Style::default().fg(p.accent)
                    };
                    if FILTER_ACTIVE.split_whitespace().all(|c| el.has_class(c)) {
                        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
                    }
                    let marker = self.faq_marker(el);
                    let count = self.count_for(el.id()).unwrap_or_default();
                    Line::from(Span::styled(
                        format!("{marker}[ {} ]{count}", el.text_value()),
                        style,
                    ))
                }
                "a" => Line::from(Span::styled(el.text_value().to_string(), p.link())),
                "img" => Line::from(Span::styled(
                    format!("[cover: {}]", el.attr_value("alt").unwrap_or("image")),
                    p.muted(),
                )),
                "h1" | "h2" | "h3" => {
                    Line::from(Span::styled(el.text_content(), p.heading()))
                }
                _ if el.has_class("category-card") => {
                    let title = el.attr_value("data-title").unwrap_or_default();
                    let description = el.attr_value("data-description").unwrap_or_default();
                    let count = self.count_for(el.id()).unwrap_or_default();
                    Line::from(vec![
                        Span::styled(format!("▸ {title}{count}"), p.heading()),
                        Span::styled(format!("  {description}"), p.muted()),
                    ])
                }
                _ => {
                    let text = el.text_content();
                    if text.is_empty() {
                        return;
                    }
                    let style = match el.id() {
                        "error-state" | "error-message" => Style::default().fg(p.error),
                        "success-message" => Style::default().fg(p.success),
                        "book-price" => Style::default().fg(p.price),
                        _ => Style::default(),
                    };
                    Line::from(Span::styled(text, style))
                }
            }
        };

        let line = if focused {
            line.patch_style(p.focused())
        } else {
            line
        };
        rows.push(Row { line, focused });
    }

    fn card_line(&self, card: &Node, focused: bool) -> Line<'static> {
        let p = &self.palette;
        let text = |class: &str| card.find_class(class).map(Node::text_content).unwrap_or_default();

        let mut spans = vec![
            Span::styled(text("card-title"), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  {}", text("card-author")), p.muted()),
            Span::styled(format!("  {}  ", text("card-price")), Style::default().fg(p.price)),
        ];
        if let Some(stars) = card.find_class("stars") {
            spans.extend(star_spans(&stars.children, p));
        }
        spans.push(Span::raw(format!(" {}", text("card-rating-value"))));

        let line = Line::from(spans);
        if focused { line.patch_style(p.focused()) } else { line }
    }

    /// `filter-x` and `category-card-x` show the count kept in their sibling
    /// count element.
    fn count_for(&self, id: &str) -> Option<String> {
        let count_id = if let Some(slug) = id.strip_prefix("filter-") {
            format!("filter-count-{slug}")
        } else {
            format!("category-count-{}", id.strip_prefix("category-card-")?)
        };
        self.doc
            .get(&count_id)
            .map(|count| format!(" ({})", count.text_value()))
    }

    fn faq_marker(&self, el: &Element) -> &'static str {
        if !el.has_class("faq-toggle") {
            return "";
        }
        let open = el
            .attr_value("data-target")
            .is_some_and(|target| self.doc.is_displayed(target));
        if open { "▾ " } else { "▸ " }
    }
}

fn is_menu_part(el: &Element) -> bool {
    el.id() == MENU || el.attr_value(REGION_ATTR) == Some(MENU)
}

fn star_spans(nodes: &[Node], p: &Palette) -> Vec<Span<'static>> {
    nodes
        .iter()
        .filter(|n| n.has_class("star"))
        .map(|n| {
            let glyph = if n.has_class("star-full") {
                "★"
            } else if n.has_class("star-half") {
                "◐"
            } else {
                "☆"
            };
            Span::styled(glyph, Style::default().fg(p.star))
        })
        .collect()
}

/// First row to show: the page's own scroll position, nudged so the focused
/// row stays inside the viewport.
fn viewport_offset(rows: &[Row], scroll_y: u32, height: usize) -> usize {
    let mut offset = (scroll_y / LINE_PX) as usize;
    if let Some(row) = rows.iter().position(|r| r.focused) {
        if row < offset {
            offset = row;
        } else if height > 0 && row >= offset + height {
            offset = row + 1 - height;
        }
    }
    offset.min(rows.len().saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::Page;
    use crate::view::markup::page_document;
    use crate::view::theme::LIGHT;

    fn rendered(doc: &Document, focus: Option<&Focusable>) -> Vec<String> {
        PageView::new(doc, focus, LIGHT)
            .rows()
            .into_iter()
            .map(|row| row.line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn filters_show_their_counts() {
        let mut doc = page_document(&Page::Home);
        doc.update("filter-count-arts", |el| el.set_text("4"));
        let lines = rendered(&doc, None);
        assert!(lines.iter().any(|l| l == "[ Arts ] (4)"));
        assert!(!lines.iter().any(|l| l.contains("Loading")));
    }

    #[test]
    fn menu_stays_out_of_the_page() {
        let mut doc = page_document(&Page::Home);
        doc.update("mobile-menu", Element::show);
        let lines = rendered(&doc, None);
        assert!(!lines.iter().any(|l| l.contains("Close")));
    }

    #[test]
    fn focus_keeps_its_row_on_screen() {
        let rows: Vec<Row> = (0..30)
            .map(|i| Row {
                line: Line::raw(i.to_string()),
                focused: i == 25,
            })
            .collect();
        assert_eq!(viewport_offset(&rows, 0, 10), 16);
        assert_eq!(viewport_offset(&rows, 40 * LINE_PX, 10), 25);
    }

    #[test]
    fn stars_become_glyphs() {
        let nodes = crate::view::card::render_stars(3.5);
        let glyphs: String = star_spans(&nodes, &LIGHT)
            .iter()
            .map(|s| s.content.as_ref())
            .collect();
        assert_eq!(glyphs, "★★★◐☆");
    }
}
