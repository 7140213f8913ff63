//! src/view/components/overlays.rs
//! Floating layers drawn over the page: the slide-in mobile menu and the
//! transient error banners appended to the document body.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};
use tracing::trace;

use crate::controller::terminal_input::Focusable;
use crate::view::dom::{Document, REGION_ATTR};
use crate::view::markup::MENU_PANEL_OFFSCREEN;
use crate::view::theme::Palette;

const BANNER_HEIGHT: u16 = 3;
const BANNER_MAX_WIDTH: u16 = 56;
const MENU_WIDTH: u16 = 28;

pub struct MenuOverlay;

impl MenuOverlay {
    /// Whether the panel has slid in. The backdrop alone draws nothing.
    pub fn is_open(doc: &Document) -> bool {
        doc.is_displayed("mobile-menu")
            && doc
                .get("mobile-menu-panel")
                .is_some_and(|panel| !panel.has_class(MENU_PANEL_OFFSCREEN))
    }

    pub fn render(
        frame: &mut Frame<'_>,
        screen: Rect,
        doc: &Document,
        focus: Option<&Focusable>,
        palette: &Palette,
    ) {
        if !Self::is_open(doc) {
            return;
        }
        let width = MENU_WIDTH.min(screen.width);
        let area = Rect {
            x: screen.x + screen.width - width,
            y: screen.y,
            width,
            height: screen.height,
        };

        let lines: Vec<Line<'static>> = doc
            .elements()
            .filter(|el| el.attr_value(REGION_ATTR) == Some("mobile-menu"))
            .filter(|el| matches!(el.tag(), "a" | "button"))
            .map(|el| {
                let focused = matches!(focus, Some(Focusable::Element(f)) if f == el.id());
                let base = if el.tag() == "a" {
                    palette.link()
                } else {
                    Style::default().fg(palette.muted)
                };
                let style = if focused { base.patch(palette.focused()) } else { base };
                Line::from(Span::styled(format!(" {} ", el.text_value()), style))
            })
            .collect();
        trace!(entries = lines.len(), "menu overlay");

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).style(palette.base()).block(
                Block::default()
                    .borders(Borders::LEFT)
                    .border_style(palette.border())
                    .title(" Menu "),
            ),
            area,
        );
    }
}

pub struct BannerOverlay;

impl BannerOverlay {
    /// Stacks body banners down the top-right corner, oldest first.
    pub fn render(frame: &mut Frame<'_>, screen: Rect, doc: &Document, palette: &Palette) {
        let mut y = screen.y + 1;
        for node in doc.body_nodes() {
            if y + BANNER_HEIGHT > screen.y + screen.height {
                break;
            }
            let text = node.text_content();
            let wanted = u16::try_from(text.chars().count() + 4).unwrap_or(u16::MAX);
            let width = wanted.min(BANNER_MAX_WIDTH).min(screen.width);
            let area = Rect {
                x: screen.x + screen.width - width,
                y,
                width,
                height: BANNER_HEIGHT,
            };

            frame.render_widget(Clear, area);
            frame.render_widget(
                Paragraph::new(text)
                    .style(palette.banner())
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
            y += BANNER_HEIGHT;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::Page;
    use crate::view::dom::Element;
    use crate::view::markup::page_document;

    #[test]
    fn menu_opens_once_the_panel_slides_in() {
        let mut doc = page_document(&Page::Home);
        assert!(!MenuOverlay::is_open(&doc));

        doc.update("mobile-menu", Element::show);
        assert!(!MenuOverlay::is_open(&doc));

        doc.update("mobile-menu-panel", |panel| panel.remove_class(MENU_PANEL_OFFSCREEN));
        assert!(MenuOverlay::is_open(&doc));
    }
}
