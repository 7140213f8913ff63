//! src/view/components/status_bar.rs - one-line status bar
//!
//! Left half: page, visible/total books and the theme. Right half: pending
//! timers, dispatched actions and the key hints.

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::controller::storefront::Storefront;
use crate::view::theme::Palette;

const KEY_HINTS: &str = "F1 Home  F2 Categories  F3 Contact  F4 Menu  Tab Focus  ^C Quit";

pub struct StatusBar;

impl StatusBar {
    pub fn new() -> Self {
        Self
    }

    pub fn left_text(store: &Storefront) -> String {
        let catalog = store.catalog();
        format!(
            "{} | {}/{} books | {}",
            store.location(),
            catalog.filtered_len(),
            catalog.len(),
            store.theme().as_str()
        )
    }

    pub fn right_text(store: &Storefront) -> String {
        format!(
            "Timers: {} | Actions: {} | {KEY_HINTS}",
            store.pending_tasks(),
            store.stats().actions
        )
    }

    pub fn render(&self, frame: &mut Frame<'_>, store: &Storefront, palette: &Palette, area: Rect) {
        let style = Style::default().fg(palette.background).bg(palette.accent);
        let layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        Paragraph::new(Self::left_text(store))
            .style(style)
            .alignment(Alignment::Left)
            .render(layout[0], frame.buffer_mut());

        Paragraph::new(Self::right_text(store))
            .style(style)
            .alignment(Alignment::Right)
            .render(layout[1], frame.buffer_mut());
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}
