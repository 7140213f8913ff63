//! src/view/ui.rs
//! ============================================================
//! Frame renderer that draws the storefront from the current
//! document. Redraws are skipped while neither the document nor
//! the keyboard focus has changed.

use std::time::{Duration, Instant};

use ratatui::{prelude::*, widgets::Paragraph};
use tracing::{instrument, trace, warn};

use crate::controller::storefront::Storefront;
use crate::controller::terminal_input::Focusable;
use crate::view::components::{
    overlays::{BannerOverlay, MenuOverlay},
    page_view::PageView,
    status_bar::StatusBar,
};
use crate::view::theme::{self, Palette};

/// ---------------------------------------------------------------------------
/// Renderer struct (contains only caches + stats)
/// ---------------------------------------------------------------------------
pub struct UIRenderer {
    stats: RenderStats,
    /// (document revision, focus moves, screen) of the last frame drawn
    drawn: Option<(u64, u64, Rect)>,
}

#[derive(Debug, Default)]
pub struct RenderStats {
    pub frames: u64,
    pub skips: u64,
    pub slow: u64,
    pub total: Duration,
}

impl UIRenderer {
    pub fn new() -> Self {
        Self {
            stats: RenderStats::default(),
            drawn: None,
        }
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Whether anything visible changed since the last frame.
    pub fn needs_redraw(&self, revision: u64, focus_moves: u64, screen: Rect) -> bool {
        self.drawn != Some((revision, focus_moves, screen))
    }

    /// Records a redraw that was skipped by the caller.
    pub fn skip(&mut self) {
        self.stats.skips += 1;
    }

    /// Forces the next frame to draw (terminal resize, theme change).
    pub fn invalidate(&mut self) {
        self.drawn = None;
    }

    #[instrument(level = "trace", skip_all)]
    pub fn render(
        &mut self,
        f: &mut Frame<'_>,
        store: &Storefront,
        focus: Option<&Focusable>,
        focus_moves: u64,
    ) {
        let start = Instant::now();
        let screen = f.area();
        let palette = theme::palette(store.theme());
        let doc = store.document();

        let [header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(screen);

        self.draw_header(f, store, &palette, header);
        PageView::new(doc, focus, palette).render(f, body, store.page().name());
        StatusBar::new().render(f, store, &palette, status);
        self.draw_overlays(f, store, focus, &palette, screen);

        // perf
        let dur = start.elapsed();
        self.stats.total += dur;
        if dur.as_millis() > 16 {
            self.stats.slow += 1;
            warn!("Slow render: {}ms (target: <16ms)", dur.as_millis());
        }
        self.stats.frames += 1;
        self.drawn = Some((doc.revision(), focus_moves, screen));
        trace!(frame = self.stats.frames, "frame drawn");
    }

    fn draw_header(&self, f: &mut Frame<'_>, store: &Storefront, palette: &Palette, area: Rect) {
        let title = store.document().title();
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" eBookStore ", palette.heading()),
                Span::styled(format!("· {title}"), palette.muted()),
            ]))
            .style(palette.base()),
            area,
        );
    }

    fn draw_overlays(
        &self,
        f: &mut Frame<'_>,
        store: &Storefront,
        focus: Option<&Focusable>,
        palette: &Palette,
        screen: Rect,
    ) {
        let doc = store.document();
        MenuOverlay::render(f, screen, doc, focus, palette);
        BannerOverlay::render(f, screen, doc, palette);
    }
}

impl Default for UIRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// ---------------------------------------------------------------------------
/// stats helpers
/// ---------------------------------------------------------------------------
impl RenderStats {
    pub fn fps(&self) -> f64 {
        if self.frames > 0 && !self.total.is_zero() {
            self.frames as f64 / self.total.as_secs_f64()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_frames_are_skipped() {
        let mut r = UIRenderer::new();
        let screen = Rect::new(0, 0, 100, 40);
        assert!(r.needs_redraw(1, 0, screen));

        r.drawn = Some((1, 0, screen));
        assert!(!r.needs_redraw(1, 0, screen));
        assert!(r.needs_redraw(2, 0, screen));
        assert!(r.needs_redraw(1, 1, screen));
        assert!(r.needs_redraw(1, 0, Rect::new(0, 0, 80, 24)));

        r.invalidate();
        assert!(r.needs_redraw(1, 0, screen));
    }

    #[test]
    fn fps_without_frames_is_zero() {
        assert_eq!(RenderStats::default().fps(), 0.0);
    }
}
