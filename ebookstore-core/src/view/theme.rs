//! src/view/theme.rs
//! ============================================================================
//! # Terminal color palettes
//!
//! One palette per stored theme preference. Light follows the storefront's
//! slate-on-white scheme, dark its slate-900 variant.

use ratatui::style::{Color, Modifier, Style};
use tracing::{debug, instrument};

use crate::model::preferences::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub price: Color,
    pub star: Color,
    pub error: Color,
    pub success: Color,
    pub focus: Color,
}

pub const LIGHT: Palette = Palette {
    background: Color::Rgb(248, 250, 252), // slate-50
    foreground: Color::Rgb(15, 23, 42),    // slate-900
    muted: Color::Rgb(100, 116, 139),      // slate-500
    accent: Color::Rgb(79, 70, 229),       // indigo-600
    price: Color::Rgb(147, 51, 234),       // purple-600
    star: Color::Rgb(250, 204, 21),        // yellow-400
    error: Color::Rgb(239, 68, 68),        // red-500
    success: Color::Rgb(22, 163, 74),      // green-600
    focus: Color::Rgb(199, 210, 254),      // indigo-200
};

pub const DARK: Palette = Palette {
    background: Color::Rgb(15, 23, 42),    // slate-900
    foreground: Color::Rgb(241, 245, 249), // slate-100
    muted: Color::Rgb(148, 163, 184),      // slate-400
    accent: Color::Rgb(129, 140, 248),     // indigo-400
    price: Color::Rgb(192, 132, 252),      // purple-400
    star: Color::Rgb(250, 204, 21),
    error: Color::Rgb(248, 113, 113),      // red-400
    success: Color::Rgb(74, 222, 128),     // green-400
    focus: Color::Rgb(55, 48, 163),        // indigo-800
};

#[instrument(level = "debug")]
pub fn palette(theme: Theme) -> Palette {
    debug!("using {} palette", theme.as_str());
    match theme {
        Theme::Light => LIGHT,
        Theme::Dark => DARK,
    }
}

impl Palette {
    pub fn base(&self) -> Style {
        Style::default().bg(self.background).fg(self.foreground)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn heading(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn focused(&self) -> Style {
        Style::default().bg(self.focus).add_modifier(Modifier::BOLD)
    }

    pub fn link(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::UNDERLINED)
    }

    pub fn banner(&self) -> Style {
        Style::default().bg(self.error).fg(Color::White)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.accent)
    }
}
