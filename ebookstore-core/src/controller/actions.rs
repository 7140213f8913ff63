//! src/controller/actions.rs
//! ============================================================================
//! # Actions: storefront input events
//!
//! Every user interaction reaches the storefront as an [`Action`]. The
//! terminal front end produces them from key presses; tests script them
//! directly. Targets name elements of the current page by id.

use crate::model::location::Location;
use crate::view::dom::ElementId;

/// Keys the storefront reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Char(char),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load another page.
    Navigate(Location),

    /// The value of an input control changed.
    Input { target: ElementId, value: String },

    /// An element was clicked.
    Click { target: ElementId },

    /// Document-level key press (Escape closes the menu).
    KeyDown(Key),

    /// Key press delivered to a focused control.
    KeyPress { target: ElementId, key: Key },

    /// A form was submitted.
    Submit { form: ElementId },

    /// The page scrolled to `offset` pixels.
    Scroll { offset: u32 },

    /// The next animation frame is due.
    AnimationFrame,

    Quit,
}

impl Action {
    pub fn click(target: &str) -> Self {
        Self::Click {
            target: ElementId::from(target),
        }
    }

    pub fn input(target: &str, value: impl Into<String>) -> Self {
        Self::Input {
            target: ElementId::from(target),
            value: value.into(),
        }
    }

    pub fn key_press(target: &str, key: Key) -> Self {
        Self::KeyPress {
            target: ElementId::from(target),
            key,
        }
    }

    pub fn submit(form: &str) -> Self {
        Self::Submit {
            form: ElementId::from(form),
        }
    }
}

/// Whether the storefront keeps running after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}
