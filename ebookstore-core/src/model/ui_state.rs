//! Transient widget state for the current page.
//!
//! Everything here is discarded on navigation, like the page it belongs to.

use indexmap::IndexMap;

use crate::util::debounce::FrameThrottle;
use crate::view::dom::ElementId;

/// Mobile menu lifecycle. The panel slides in after the overlay is shown and
/// the overlay hides only after the panel has slid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MenuPhase {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

impl MenuPhase {
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// Download button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DownloadPhase {
    #[default]
    Idle,
    Downloading,
    Downloaded,
    Failed,
}

/// Simulated submission states shared by the contact and newsletter forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Sending,
    Done,
    Failed,
}

/// Submit button bookkeeping for one form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFeedback {
    pub phase: SubmitPhase,
    /// Button label restored once the feedback ends
    pub original_label: Option<String>,
}

impl FormFeedback {
    /// Enters the sending phase. The label is captured only while none is
    /// held, so a resubmission or a retry cannot capture transient text.
    pub fn begin(&mut self, current_label: &str) {
        if self.original_label.is_none() {
            self.original_label = Some(current_label.to_string());
        }
        self.phase = SubmitPhase::Sending;
    }

    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.original_label.as_deref().unwrap_or(fallback)
    }
}

#[derive(Debug, Default)]
pub struct UIState {
    pub menu: MenuPhase,
    pub download: DownloadPhase,
    pub download_label: Option<String>,
    pub contact: FormFeedback,
    pub newsletters: IndexMap<ElementId, FormFeedback>,
    pub scroll: FrameThrottle,
    /// Last value of every search box that has seen input
    pub last_query: Option<String>,
}

impl UIState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn newsletter(&mut self, form: &str) -> &mut FormFeedback {
        self.newsletters.entry(ElementId::from(form)).or_default()
    }

    /// Any simulated operation still waiting on its timer.
    pub fn is_busy(&self) -> bool {
        self.download == DownloadPhase::Downloading
            || self.contact.phase == SubmitPhase::Sending
            || self
                .newsletters
                .values()
                .any(|f| f.phase == SubmitPhase::Sending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resubmission_keeps_first_label() {
        let mut form = FormFeedback::default();
        form.begin("Send Message");
        form.begin("Sending...");

        assert_eq!(form.label_or("x"), "Send Message");
        assert_eq!(form.phase, SubmitPhase::Sending);
    }

    #[test]
    fn label_recaptured_after_completion() {
        let mut form = FormFeedback::default();
        form.begin("Subscribe");
        form.phase = SubmitPhase::Idle;
        form.original_label = None;
        form.begin("Join");
        assert_eq!(form.label_or("x"), "Join");
    }

    #[test]
    fn busy_tracks_any_pending_form() {
        let mut ui = UIState::new();
        assert!(!ui.is_busy());
        ui.newsletter("newsletter-form").begin("Subscribe");
        assert!(ui.is_busy());
        assert!(MenuPhase::Closing.is_visible());
    }
}
