//! Deferred work, keyed by purpose.
//!
//! Scheduling under a key that is already pending replaces the earlier task,
//! which is what debounces search input and keeps two download clicks from
//! racing their button timers.

use crate::model::book::BookId;
use crate::view::dom::{BodyHandle, ElementId};

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskKey {
    SearchDebounce,
    Banner(BodyHandle),
    MenuReveal,
    MenuHide,
    ContactSubmission,
    Newsletter(ElementId),
    NewsletterRevert(ElementId),
    DownloadPrepare,
    DownloadRevert,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    PerformSearch(String),
    DismissBanner(BodyHandle),
    RevealMenuPanel,
    HideMenu,
    CompleteContact,
    CompleteNewsletter(ElementId),
    RevertNewsletter(ElementId),
    PrepareDownload(BookId),
    RevertDownload,
}
