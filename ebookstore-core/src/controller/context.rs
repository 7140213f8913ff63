//! Application context: everything the page controllers read and mutate,
//! built once and passed explicitly.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::config::Config;
use crate::controller::tasks::{Task, TaskKey};
use crate::model::book::BookId;
use crate::model::catalog::CatalogStore;
use crate::model::location::{Location, Page};
use crate::model::preferences::Theme;
use crate::model::ui_state::UIState;
use crate::util::scheduler::{Clock, Scheduler};
use crate::view::card::CardRenderer;
use crate::view::dom::{Document, Node};
use crate::view::markup;

pub const ERROR_BANNER_CLASSES: &str =
    "error-banner fixed top-4 right-4 bg-red-500 text-white px-6 py-3 rounded-lg shadow-lg z-50";

pub struct AppContext {
    pub config: Arc<Config>,
    pub location: Location,
    pub page: Page,
    pub document: Document,
    /// Survives navigation within a session.
    pub catalog: CatalogStore,
    pub scheduler: Scheduler<TaskKey, Task>,
    pub clock: Box<dyn Clock>,
    pub cards: CardRenderer,
    pub theme: Theme,
    /// Book shown on the detail page; set once its fields are filled.
    pub current_book: Option<BookId>,
    pub ui: UIState,
}

impl AppContext {
    pub fn new(config: Arc<Config>, clock: Box<dyn Clock>, location: Location, theme: Theme) -> Self {
        let page = location.page();
        Self {
            cards: CardRenderer::new(config.ui.description_preview_chars),
            document: markup::page_document(&page),
            config,
            location,
            page,
            catalog: CatalogStore::new(),
            scheduler: Scheduler::new(),
            clock,
            theme,
            current_book: None,
            ui: UIState::new(),
        }
    }

    /// Replaces the page: fresh markup, no pending timers, no widget state.
    pub fn enter(&mut self, location: Location) {
        let dropped = self.scheduler.len();
        if dropped > 0 {
            debug!(dropped, "pending tasks discarded on navigation");
        }
        self.page = location.page();
        self.location = location;
        self.document = markup::page_document(&self.page);
        self.scheduler = Scheduler::new();
        self.catalog.reset_view();
        self.current_book = None;
        self.ui = UIState::new();
    }

    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Schedules `task` after `delay`, replacing any task under `key`.
    pub fn schedule(&mut self, key: TaskKey, delay: Duration, task: Task) {
        let now = self.clock.now();
        if self.scheduler.schedule(key, now, delay, task).is_some() {
            debug!("pending task replaced");
        }
    }

    pub fn cancel(&mut self, key: &TaskKey) {
        self.scheduler.cancel(key);
    }

    /// Transient error banner, removed after the configured delay.
    pub fn show_error(&mut self, message: &str) {
        let handle = self
            .document
            .append_to_body(Node::new("div").class(ERROR_BANNER_CLASSES).text(message));
        let delay = self.config.timings.banner_dismiss;
        self.schedule(TaskKey::Banner(handle), delay, Task::DismissBanner(handle));
    }
}
