//! src/controller/storefront.rs
//! ============================================================================
//! # Storefront: page lifecycle and action dispatch
//!
//! Owns the [`AppContext`] and the external services (catalog source,
//! download sink, submission gateway). Input arrives as [`Action`]s from
//! whatever event source drives it; deferred work runs when the owner calls
//! [`Storefront::run_due_tasks`] after the clock has moved.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, trace, warn};

use crate::config::Config;
use crate::controller::actions::{Action, Flow, Key};
use crate::controller::context::AppContext;
use crate::controller::tasks::Task;
use crate::controller::{categories, details, listing, widgets};
use crate::error::AppError;
use crate::loader::data_loader::{CatalogSource, DataLoader, LoadOutcome, SiteSource};
use crate::model::catalog::CatalogStore;
use crate::model::location::{Location, Page};
use crate::model::preferences::{LocalStorage, Theme};
use crate::model::ui_state::UIState;
use crate::operators::download::{DownloadRequest, DownloadSink, FsDownloadSink};
use crate::operators::submission::{SimulatedGateway, SubmissionGateway};
use crate::util::scheduler::{Clock, MonotonicClock};
use crate::view::dom::{Document, ElementId};

/// Counters for the status bar and the shutdown log.
#[derive(Debug, Default, Clone, Copy)]
pub struct StorefrontStats {
    pub actions: u64,
    pub tasks_run: u64,
    pub page_loads: u64,
    pub ignored_clicks: u64,
}

/// What a click lands on, resolved before any mutation.
#[derive(Debug)]
enum ClickTarget {
    CategoryFilter,
    CategoryCard,
    ShowAllCategories,
    Download,
    MenuOpen,
    MenuClose,
    MenuBackdrop,
    BackToTop,
    FaqToggle,
    ThemeToggle,
    Anchor,
    Link(String),
    SubmitButton(ElementId),
    Inert,
}

fn classify(doc: &Document, target: &str) -> Option<ClickTarget> {
    let el = doc.get(target)?;
    if el.is_disabled() {
        return None;
    }

    let kind = match target {
        "show-all-categories" => ClickTarget::ShowAllCategories,
        "download-btn" => ClickTarget::Download,
        "mobile-menu-button" => ClickTarget::MenuOpen,
        "mobile-menu-close" => ClickTarget::MenuClose,
        "mobile-menu" => ClickTarget::MenuBackdrop,
        "back-to-top" => ClickTarget::BackToTop,
        "theme-toggle" => ClickTarget::ThemeToggle,
        _ if el.has_class("category-filter") => ClickTarget::CategoryFilter,
        _ if el.has_class("category-card") => ClickTarget::CategoryCard,
        _ if el.has_class("faq-toggle") => ClickTarget::FaqToggle,
        _ if el.tag() == "a" => match el.attr_value("href") {
            Some(href) if href.starts_with('#') => ClickTarget::Anchor,
            Some(href) => ClickTarget::Link(href.to_string()),
            None => ClickTarget::Inert,
        },
        _ if el.tag() == "button" && el.attr_value("type") == Some("submit") => el
            .attr_value("form")
            .map_or(ClickTarget::Inert, |form| ClickTarget::SubmitButton(form.into())),
        _ => ClickTarget::Inert,
    };
    Some(kind)
}

pub struct Storefront {
    ctx: AppContext,
    loader: DataLoader,
    downloads: Box<dyn DownloadSink>,
    gateway: Box<dyn SubmissionGateway>,
    stats: StorefrontStats,
}

impl Storefront {
    pub fn builder(config: Config) -> StorefrontBuilder {
        StorefrontBuilder::new(config)
    }

    /* ---------------------------- page lifecycle ------------------------- */

    /// Runs the page-load sequence for the current location: catalog load
    /// (at most one fetch per session), deep-link search, page logic.
    #[instrument(level = "debug", skip(self), fields(page = self.ctx.page.name()))]
    pub async fn boot(&mut self) {
        let started = self.ctx.now();
        info!("Loading {}", self.ctx.location);

        if !self.ctx.catalog.is_populated() {
            self.ctx.document.update("loading-state", |el| el.show());
            self.ctx.document.update("books-grid", |el| el.hide());
        }

        match self.loader.load(&mut self.ctx.catalog).await {
            Ok(outcome) => {
                if let LoadOutcome::Fetched { books } = outcome {
                    debug!(books, "catalog fetched");
                }
                self.seed_search();
                self.ctx.document.update("loading-state", |el| el.hide());
            }
            Err(e) => {
                warn!("Failed to load books: {e}");
                self.ctx.document.update("loading-state", |el| el.hide());
                self.ctx.show_error(e.user_message());
            }
        }

        self.page_logic();
        info!("Service worker registration skipped for static site");

        let elapsed = self.ctx.now().saturating_sub(started);
        info!("Page load time: {} ms", elapsed.as_millis());
        self.stats.page_loads += 1;
    }

    /// Leaves the current page and boots `location`. The catalog survives.
    pub async fn navigate(&mut self, location: Location) {
        info!("Navigating to {location}");
        self.ctx.enter(location);
        self.boot().await;
    }

    /// Deep links: a `search` parameter pre-fills the search box and narrows
    /// the view that the page logic renders next.
    fn seed_search(&mut self) {
        let Some(query) = self.ctx.location.search_query().map(str::to_string) else {
            return;
        };
        if self
            .ctx
            .document
            .update("search-input", |input| input.set_value(query.as_str()))
        {
            debug!(query, "seeding search from location");
            self.ctx.catalog.apply_text_search(&query);
        }
    }

    fn page_logic(&mut self) {
        match self.ctx.page {
            Page::Home => {
                listing::render_books(&mut self.ctx);
                listing::update_category_counts(&mut self.ctx);
            }
            Page::Details => details::on_page_load(&mut self.ctx),
            Page::Categories => listing::update_category_counts(&mut self.ctx),
            Page::Contact | Page::Other(_) => {}
        }
    }

    /* -------------------------------- dispatch -------------------------- */

    pub async fn dispatch(&mut self, action: Action) -> Flow {
        self.stats.actions += 1;
        trace!(?action, "dispatch");

        match action {
            Action::Quit => return Flow::Quit,
            Action::Navigate(location) => self.navigate(location).await,
            Action::Input { target, value } => self.on_input(&target, value),
            Action::Click { target } => self.on_click(&target).await,
            Action::KeyDown(Key::Escape) => widgets::on_escape(&mut self.ctx),
            Action::KeyDown(_) => {}
            Action::KeyPress { target, key } => self.on_key_press(&target, key).await,
            Action::Submit { form } => self.on_submit(&form),
            Action::Scroll { offset } => widgets::on_scroll(&mut self.ctx, offset),
            Action::AnimationFrame => widgets::on_animation_frame(&mut self.ctx),
        }
        Flow::Continue
    }

    fn on_input(&mut self, target: &str, value: String) {
        if !self
            .ctx
            .document
            .update(target, |input| input.set_value(value.as_str()))
        {
            return;
        }
        match target {
            "search-input" => listing::on_search_input(&mut self.ctx, &value),
            "category-search" => categories::filter_cards(&mut self.ctx, &value),
            _ => {}
        }
    }

    async fn on_click(&mut self, target: &str) {
        let Some(kind) = classify(&self.ctx.document, target) else {
            debug!("click on {target} ignored");
            self.stats.ignored_clicks += 1;
            return;
        };

        let ctx = &mut self.ctx;
        match kind {
            ClickTarget::CategoryFilter => listing::on_filter_click(ctx, target),
            ClickTarget::CategoryCard => categories::show_category_books(ctx, target),
            ClickTarget::ShowAllCategories => categories::show_all(ctx),
            ClickTarget::Download => details::on_download_click(ctx),
            ClickTarget::MenuOpen => widgets::open_menu(ctx),
            ClickTarget::MenuClose | ClickTarget::MenuBackdrop => widgets::close_menu(ctx),
            ClickTarget::BackToTop => widgets::back_to_top(ctx),
            ClickTarget::FaqToggle => widgets::toggle_faq(ctx, target),
            ClickTarget::ThemeToggle => ctx.theme = ctx.theme.toggled(),
            ClickTarget::Anchor => {
                widgets::follow_anchor(ctx, target);
            }
            ClickTarget::Link(href) => match Location::parse(&href) {
                Ok(location) => self.navigate(location).await,
                Err(e) => warn!("Ignoring link {target}: {e}"),
            },
            ClickTarget::SubmitButton(form) => self.on_submit(&form),
            ClickTarget::Inert => trace!("click on {target} has no handler"),
        }
    }

    async fn on_key_press(&mut self, target: &str, key: Key) {
        if key != Key::Enter {
            return;
        }
        if target == "error-search" {
            if let Some(location) = widgets::error_search_redirect(&self.ctx) {
                self.navigate(location).await;
            }
            return;
        }

        // implicit submission: Enter in a single-line field submits its form
        let form = self
            .ctx
            .document
            .get(target)
            .filter(|el| el.tag() == "input")
            .and_then(|el| el.attr_value("form"))
            .map(ElementId::from);
        if let Some(form) = form {
            self.on_submit(&form);
        }
    }

    fn on_submit(&mut self, form: &str) {
        let mut handled = false;
        if form == "contact-form" && self.ctx.document.contains(form) {
            widgets::on_contact_submit(&mut self.ctx);
            handled = true;
        }
        if widgets::is_newsletter_form(&self.ctx.document, form) {
            widgets::on_newsletter_submit(&mut self.ctx, form);
            handled = true;
        }
        if !handled {
            debug!("submit of {form} has no handler");
        }
    }

    /* -------------------------------- timers ---------------------------- */

    /// Runs every task due at the current time, earliest first. Returns how
    /// many ran.
    pub async fn run_due_tasks(&mut self) -> usize {
        let mut ran = 0;
        loop {
            let now = self.ctx.now();
            let Some((key, task)) = self.ctx.scheduler.pop_due(now) else {
                break;
            };
            trace!(?key, "running task");
            self.run_task(task).await;
            ran += 1;
        }
        self.stats.tasks_run += ran as u64;
        ran
    }

    async fn run_task(&mut self, task: Task) {
        let ctx = &mut self.ctx;
        match task {
            Task::PerformSearch(query) => listing::perform_search(ctx, &query),
            Task::DismissBanner(handle) => {
                ctx.document.remove_from_body(handle);
            }
            Task::RevealMenuPanel => widgets::reveal_menu_panel(ctx),
            Task::HideMenu => widgets::hide_menu(ctx),
            Task::CompleteContact => {
                let data = widgets::contact_form_data(ctx);
                let outcome = self.gateway.submit_contact(&data);
                widgets::finish_contact(ctx, outcome);
            }
            Task::CompleteNewsletter(form) => {
                let email = widgets::newsletter_email(ctx, &form).unwrap_or_default();
                let outcome = self.gateway.subscribe(&email);
                widgets::finish_newsletter(ctx, &form, outcome);
            }
            Task::RevertNewsletter(form) => widgets::revert_newsletter(ctx, &form),
            Task::PrepareDownload(id) => {
                let result = match details::book_for_download(ctx, id) {
                    Some(book) => self.downloads.save(&DownloadRequest::for_book(&book)).await,
                    None => Err(AppError::download_failed(
                        id.to_string(),
                        "book no longer in catalog",
                    )),
                };
                details::finish_download(ctx, result);
            }
            Task::RevertDownload => details::revert_download(ctx),
        }
    }

    /// Earliest pending deadline on the context clock.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.ctx.scheduler.next_deadline()
    }

    /// Time left until the next task is due, zero if one is overdue.
    pub fn until_next_task(&self) -> Option<Duration> {
        let now = self.ctx.now();
        self.next_deadline()
            .map(|deadline| deadline.saturating_sub(now))
    }

    /// A scroll is waiting for its animation frame.
    pub fn frame_pending(&self) -> bool {
        self.ctx.ui.scroll.is_pending()
    }

    /* ------------------------------- accessors -------------------------- */

    pub fn document(&self) -> &Document {
        &self.ctx.document
    }

    pub fn catalog(&self) -> &CatalogStore {
        &self.ctx.catalog
    }

    pub fn location(&self) -> &Location {
        &self.ctx.location
    }

    pub fn page(&self) -> &Page {
        &self.ctx.page
    }

    pub fn ui(&self) -> &UIState {
        &self.ctx.ui
    }

    pub fn theme(&self) -> Theme {
        self.ctx.theme
    }

    pub fn pending_tasks(&self) -> usize {
        self.ctx.scheduler.len()
    }

    pub fn stats(&self) -> StorefrontStats {
        self.stats
    }

    /// Catalog fetch attempts this session.
    pub fn catalog_fetches(&self) -> u32 {
        self.loader.fetches()
    }
}

/* ================================ builder ============================= */

/// Assembles a [`Storefront`]. Unset services default to the production
/// ones derived from the config.
pub struct StorefrontBuilder {
    config: Config,
    source: Option<Box<dyn CatalogSource>>,
    clock: Option<Box<dyn Clock>>,
    downloads: Option<Box<dyn DownloadSink>>,
    gateway: Option<Box<dyn SubmissionGateway>>,
    storage: LocalStorage,
    location: Option<Location>,
}

impl StorefrontBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            source: None,
            clock: None,
            downloads: None,
            gateway: None,
            storage: LocalStorage::in_memory(),
            location: None,
        }
    }

    #[must_use]
    pub fn source(mut self, source: impl CatalogSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Box::new(clock));
        self
    }

    #[must_use]
    pub fn downloads(mut self, sink: impl DownloadSink + 'static) -> Self {
        self.downloads = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub fn gateway(mut self, gateway: impl SubmissionGateway + 'static) -> Self {
        self.gateway = Some(Box::new(gateway));
        self
    }

    #[must_use]
    pub fn storage(mut self, storage: LocalStorage) -> Self {
        self.storage = storage;
        self
    }

    /// Starting location; the configured start page when unset.
    #[must_use]
    pub fn location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn build(self) -> Result<Storefront, AppError> {
        let location = match self.location {
            Some(location) => location,
            None => Location::parse(&self.config.start_page)?,
        };
        let theme = Theme::from_storage(&self.storage);
        debug!(theme = theme.as_str(), "theme read from local storage");

        let source = self
            .source
            .unwrap_or_else(|| Box::new(SiteSource::new(&self.config.site_root)));
        let downloads = self.downloads.unwrap_or_else(|| {
            Box::new(FsDownloadSink::new(
                &self.config.site_root,
                self.config.downloads_path(),
            ))
        });
        let gateway = self.gateway.unwrap_or_else(|| {
            Box::new(SimulatedGateway::new(self.config.ui.contact_failure_rate))
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Box::new(MonotonicClock::new()));

        let config = Arc::new(self.config);
        let loader = DataLoader::new(source, config.catalog_path.clone());

        Ok(Storefront {
            ctx: AppContext::new(config, clock, location, theme),
            loader,
            downloads,
            gateway,
            stats: StorefrontStats::default(),
        })
    }
}
