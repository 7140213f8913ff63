//! Home page listing: debounced search, category filter buttons and the
//! book grid.

use tracing::{debug, trace};

use crate::controller::context::AppContext;
use crate::controller::tasks::{Task, TaskKey};
use crate::search::engine::{self, CategoryFilter};
use crate::view::markup::FILTER_ACTIVE;

/// Search box input. Only the last value of a burst is applied, once the
/// input has been quiet for the debounce period.
pub fn on_search_input(ctx: &mut AppContext, value: &str) {
    ctx.ui.last_query = Some(value.to_string());
    let delay = ctx.config.timings.search_debounce;
    ctx.schedule(
        TaskKey::SearchDebounce,
        delay,
        Task::PerformSearch(value.to_string()),
    );
}

pub fn perform_search(ctx: &mut AppContext, query: &str) {
    ctx.catalog.apply_text_search(query);
    render_books(ctx);
}

/// Category filter button. Applies immediately and moves the active
/// highlight to the clicked button. An active text query is left alone.
pub fn on_filter_click(ctx: &mut AppContext, filter_id: &str) {
    let category = ctx
        .document
        .get(filter_id)
        .and_then(|el| el.attr_value("data-category"))
        .unwrap_or_default()
        .to_string();

    ctx.catalog.apply_category(CategoryFilter::parse(&category));
    render_books(ctx);

    for id in ctx.document.ids_with_class("category-filter") {
        ctx.document.update(&id, |el| el.remove_class(FILTER_ACTIVE));
    }
    ctx.document.update(filter_id, |el| el.add_class(FILTER_ACTIVE));
}

/// Renders the filtered view into `books-grid`, or the empty state.
pub fn render_books(ctx: &mut AppContext) {
    if !ctx.document.contains("books-grid") {
        trace!("no books grid on this page");
        return;
    }

    if ctx.catalog.filtered_len() == 0 {
        ctx.document.update("books-grid", |el| el.hide());
        ctx.document.update("no-results", |el| el.show());
        debug!("no books match the current filter");
        return;
    }

    ctx.document.update("no-results", |el| el.hide());
    let fragment = ctx.cards.render_all(ctx.catalog.filtered());
    ctx.document.update("books-grid", |el| {
        el.show();
        el.replace_children(fragment);
    });
}

/// Writes the per-category book counts into every `.category-count` hook.
pub fn update_category_counts(ctx: &mut AppContext) {
    if ctx.catalog.is_empty() {
        return;
    }

    let counts: Vec<(String, usize)> = engine::category_counts(ctx.catalog.books())
        .into_iter()
        .map(|(category, count)| (category.to_string(), count))
        .collect();

    for id in ctx.document.ids_with_class("category-count") {
        ctx.document.update(&id, |el| {
            let Some(category) = el.attr_value("data-category") else {
                return;
            };
            let count = counts
                .iter()
                .find(|(name, _)| name == category)
                .map_or(0, |(_, n)| *n);
            el.set_text(count.to_string());
        });
    }
}
