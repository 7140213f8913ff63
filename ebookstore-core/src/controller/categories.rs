//! Categories page: card search and the per-category drill-down.

use tracing::debug;

use crate::controller::context::AppContext;
use crate::search::engine::{self, CategoryFilter};
use crate::view::dom::Display;

/// Hides category cards that do not mention `query`.
pub fn filter_cards(ctx: &mut AppContext, query: &str) {
    for id in ctx.document.ids_with_class("category-card") {
        ctx.document.update(&id, |card| {
            let field = |key: &str| card.attr_value(key).unwrap_or_default().to_string();
            let visible = engine::category_card_matches(
                query,
                &field("data-category"),
                &field("data-title"),
                &field("data-description"),
            );
            card.set_display(if visible { Display::Block } else { Display::None });
        });
    }
}

/// Drill-down into one category: hides the card grid and lists its books.
pub fn show_category_books(ctx: &mut AppContext, card_id: &str) {
    let category = ctx
        .document
        .get(card_id)
        .and_then(|card| card.attr_value("data-category"))
        .unwrap_or_default()
        .to_string();

    if !ctx.document.contains("category-books") {
        return;
    }

    ctx.document.update("category-grid", |grid| grid.set_display(Display::None));
    ctx.document.update("category-books", |section| section.show());
    ctx.document.update("category-title", |el| el.set_text(category.as_str()));
    ctx.document.update("category-description", |el| {
        el.set_text(engine::category_description(&category));
    });

    // exact match: the "all" sentinel is not special here
    ctx.catalog.apply_category(CategoryFilter::Only(category.clone()));
    debug!(category, books = ctx.catalog.filtered_len(), "category drill-down");
    render_category_books(ctx);
}

/// Leaves the drill-down and shows the card grid again.
pub fn show_all(ctx: &mut AppContext) {
    ctx.document.update("category-books", |section| section.hide());
    ctx.document.update("category-grid", |grid| grid.set_display(Display::Grid));
}

fn render_category_books(ctx: &mut AppContext) {
    if !ctx.document.contains("category-books-grid") {
        return;
    }

    if ctx.catalog.filtered_len() == 0 {
        ctx.document.update("category-books-grid", |grid| grid.clear_children());
        ctx.document.update("no-books-message", |el| el.show());
        return;
    }

    ctx.document.update("no-books-message", |el| el.hide());
    let fragment = ctx.cards.render_all(ctx.catalog.filtered());
    ctx.document
        .update("category-books-grid", |grid| grid.replace_children(fragment));
}
