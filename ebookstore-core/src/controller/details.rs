//! Detail page: field population, related books and the download button.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::controller::context::AppContext;
use crate::controller::tasks::{Task, TaskKey};
use crate::error::AppError;
use crate::model::book::{Book, BookId, display_or_empty};
use crate::model::ui_state::DownloadPhase;
use crate::view::card::render_stars;
use crate::view::dom::{Element, Fragment};
use crate::view::markup::DOWNLOAD_LABEL;

pub const NO_RELATED: &str = "No related books found.";

/// Related books shown under a book, at most.
pub const RELATED_LIMIT: usize = 3;

/// Resolves the `id` query parameter and renders the book, or the not-found
/// state when the id is absent or unknown.
pub fn on_page_load(ctx: &mut AppContext) {
    let Some(id) = ctx.location.book_id() else {
        debug!("no book id in {}", ctx.location);
        show_not_found(ctx);
        return;
    };
    let Some(book) = ctx.catalog.find(id).cloned() else {
        info!("book {id} not in catalog");
        show_not_found(ctx);
        return;
    };

    render_book_details(ctx, &book);
    render_related_books(ctx, &book);
}

pub fn show_not_found(ctx: &mut AppContext) {
    ctx.document.update("loading-state", Element::hide);
    ctx.document.update("book-details", Element::hide);
    ctx.document.update("error-state", Element::show);
}

fn render_book_details(ctx: &mut AppContext, book: &Book) {
    let doc = &mut ctx.document;
    doc.update("loading-state", Element::hide);
    doc.update("error-state", Element::hide);
    doc.update("book-details", Element::show);

    doc.set_title(format!("{} - eBookStore", book.title));
    doc.update("breadcrumb-category", |el| el.set_text(book.category.as_str()));
    doc.update("breadcrumb-title", |el| el.set_text(book.title.as_str()));

    doc.update("book-cover", |el| {
        el.set_attr("src", book.cover.as_str());
        el.set_attr("alt", book.title.as_str());
    });
    doc.update("book-title", |el| el.set_text(book.title.as_str()));
    doc.update("book-author", |el| el.set_text(format!("by {}", book.author)));
    doc.update("book-price", |el| el.set_text(book.price.as_str()));
    doc.update("book-category", |el| el.set_text(book.category.as_str()));
    doc.update("book-rating", |el| {
        el.replace_children(render_stars(book.rating).into_iter().collect());
    });
    doc.update("book-pages", |el| el.set_text(display_or_empty(&book.pages)));
    doc.update("book-year", |el| el.set_text(display_or_empty(&book.published_year)));
    doc.update("book-isbn", |el| el.set_text(display_or_empty(&book.isbn)));
    doc.update("book-description", |el| el.set_text(book.detail_description()));

    ctx.current_book = Some(book.id);
    info!("Showing details for {} ({})", book.title, book.id);
}

fn render_related_books(ctx: &mut AppContext, current: &Book) {
    if !ctx.document.contains("related-books") {
        return;
    }

    let related = ctx.catalog.related_to(current, RELATED_LIMIT);
    if related.is_empty() {
        ctx.document.update("related-books", |el| el.set_text(NO_RELATED));
        return;
    }

    let fragment: Fragment = ctx.cards.render_all(related);
    ctx.document
        .update("related-books", |el| el.replace_children(fragment));
}

/* ============================== Download ============================ */

/// Download button click: shows the busy state and schedules the simulated
/// preparation delay.
pub fn on_download_click(ctx: &mut AppContext) {
    let Some(id) = ctx.current_book else {
        return;
    };
    let Some(button) = ctx.document.get_mut("download-btn") else {
        return;
    };

    if ctx.ui.download_label.is_none() {
        ctx.ui.download_label = Some(button.text_value().to_string());
    }
    button.set_text("Downloading...");
    button.set_disabled(true);
    ctx.ui.download = DownloadPhase::Downloading;

    // a pending revert from an earlier download must not undo this one
    ctx.cancel(&TaskKey::DownloadRevert);
    let delay = ctx.config.timings.download_prepare;
    ctx.schedule(TaskKey::DownloadPrepare, delay, Task::PrepareDownload(id));
}

/// The book a scheduled preparation refers to.
pub fn book_for_download(ctx: &AppContext, id: BookId) -> Option<Book> {
    ctx.catalog.find(id).cloned()
}

/// Outcome of the file save. Success reverts after a delay; failure leaves
/// a retry button.
pub fn finish_download(ctx: &mut AppContext, result: Result<PathBuf, AppError>) {
    match result {
        Ok(path) => {
            ctx.document.update("download-btn", |el| el.set_text("Downloaded!"));
            ctx.ui.download = DownloadPhase::Downloaded;
            let delay = ctx.config.timings.download_revert;
            ctx.schedule(TaskKey::DownloadRevert, delay, Task::RevertDownload);
            debug!("download saved to {}", path.display());
        }
        Err(e) => {
            warn!("Download failed: {e}");
            ctx.document.update("download-btn", |el| {
                el.set_text("Try Again");
                el.set_disabled(false);
            });
            ctx.ui.download = DownloadPhase::Failed;
        }
    }
}

pub fn revert_download(ctx: &mut AppContext) {
    let label = ctx
        .ui
        .download_label
        .take()
        .unwrap_or_else(|| DOWNLOAD_LABEL.to_string());
    ctx.document.update("download-btn", |el| {
        el.set_text(label);
        el.set_disabled(false);
    });
    ctx.ui.download = DownloadPhase::Idle;
}
