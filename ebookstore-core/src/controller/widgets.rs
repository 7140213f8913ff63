//! Page-independent widgets: mobile menu, back-to-top, FAQ accordion,
//! contact and newsletter forms, error-page search and in-page anchors.
//!
//! Each widget binds to its elements by id and does nothing when the page
//! lacks them.

use tracing::{debug, info, trace, warn};

use crate::controller::context::AppContext;
use crate::controller::tasks::{Task, TaskKey};
use crate::error::AppError;
use crate::model::location::Location;
use crate::model::ui_state::{MenuPhase, SubmitPhase};
use crate::operators::submission::FormData;
use crate::view::dom::{Document, Element, ElementId};
use crate::view::markup::{
    BACK_TO_TOP_HIDDEN, BACK_TO_TOP_SHOWN, CONTACT_SUBMIT_LABEL, MENU_PANEL_OFFSCREEN,
    NEWSLETTER_DONE, NEWSLETTER_IDLE, NEWSLETTER_SUBMIT_LABEL,
};

/* ============================ Mobile menu ========================== */

const MENU_PARTS: [&str; 4] = [
    "mobile-menu-button",
    "mobile-menu",
    "mobile-menu-close",
    "mobile-menu-panel",
];

/// The menu only works when all of its parts are present.
pub fn menu_available(doc: &Document) -> bool {
    MENU_PARTS.iter().all(|id| doc.contains(id))
}

pub fn open_menu(ctx: &mut AppContext) {
    if !menu_available(&ctx.document) {
        return;
    }
    debug!("opening mobile menu");
    ctx.document.update("mobile-menu", Element::show);
    ctx.document.set_scroll_locked(true);
    ctx.ui.menu = MenuPhase::Opening;

    ctx.cancel(&TaskKey::MenuHide);
    let delay = ctx.config.timings.menu_reveal;
    ctx.schedule(TaskKey::MenuReveal, delay, Task::RevealMenuPanel);
}

pub fn close_menu(ctx: &mut AppContext) {
    if !menu_available(&ctx.document) {
        return;
    }
    debug!("closing mobile menu");
    ctx.document
        .update("mobile-menu-panel", |panel| panel.add_class(MENU_PANEL_OFFSCREEN));
    ctx.document.set_scroll_locked(false);
    ctx.ui.menu = MenuPhase::Closing;

    ctx.cancel(&TaskKey::MenuReveal);
    let delay = ctx.config.timings.menu_transition;
    ctx.schedule(TaskKey::MenuHide, delay, Task::HideMenu);
}

pub fn reveal_menu_panel(ctx: &mut AppContext) {
    ctx.document
        .update("mobile-menu-panel", |panel| panel.remove_class(MENU_PANEL_OFFSCREEN));
    ctx.ui.menu = MenuPhase::Open;
}

pub fn hide_menu(ctx: &mut AppContext) {
    ctx.document.update("mobile-menu", Element::hide);
    ctx.ui.menu = MenuPhase::Closed;
}

/// Escape closes the menu while it is shown.
pub fn on_escape(ctx: &mut AppContext) {
    let shown = ctx
        .document
        .get("mobile-menu")
        .is_some_and(|menu| !menu.is_hidden());
    if shown {
        close_menu(ctx);
    }
}

/* ============================ Back to top ========================== */

/// Scroll event: records the offset and requests one frame for the
/// visibility update, however many events arrive before it.
pub fn on_scroll(ctx: &mut AppContext, offset: u32) {
    ctx.document.scroll_to(offset);
    if ctx.document.contains("back-to-top") && ctx.ui.scroll.request() {
        trace!("frame requested for scroll");
    }
}

pub fn on_animation_frame(ctx: &mut AppContext) {
    if !ctx.ui.scroll.on_frame() {
        return;
    }
    let past = ctx.document.scroll_y() > ctx.config.ui.back_to_top_threshold;
    ctx.document.update("back-to-top", |button| {
        if past {
            button.remove_class(BACK_TO_TOP_HIDDEN);
            button.add_class(BACK_TO_TOP_SHOWN);
        } else {
            button.add_class(BACK_TO_TOP_HIDDEN);
            button.remove_class(BACK_TO_TOP_SHOWN);
        }
    });
}

pub fn back_to_top(ctx: &mut AppContext) {
    on_scroll(ctx, 0);
}

/* ================================ FAQ ============================== */

const ICON_ROTATION: &str = "data-icon-rotation";

/// Opens the clicked entry and closes every other one, or closes it if it
/// was already open.
pub fn toggle_faq(ctx: &mut AppContext, toggle_id: &str) {
    let Some(target) = ctx
        .document
        .get(toggle_id)
        .and_then(|t| t.attr_value("data-target"))
        .map(ElementId::from)
    else {
        return;
    };
    let Some(opening) = ctx.document.get(&target).map(Element::is_hidden) else {
        return;
    };

    if opening {
        for other in ctx.document.ids_with_class("faq-toggle") {
            if other == toggle_id {
                continue;
            }
            let other_target = ctx
                .document
                .get(&other)
                .and_then(|t| t.attr_value("data-target"))
                .map(ElementId::from);
            if let Some(content) = other_target {
                ctx.document.update(&content, Element::hide);
            }
            ctx.document
                .update(&other, |t| t.set_attr(ICON_ROTATION, "rotate(0deg)"));
        }
        ctx.document.update(&target, Element::show);
        ctx.document
            .update(toggle_id, |t| t.set_attr(ICON_ROTATION, "rotate(180deg)"));
    } else {
        ctx.document.update(&target, Element::hide);
        ctx.document
            .update(toggle_id, |t| t.set_attr(ICON_ROTATION, "rotate(0deg)"));
    }
}

/* ============================ Form helpers ========================= */

/// Ids of controls associated with `form`, in document order.
fn form_controls(doc: &Document, form: &str) -> Vec<ElementId> {
    doc.elements()
        .filter(|el| el.attr_value("form") == Some(form))
        .map(|el| ElementId::from(el.id()))
        .collect()
}

fn is_submit_button(el: &Element) -> bool {
    el.tag() == "button" && el.attr_value("type") == Some("submit")
}

fn collect_form_data(doc: &Document, form: &str) -> FormData {
    form_controls(doc, form)
        .iter()
        .filter_map(|id| doc.get(id))
        .filter_map(|el| Some((el.attr_value("name")?.to_string(), el.value().to_string())))
        .collect()
}

fn reset_form(doc: &mut Document, form: &str) {
    for id in form_controls(doc, form) {
        doc.update(&id, |el| {
            if !is_submit_button(el) {
                el.set_value("");
            }
        });
    }
}

/* ============================ Contact form ========================= */

/// Contact form submission: busy button, previous banners hidden, outcome
/// after the simulated delay.
pub fn on_contact_submit(ctx: &mut AppContext) {
    let Some(button) = ctx.document.get_mut("submit-btn") else {
        return;
    };
    ctx.ui.contact.begin(button.text_value());
    button.set_text("Sending...");
    button.set_disabled(true);

    ctx.document.update("success-message", Element::hide);
    ctx.document.update("error-message", Element::hide);

    let delay = ctx.config.timings.contact_submit;
    ctx.schedule(TaskKey::ContactSubmission, delay, Task::CompleteContact);
}

/// Field values of the contact form as they are now.
pub fn contact_form_data(ctx: &AppContext) -> FormData {
    collect_form_data(&ctx.document, "contact-form")
}

pub fn finish_contact(ctx: &mut AppContext, outcome: Result<(), AppError>) {
    match outcome {
        Ok(()) => {
            info!("contact form sent");
            ctx.document.update("success-message", Element::show);
            reset_form(&mut ctx.document, "contact-form");
            ctx.document.scroll_into_view("success-message");
            ctx.ui.contact.phase = SubmitPhase::Done;
        }
        Err(e) => {
            warn!("Form submission failed: {e}");
            ctx.document.update("error-message", Element::show);
            ctx.document.scroll_into_view("error-message");
            ctx.ui.contact.phase = SubmitPhase::Failed;
        }
    }

    let label = ctx.ui.contact.label_or(CONTACT_SUBMIT_LABEL).to_string();
    ctx.ui.contact.original_label = None;
    ctx.document.update("submit-btn", |button| {
        button.set_text(label);
        button.set_disabled(false);
    });
}

/* ============================ Newsletter =========================== */

/// A newsletter form is any form with an email field whose placeholder
/// mentions "email".
pub fn is_newsletter_form(doc: &Document, form: &str) -> bool {
    doc.get(form).is_some_and(|el| el.tag() == "form")
        && form_controls(doc, form).iter().any(|id| {
            doc.get(id).is_some_and(|el| {
                el.tag() == "input"
                    && el.attr_value("type") == Some("email")
                    && el
                        .attr_value("placeholder")
                        .is_some_and(|p| p.contains("email"))
            })
        })
}

fn newsletter_parts(doc: &Document, form: &str) -> Option<(ElementId, ElementId)> {
    let controls = form_controls(doc, form);
    let email = controls
        .iter()
        .find(|id| {
            doc.get(id)
                .is_some_and(|el| el.tag() == "input" && el.attr_value("type") == Some("email"))
        })?
        .clone();
    let button = controls
        .iter()
        .find(|id| doc.get(id).is_some_and(is_submit_button))?
        .clone();
    Some((email, button))
}

pub fn on_newsletter_submit(ctx: &mut AppContext, form: &str) {
    let Some((_, button_id)) = newsletter_parts(&ctx.document, form) else {
        return;
    };
    let Some(button) = ctx.document.get_mut(&button_id) else {
        return;
    };
    let label = button.text_value().to_string();
    button.set_text("Subscribing...");
    button.set_disabled(true);
    ctx.ui.newsletter(form).begin(&label);

    let form = ElementId::from(form);
    // a pending revert from an earlier subscription must not re-enable the button
    ctx.cancel(&TaskKey::NewsletterRevert(form.clone()));
    let delay = ctx.config.timings.newsletter_submit;
    ctx.schedule(
        TaskKey::Newsletter(form.clone()),
        delay,
        Task::CompleteNewsletter(form),
    );
}

/// Email address currently entered in `form`.
pub fn newsletter_email(ctx: &AppContext, form: &str) -> Option<String> {
    let (email, _) = newsletter_parts(&ctx.document, form)?;
    ctx.document.get(&email).map(|el| el.value().to_string())
}

pub fn finish_newsletter(ctx: &mut AppContext, form: &ElementId, outcome: Result<(), AppError>) {
    let Some((email_id, button_id)) = newsletter_parts(&ctx.document, form) else {
        return;
    };

    match outcome {
        Ok(()) => {
            info!("newsletter subscription confirmed");
            ctx.document.update(&button_id, |button| {
                button.set_text("Subscribed!");
                button.remove_class(NEWSLETTER_IDLE);
                button.add_class(NEWSLETTER_DONE);
            });
            ctx.document.update(&email_id, |input| input.set_value(""));
            ctx.ui.newsletter(form).phase = SubmitPhase::Done;

            let delay = ctx.config.timings.newsletter_revert;
            ctx.schedule(
                TaskKey::NewsletterRevert(form.clone()),
                delay,
                Task::RevertNewsletter(form.clone()),
            );
        }
        Err(e) => {
            warn!("Newsletter subscription failed: {e}");
            ctx.document.update(&button_id, |button| {
                button.set_text("Try Again");
                button.set_disabled(false);
            });
            let feedback = ctx.ui.newsletter(form);
            feedback.phase = SubmitPhase::Failed;
        }
    }
}

pub fn revert_newsletter(ctx: &mut AppContext, form: &ElementId) {
    let Some((_, button_id)) = newsletter_parts(&ctx.document, form) else {
        return;
    };
    let feedback = ctx.ui.newsletter(form);
    let label = feedback.label_or(NEWSLETTER_SUBMIT_LABEL).to_string();
    feedback.phase = SubmitPhase::Idle;
    feedback.original_label = None;

    ctx.document.update(&button_id, |button| {
        button.set_text(label);
        button.add_class(NEWSLETTER_IDLE);
        button.remove_class(NEWSLETTER_DONE);
        button.set_disabled(false);
    });
}

/* ======================== Error search / anchors =================== */

/// Enter in the error page's search box: redirect to the listing with the
/// trimmed query, unless it is blank.
pub fn error_search_redirect(ctx: &AppContext) -> Option<Location> {
    let query = ctx.document.get("error-search")?.value().trim();
    if query.is_empty() {
        return None;
    }
    Some(Location::new("index.html").with_param("search", query))
}

/// In-page anchor (`href="#id"`): scrolls the target into view if present.
/// Returns false when the element is not such an anchor.
pub fn follow_anchor(ctx: &mut AppContext, anchor_id: &str) -> bool {
    let Some(target) = ctx
        .document
        .get(anchor_id)
        .filter(|el| el.tag() == "a")
        .and_then(|el| el.attr_value("href"))
        .and_then(|href| href.strip_prefix('#'))
        .map(ElementId::from)
    else {
        return false;
    };
    if !ctx.document.scroll_into_view(&target) {
        debug!("anchor target #{target} not found");
    }
    true
}
