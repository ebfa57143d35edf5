//! Event handlers for UI callbacks.
//!
//! Mounts both slide decks and registers every Logic callback. Deck intents
//! go through their [`DeckDriver`]; site-level actions go through the
//! services held in [`AppState`].

use crate::services::{ContactRequest, SubmitStatus};
use crate::state::AppState;
use crate::ui::deck_driver::DeckDriver;
use crate::ui::state_helpers::{self, DeckSurface};
use log::{error, warn};
use slint::ComponentHandle;

/// Sets up all UI event handlers for the application.
///
/// The deck drivers are moved into the callbacks, so they live exactly as
/// long as the window that owns them.
pub fn setup_handlers(ui: &crate::AppWindow, state: AppState) {
    let hero = DeckDriver::mount(ui, DeckSurface::Hero, state.hero.clone());
    let gallery = DeckDriver::mount(ui, DeckSurface::Gallery, state.gallery.clone());

    let logic = ui.global::<crate::Logic>();

    logic.on_hero_select({
        let hero = hero.clone();
        move |index| hero.select(index)
    });

    // Gallery navigation
    logic.on_gallery_select({
        let gallery = gallery.clone();
        move |index| gallery.select(index)
    });
    logic.on_gallery_next({
        let gallery = gallery.clone();
        move || gallery.next()
    });
    logic.on_gallery_previous({
        let gallery = gallery.clone();
        move || gallery.previous()
    });
    logic.on_gallery_collapse(move || gallery.collapse());

    // Fully booked banner
    ui.global::<crate::SiteState>()
        .set_fully_booked(state.availability.is_fully_booked());
    logic.on_toggle_fully_booked({
        let ui_handle = ui.as_weak();
        let availability = state.availability.clone();
        move || match availability.toggle() {
            Ok(fully_booked) => {
                if let Some(ui) = ui_handle.upgrade() {
                    ui.global::<crate::SiteState>().set_fully_booked(fully_booked);
                }
            }
            Err(e) => error!("Could not update the fully booked flag: {}", e),
        }
    });

    // Content editing
    match state.edit_form.lock() {
        Ok(form) => state_helpers::set_edit_form(ui, &form),
        Err(_) => warn!("Edit form lock poisoned; starting with an empty form"),
    }

    logic.on_edit_field({
        let ui_handle = ui.as_weak();
        let form = state.edit_form.clone();
        move |key, value| {
            let Ok(mut form) = form.lock() else {
                return;
            };
            if !form.set_value(&key, value.as_str()) {
                return;
            }
            if let Some(ui) = ui_handle.upgrade() {
                ui.global::<crate::SiteState>()
                    .set_change_count(form.changes().len() as i32);
                state_helpers::set_submit_status(&ui, &SubmitStatus::Idle);
            }
        }
    });

    logic.on_reset_edits({
        let ui_handle = ui.as_weak();
        let form = state.edit_form.clone();
        move || {
            let Ok(mut form) = form.lock() else {
                return;
            };
            form.reset();
            if let Some(ui) = ui_handle.upgrade() {
                state_helpers::set_edit_form(&ui, &form);
                state_helpers::set_submit_status(&ui, &SubmitStatus::Idle);
            }
        }
    });

    logic.on_submit_edits({
        let ui_handle = ui.as_weak();
        let form = state.edit_form.clone();
        let notifications = state.notifications.clone();
        move || {
            let request = match form.lock() {
                Ok(form) => form.build_request(),
                Err(_) => return,
            };
            let status = notifications.submit(&request);
            if let Some(ui) = ui_handle.upgrade() {
                state_helpers::set_submit_status(&ui, &status);
            }
        }
    });

    // Contact form
    logic.on_submit_contact({
        let ui_handle = ui.as_weak();
        let notifications = state.notifications.clone();
        move |email, message| {
            let request = ContactRequest {
                email: email.to_string(),
                message: message.to_string(),
            };
            let status = notifications.submit_contact(&request);
            if let Some(ui) = ui_handle.upgrade() {
                state_helpers::set_contact_status(&ui, &status);
            }
        }
    });
}
