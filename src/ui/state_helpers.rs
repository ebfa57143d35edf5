//! Helper functions to push state into the Slint globals in grouped form.
//!
//! Deck frames, slide rows and form state each go through one function here
//! instead of scattered individual setters.

use crate::content::Slide;
use crate::services::edit_service::EditableField;
use crate::services::{EditForm, SubmitStatus};
use crate::state::{DeckMode, DeckView};
use log::debug;
use slint::{ComponentHandle, Model, ModelRc, VecModel};
use std::path::Path;

/// Columns of the collapsed gallery grid.
const GRID_COLUMNS: usize = 3;

/// Which deck a frame belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckSurface {
    Hero,
    Gallery,
}

/// Loads a slide image from a local path, or an empty image for remote refs.
fn slide_image(slide: &Slide) -> slint::Image {
    let path = Path::new(&slide.image_ref);
    if !path.is_file() {
        return slint::Image::default();
    }
    slint::Image::load_from_path(path).unwrap_or_else(|_| {
        debug!("Could not decode slide image {}", slide.image_ref);
        slint::Image::default()
    })
}

/// Builds the initial row of every slide.
pub fn slide_items(slides: &[Slide]) -> Vec<crate::SlideItem> {
    slides
        .iter()
        .enumerate()
        .map(|(i, slide)| crate::SlideItem {
            image: slide_image(slide),
            alt: slide.image_alt_text.as_str().into(),
            caption: slide.caption.as_deref().unwrap_or_default().into(),
            offset: 0,
            animate: false,
            column: (i % GRID_COLUMNS) as i32,
            row: (i / GRID_COLUMNS) as i32,
        })
        .collect()
}

/// Writes offsets and animate flags into the existing rows.
///
/// Rows are updated in place so the renderer keeps each slide element and can
/// animate it to the new offset.
pub fn update_slide_items(model: &VecModel<crate::SlideItem>, view: &DeckView) {
    for (i, (offset, animate)) in view.offsets.iter().zip(&view.animate).enumerate() {
        let Some(mut item) = model.row_data(i) else {
            continue;
        };
        if item.offset == *offset && item.animate == *animate {
            continue;
        }
        item.animate = *animate;
        item.offset = *offset;
        model.set_row_data(i, item);
    }
}

fn deck_frame(view: &DeckView, slide_count: usize) -> crate::DeckFrame {
    crate::DeckFrame {
        expanded: view.mode == DeckMode::Expanded,
        current_index: view.current_index as i32,
        shift: view.shift,
        nav_locked: view.nav_locked,
        progress: view.autoplay_progress,
        rows: slide_count.div_ceil(GRID_COLUMNS) as i32,
    }
}

/// Sets the slide rows of a deck.
pub fn set_deck_slides(
    ui: &crate::AppWindow,
    surface: DeckSurface,
    slides: ModelRc<crate::SlideItem>,
) {
    match surface {
        DeckSurface::Hero => ui.global::<crate::HeroState>().set_slides(slides),
        DeckSurface::Gallery => ui.global::<crate::GalleryState>().set_slides(slides),
    }
}

/// Sets mode, index, lock and progress of a deck at once.
pub fn set_deck_frame(ui: &crate::AppWindow, surface: DeckSurface, view: &DeckView) {
    let frame = deck_frame(view, view.offsets.len());
    match surface {
        DeckSurface::Hero => ui.global::<crate::HeroState>().set_frame(frame),
        DeckSurface::Gallery => ui.global::<crate::GalleryState>().set_frame(frame),
    }
}

fn edit_rows(fields: &[EditableField], form: &EditForm) -> Vec<crate::EditField> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| crate::EditField {
            key: field.key.as_str().into(),
            section: format!("{}. {}", field.section_number, field.section).into(),
            label: field.label.as_str().into(),
            value: form.value(&field.key).unwrap_or_default().into(),
            first_in_section: i == 0 || fields[i - 1].section_number != field.section_number,
        })
        .collect()
}

/// Sets all edit form properties at once.
///
/// Groups: fields, change-count
pub fn set_edit_form(ui: &crate::AppWindow, form: &EditForm) {
    let site_state = ui.global::<crate::SiteState>();
    site_state.set_fields(ModelRc::new(VecModel::from(edit_rows(form.fields(), form))));
    site_state.set_change_count(form.changes().len() as i32);
}

/// Status line for a submission and whether it failed.
fn status_line(status: &SubmitStatus, sent: &str, failed: &str) -> (String, bool) {
    match status {
        SubmitStatus::Idle => (String::new(), false),
        SubmitStatus::Success => (sent.to_string(), false),
        SubmitStatus::Error(e) => (format!("{}: {}", failed, e), true),
    }
}

/// Sets the submission outcome.
///
/// Groups: submit-status, submit-failed
pub fn set_submit_status(ui: &crate::AppWindow, status: &SubmitStatus) {
    let (message, failed) =
        status_line(status, "Changes sent for review", "Could not send changes");
    let site_state = ui.global::<crate::SiteState>();
    site_state.set_submit_status(message.into());
    site_state.set_submit_failed(failed);
}

/// Sets the contact form outcome, clearing the form once it was sent.
///
/// Groups: contact-status, contact-failed, contact-email, contact-message
pub fn set_contact_status(ui: &crate::AppWindow, status: &SubmitStatus) {
    let (message, failed) = status_line(status, "Message sent", "Could not send message");
    let site_state = ui.global::<crate::SiteState>();
    site_state.set_contact_status(message.into());
    site_state.set_contact_failed(failed);
    if *status == SubmitStatus::Success {
        site_state.set_contact_email(Default::default());
        site_state.set_contact_message(Default::default());
    }
}
