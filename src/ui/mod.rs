//! UI module for handling user interactions and UI updates.
//!
//! Everything here runs on the Slint event loop. Deck timers are
//! `slint::Timer`s owned by their [`deck_driver::DeckDriver`], so no work crosses threads.

pub mod deck_driver;
pub mod handlers;
mod state_helpers;

pub use handlers::setup_handlers;
