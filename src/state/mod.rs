//! State management for the showcase application.

use crate::config::ShowcaseConfig;
use crate::content::{self, GALLERY_COMPONENT, HERO_COMPONENT};
use crate::services::{
    AvailabilityService, EditForm, JsonFileStore, KeyValueStore, LogNotifier, MemoryStore,
    NotificationService,
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

pub mod clock;
pub mod deck;

pub use deck::{DeckMode, DeckView, SlideDeck};

/// Store behind the fully-booked flag, chosen at startup.
pub type FlagStore = Box<dyn KeyValueStore + Send + Sync>;

/// Application-wide state container.
pub struct AppState {
    /// Autoplaying banner at the top of the page.
    pub hero: Arc<Mutex<SlideDeck>>,
    /// Image gallery that expands to a full-screen carousel.
    pub gallery: Arc<Mutex<SlideDeck>>,
    pub edit_form: Arc<Mutex<EditForm>>,
    pub availability: Arc<AvailabilityService<FlagStore>>,
    pub notifications: Arc<NotificationService<LogNotifier>>,
}

impl AppState {
    pub fn new(config: &ShowcaseConfig, document: Value) -> Self {
        let hero = SlideDeck::with_system_clock(
            content::slides_for(&document, HERO_COMPONENT),
            config.hero_deck(),
        );
        let gallery = SlideDeck::with_system_clock(
            content::slides_for(&document, GALLERY_COMPONENT),
            config.gallery_deck(),
        );

        let store: FlagStore = match &config.store_path {
            Some(path) => Box::new(JsonFileStore::new(path)),
            None => Box::new(MemoryStore::new()),
        };

        Self {
            hero: Arc::new(Mutex::new(hero)),
            gallery: Arc::new(Mutex::new(gallery)),
            edit_form: Arc::new(Mutex::new(EditForm::new(document))),
            availability: Arc::new(AvailabilityService::new(store)),
            notifications: Arc::new(NotificationService::new(LogNotifier)),
        }
    }
}
