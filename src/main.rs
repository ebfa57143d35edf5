// Prevent console window in addition to Slint window in Windows release builds when, e.g., starting the app via file manager. Ignored on other platforms.
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![recursion_limit = "256"]

slint::include_modules!();

mod config;
mod content;
mod error;
mod services;
mod state;
mod ui;

use config::ShowcaseConfig;
use serde_json::Value;

/// Page document from the configured file, or the built-in page when none loads.
fn site_content(config: &ShowcaseConfig) -> Value {
    let Some(path) = config.content_path.as_deref() else {
        return content::default_site_content();
    };

    match content::load_site_content(path) {
        Ok(document) => {
            log::info!("Loaded site content from {}", path.display());
            document
        }
        Err(e) => {
            log::warn!("{}; using built-in content", e);
            content::default_site_content()
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let config = ShowcaseConfig::from_env();
    let document = site_content(&config);

    let app = AppWindow::new()?;
    let app_state = state::AppState::new(&config, document);

    // Setup all UI event handlers
    ui::setup_handlers(&app, app_state);

    app.run()?;

    Ok(())
}
