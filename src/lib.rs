use wasm_bindgen::prelude::*;

use crate::domain::logging::LogComponent;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod settings;

pub use application::MarketBlurController;
pub use presentation::MarketBlurApi;
pub use settings::BlurSettings;

/// Module start hook. The logger itself is installed by the first
/// `MarketBlurApi`, which knows the configured level.
#[wasm_bindgen(start)]
pub fn initialize() {
    console_error_panic_hook::set_once();

    let browser_time_provider = Box::new(infrastructure::services::BrowserTimeProvider::new());
    domain::logging::init_time_provider(browser_time_provider);

    crate::log_debug!(LogComponent::Presentation("Initialize"), "Market blur module loaded");
}
