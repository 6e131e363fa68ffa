/// Focus Shield - time-gated distraction blocking for Chrome
/// Built with Rust + WASM

pub mod controller;
pub mod dom;
pub mod gatekeeper;
pub mod media;
pub mod schedule;
pub mod settings;
pub mod sites;
pub mod storage;
pub mod watch;

use wasm_bindgen::prelude::*;

use crate::sites::Site;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the restriction controller inside a target site's pages
#[wasm_bindgen]
pub fn start_site_controller(site: &str) {
    match Site::from_name(site) {
        Some(site) => controller::launch(site),
        None => log::error!("unknown site {:?}", site),
    }
}

// Start the navigation gatekeeper in the background context
#[wasm_bindgen]
pub fn start_gatekeeper() {
    gatekeeper::launch();
}

// Re-export schedule evaluation for JavaScript access (popup status line)
#[wasm_bindgen]
pub fn restrictions_active_now(settings: JsValue, site: &str) -> bool {
    let Some(site) = Site::from_name(site) else {
        return false;
    };
    match serde_wasm_bindgen::from_value::<settings::Settings>(settings) {
        Ok(doc) => {
            schedule::restrictions_active(&doc.normalized(), site, schedule::LocalTime::now())
        }
        Err(_) => false,
    }
}
