/// Settings persistence over the chrome.storage.sync JS bridge
use serde::Deserialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;

/// Key the whole document lives under in the synced store.
pub const SETTINGS_KEY: &str = "settings";

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    fn onRuntimeMessage(callback: &js_sys::Function);
}

/// Raw read; Ok(None) means nothing has been stored yet.
pub async fn read_settings() -> Result<Option<Settings>, String> {
    let value = getStorage(SETTINGS_KEY)
        .await
        .map_err(|e| format!("settings read failed: {:?}", e))?;
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let settings: Settings = serde_wasm_bindgen::from_value(value)
        .map_err(|e| format!("stored settings did not parse: {:?}", e))?;
    Ok(Some(settings.normalized()))
}

/// Current settings, falling back to the shipped defaults on an empty or
/// unreadable store. Never fails.
pub async fn load_settings() -> Settings {
    match read_settings().await {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            log::debug!("no stored settings, using defaults");
            Settings::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            Settings::default()
        }
    }
}

pub async fn save_settings(settings: &Settings) -> Result<(), String> {
    let value = serde_wasm_bindgen::to_value(settings)
        .map_err(|e| format!("settings did not serialize: {:?}", e))?;
    setStorage(SETTINGS_KEY, value)
        .await
        .map_err(|e| format!("settings write failed: {:?}", e))
}

/// One-way push sent by the settings-owning context after each change.
#[derive(Debug, Deserialize)]
struct PushMessage {
    action: String,
    #[serde(default)]
    settings: Option<Settings>,
}

/// Subscribe to settings pushes for the lifetime of the page. Messages
/// with any other action are ignored.
pub fn on_settings_push(handler: impl Fn(Settings) + 'static) {
    let callback = Closure::wrap(Box::new(move |message: JsValue| {
        let Ok(message) = serde_wasm_bindgen::from_value::<PushMessage>(message) else {
            return;
        };
        if message.action != "updateSettings" {
            return;
        }
        if let Some(settings) = message.settings {
            handler(settings.normalized());
        }
    }) as Box<dyn FnMut(JsValue)>);

    onRuntimeMessage(callback.as_ref().unchecked_ref());
    callback.forget();
}
