/// Background navigation gatekeeper: TikTok hard block, YouTube home redirect
///
/// Decisions are computed by a pure function over the freshly loaded
/// settings and the event details; the wasm glue around it only parses the
/// event and fires the redirect.
use serde::Deserialize;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::schedule::{LocalTime, restrictions_active};
use crate::settings::Settings;
use crate::sites::Site;
use crate::storage;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    fn onBeforeNavigate(callback: &js_sys::Function);

    fn onNavigationCompleted(callback: &js_sys::Function);

    fn redirectTab(tab_id: i32, url: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPhase {
    /// Fires before the request leaves; carries the hard block.
    BeforeNavigate,
    /// Fires once the document has loaded; carries the home redirect.
    Completed,
}

/// Main-frame navigation event as delivered by the webNavigation bridge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavDetails {
    pub tab_id: i32,
    pub frame_id: i32,
    pub url: String,
}

pub const SUBSCRIPTIONS_URL: &str = "https://www.youtube.com/feed/subscriptions";

/// Static interstitial shown instead of the blocked site; served as a
/// data: URL so the block needs no external fetch.
const BLOCK_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <title>Blocked</title>
  <style>
    body { display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }
    .card { text-align: center; background: white; padding: 40px; border-radius: 20px; box-shadow: 0 10px 40px rgba(0,0,0,0.1); max-width: 500px; }
    h1 { color: #667eea; font-size: 32px; margin-bottom: 20px; }
    p { color: #666; font-size: 18px; line-height: 1.6; }
    .emoji { font-size: 64px; margin-bottom: 20px; }
    .back { display: inline-block; margin-top: 20px; padding: 12px 30px; background: #667eea; color: white; text-decoration: none; border-radius: 25px; font-weight: 500; }
  </style>
</head>
<body>
  <div class="card">
    <div class="emoji">&#129504;</div>
    <h1>This site is blocked</h1>
    <p>Focus Shield is keeping this time free for the things you actually want to do.</p>
    <a href="javascript:history.back()" class="back">Go back</a>
  </div>
</body>
</html>"#;

pub fn block_page_url() -> String {
    format!("data:text/html,{}", BLOCK_PAGE_HTML)
}

/// Where to send this navigation instead, if anywhere.
///
/// Sub-frame events never act. The hard block ignores the schedule; the
/// home redirect requires YouTube restrictions to be active right now and
/// exempts the music sub-property.
pub fn navigation_action(
    settings: &Settings,
    phase: NavPhase,
    details: &NavDetails,
    now: LocalTime,
) -> Option<String> {
    if details.frame_id != 0 {
        return None;
    }
    let url = Url::parse(&details.url).ok()?;
    let host = url.host_str()?;

    match phase {
        NavPhase::BeforeNavigate => {
            if settings.tiktok.block && host_matches(host, "tiktok.com") {
                return Some(block_page_url());
            }
            None
        }
        NavPhase::Completed => {
            if !host_matches(host, "youtube.com") || host == "music.youtube.com" {
                return None;
            }
            if !settings.youtube.redirect_home {
                return None;
            }
            if !restrictions_active(settings, Site::Youtube, now) {
                return None;
            }
            if url.path() == "/" || url.path() == "/home" {
                return Some(SUBSCRIPTIONS_URL.to_string());
            }
            None
        }
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Wire up the webNavigation bridge. Called once from the background
/// entry point.
pub fn launch() {
    // First run: persist the shipped defaults so the popup starts from
    // the same document the core falls back to.
    spawn_local(async {
        if let Ok(None) = storage::read_settings().await {
            if let Err(e) = storage::save_settings(&Settings::default()).await {
                log::warn!("could not persist default settings: {}", e);
            }
        }
    });

    register(NavPhase::BeforeNavigate);
    register(NavPhase::Completed);
    log::info!("navigation gatekeeper running");
}

fn register(phase: NavPhase) {
    let callback = Closure::wrap(Box::new(move |details: JsValue| {
        handle_event(phase, details);
    }) as Box<dyn FnMut(JsValue)>);
    match phase {
        NavPhase::BeforeNavigate => onBeforeNavigate(callback.as_ref().unchecked_ref()),
        NavPhase::Completed => onNavigationCompleted(callback.as_ref().unchecked_ref()),
    }
    callback.forget();
}

fn handle_event(phase: NavPhase, details: JsValue) {
    let details: NavDetails = match serde_wasm_bindgen::from_value(details) {
        Ok(details) => details,
        Err(e) => {
            log::warn!("unreadable navigation event: {:?}", e);
            return;
        }
    };
    spawn_local(async move {
        // Reload on every event: a navigation can land before the change
        // push reaches this context.
        let settings = storage::load_settings().await;
        if let Some(target) = navigation_action(&settings, phase, &details, LocalTime::now()) {
            log::info!("redirecting tab {} away from {}", details.tab_id, details.url);
            redirectTab(details.tab_id, &target);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(frame_id: i32, url: &str) -> NavDetails {
        NavDetails {
            tab_id: 7,
            frame_id,
            url: url.to_string(),
        }
    }

    fn noon_monday() -> LocalTime {
        LocalTime::new(1, 12, 0)
    }

    #[test]
    fn test_hard_block_main_frame() {
        let settings = Settings::default();
        let action = navigation_action(
            &settings,
            NavPhase::BeforeNavigate,
            &details(0, "https://www.tiktok.com/@someone"),
            noon_monday(),
        );
        assert_eq!(action, Some(block_page_url()));
        assert!(action.unwrap().starts_with("data:text/html,"));
    }

    #[test]
    fn test_hard_block_ignores_sub_frames() {
        let settings = Settings::default();
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(3, "https://www.tiktok.com/embed/v2/123"),
                noon_monday(),
            ),
            None
        );
    }

    #[test]
    fn test_hard_block_respects_flag() {
        let mut settings = Settings::default();
        settings.tiktok.block = false;
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "https://tiktok.com/"),
                noon_monday(),
            ),
            None
        );
    }

    #[test]
    fn test_hard_block_is_schedule_independent() {
        // Everything scheduled off; the block still fires.
        let mut settings = Settings::default();
        settings.common.schedule.always_on = false;
        settings.youtube.schedule.always_on = false;
        settings.twitter.schedule.always_on = false;
        settings.common.schedule.active_days = Vec::new();

        assert!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "https://tiktok.com/"),
                noon_monday(),
            )
            .is_some()
        );
    }

    #[test]
    fn test_hard_block_matches_subdomains_only() {
        let settings = Settings::default();
        // Lookalike host must not match.
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "https://nottiktok.com/"),
                noon_monday(),
            ),
            None
        );
        assert!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "https://m.tiktok.com/"),
                noon_monday(),
            )
            .is_some()
        );
    }

    #[test]
    fn test_home_redirect_when_active() {
        let settings = Settings::default(); // always-on out of the box
        for url in ["https://www.youtube.com/", "https://www.youtube.com/home"] {
            assert_eq!(
                navigation_action(&settings, NavPhase::Completed, &details(0, url), noon_monday()),
                Some(SUBSCRIPTIONS_URL.to_string()),
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_home_redirect_leaves_other_paths() {
        let settings = Settings::default();
        for url in [
            "https://www.youtube.com/watch?v=abc",
            "https://www.youtube.com/feed/subscriptions",
            "https://www.youtube.com/results?search_query=rust",
        ] {
            assert_eq!(
                navigation_action(&settings, NavPhase::Completed, &details(0, url), noon_monday()),
                None,
                "{}",
                url
            );
        }
    }

    #[test]
    fn test_home_redirect_exempts_music() {
        let settings = Settings::default();
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::Completed,
                &details(0, "https://music.youtube.com/"),
                noon_monday(),
            ),
            None
        );
    }

    #[test]
    fn test_home_redirect_requires_toggle() {
        let mut settings = Settings::default();
        settings.youtube.redirect_home = false;
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::Completed,
                &details(0, "https://www.youtube.com/"),
                noon_monday(),
            ),
            None
        );
    }

    #[test]
    fn test_home_redirect_follows_schedule() {
        let mut settings = Settings::default();
        settings.common.schedule.always_on = false;
        settings.youtube.schedule.always_on = false;
        settings.youtube.schedule.active_days = vec![1];
        settings.youtube.schedule.time_slots =
            vec![crate::settings::TimeSlot::new("09:00", "17:00")];

        let home = details(0, "https://www.youtube.com/");
        assert!(
            navigation_action(&settings, NavPhase::Completed, &home, LocalTime::new(1, 10, 0))
                .is_some()
        );
        // Outside the window, the landing page is left alone.
        assert_eq!(
            navigation_action(&settings, NavPhase::Completed, &home, LocalTime::new(1, 20, 0)),
            None
        );
        assert_eq!(
            navigation_action(&settings, NavPhase::Completed, &home, LocalTime::new(2, 10, 0)),
            None
        );
    }

    #[test]
    fn test_phases_do_not_cross() {
        let settings = Settings::default();
        // TikTok is only handled before navigation, YouTube only after.
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::Completed,
                &details(0, "https://tiktok.com/"),
                noon_monday(),
            ),
            None
        );
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "https://www.youtube.com/"),
                noon_monday(),
            ),
            None
        );
    }

    #[test]
    fn test_unparseable_url_is_ignored() {
        let settings = Settings::default();
        assert_eq!(
            navigation_action(
                &settings,
                NavPhase::BeforeNavigate,
                &details(0, "not a url"),
                noon_monday(),
            ),
            None
        );
    }
}
