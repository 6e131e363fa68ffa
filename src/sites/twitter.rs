/// Twitter/X toggle transformations
///
/// The timeline tabs expose no stable machine-readable identity, so tab
/// matching keys off the visible label in the supported locales.
use web_sys::Document;

use super::Toggle;
use crate::dom;
use crate::media::MediaGate;

const FOR_YOU_TAB_CLASS: &str = "shield-tw-foryou-hidden";
const RECOMMENDATIONS_CLASS: &str = "shield-tw-recommendations-hidden";
const TRENDS_CLASS: &str = "shield-tw-trends-hidden";

/// Timeline tab labels, per locale.
const FOLLOWING_LABELS: [&str; 2] = ["Following", "フォロー中"];
const FOR_YOU_LABELS: [&str; 2] = ["For you", "おすすめ"];

/// Sidebar sections hidden by the trends toggle, matched against
/// aria-labels and section headings.
const TREND_MARKERS: [&str; 8] = [
    "Trending",
    "トレンド",
    "What",
    "いま",
    "News",
    "ニュース",
    "Follow",
    "おすすめ",
];

/// Set once per tab session after the timeline has been switched to
/// Following, so the user can switch back without being fought.
const SESSION_SWITCH_KEY: &str = "shield-following-switched";

/// Wrapper the autoplay gate searches for play buttons.
const PLAYER_SELECTOR: &str =
    "[data-testid=\"videoPlayer\"], [data-testid=\"videoComponent\"], article";

pub static TOGGLES: [Toggle; 4] = [
    Toggle {
        name: "default-following",
        enabled: |s| s.twitter.default_following,
        apply: switch_to_following,
        // Focus redirection leaves no marker to clear.
        clear: |_, _| {},
    },
    Toggle {
        name: "hide-recommendations",
        enabled: |s| s.twitter.hide_recommendations,
        apply: hide_recommendations,
        clear: clear_recommendations,
    },
    Toggle {
        name: "hide-trends",
        enabled: |s| s.twitter.hide_trends,
        apply: hide_trends,
        clear: |doc, _| dom::unmark_all(doc, TRENDS_CLASS),
    },
    Toggle {
        name: "block-autoplay",
        enabled: |s| s.twitter.stop_autoplay,
        apply: |doc, gate| gate.block_autoplay(doc, PLAYER_SELECTOR),
        clear: |doc, gate| gate.release_all(doc),
    },
];

/// One-time switch of the home timeline to the Following tab.
fn switch_to_following(doc: &Document, _gate: &MediaGate) {
    if dom::current_pathname().as_deref() != Some("/home") {
        return;
    }
    if dom::session_flag(SESSION_SWITCH_KEY) {
        return;
    }

    let mut switched = false;
    dom::for_each(doc, "[role=\"tab\"]", |tab| {
        let text = dom::text_of(&tab);
        if FOLLOWING_LABELS.contains(&text.as_str())
            && tab.get_attribute("aria-selected").as_deref() != Some("true")
        {
            dom::click(&tab);
            switched = true;
        }
    });

    if switched {
        dom::set_session_flag(SESSION_SWITCH_KEY);
    }
}

fn hide_recommendations(doc: &Document, _gate: &MediaGate) {
    // Hide the For-you tab and keep the timeline on Following.
    let mut following_tab = None;
    let mut saw_for_you = false;
    dom::for_each(doc, "[role=\"tab\"]", |tab| {
        let text = dom::text_of(&tab);
        if FOR_YOU_LABELS.contains(&text.as_str()) {
            saw_for_you = true;
            dom::mark(&tab, FOR_YOU_TAB_CLASS);
        } else if FOLLOWING_LABELS.contains(&text.as_str()) {
            following_tab = Some(tab);
        }
    });
    if saw_for_you {
        if let Some(tab) = following_tab {
            if tab.get_attribute("aria-selected").as_deref() != Some("true") {
                dom::click(&tab);
            }
        }
    }

    // Who-to-follow and topic shelves anywhere on the page.
    let shelf_selectors = [
        "[aria-label*=\"Who to follow\"], [aria-label*=\"おすすめユーザー\"]",
        "[aria-label*=\"Topics\"], [aria-label*=\"トピック\"]",
    ];
    for selector in shelf_selectors {
        dom::for_each(doc, selector, |el| {
            dom::mark_closest(&el, "section, aside", RECOMMENDATIONS_CLASS);
        });
    }
}

fn clear_recommendations(doc: &Document, _gate: &MediaGate) {
    dom::unmark_all(doc, FOR_YOU_TAB_CLASS);
    dom::unmark_all(doc, RECOMMENDATIONS_CLASS);
}

/// Hide trending/news/follow-suggestion sections, sidebar column only;
/// the left navigation's Explore entry shares some of these labels.
fn hide_trends(doc: &Document, _gate: &MediaGate) {
    let Ok(Some(sidebar)) = doc.query_selector("[data-testid=\"sidebarColumn\"]") else {
        return;
    };

    dom::for_each_in(&sidebar, "section, aside, div[aria-label]", |section| {
        let label = section.get_attribute("aria-label").unwrap_or_default();
        let heading = section
            .query_selector("h2, h1")
            .ok()
            .flatten()
            .map(|h| dom::text_of(&h))
            .unwrap_or_default();
        if TREND_MARKERS
            .iter()
            .any(|marker| label.contains(marker) || heading.contains(marker))
        {
            dom::mark(&section, TRENDS_CLASS);
        }
    });

    // Labelled leaves whose section wrapper carries no label of its own.
    let leaf_selectors = [
        "[aria-label*=\"happening\"], [aria-label*=\"いま\"]",
        "[aria-label*=\"News\"], [aria-label*=\"ニュース\"]",
        "[aria-label*=\"follow\"], [aria-label*=\"おすすめ\"]",
    ];
    for selector in leaf_selectors {
        dom::for_each_in(&sidebar, selector, |el| {
            if let Ok(Some(container)) = el.closest("section, aside, div") {
                let node: &web_sys::Node = container.as_ref();
                if sidebar.contains(Some(node)) {
                    dom::mark(&container, TRENDS_CLASS);
                }
            }
        });
    }
}
