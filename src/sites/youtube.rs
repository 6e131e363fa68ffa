/// YouTube toggle transformations
///
/// Selectors track the ytd-* custom elements of the current layout; when
/// the markup shifts, a stale selector degrades to a no-op.
use web_sys::Document;

use super::Toggle;
use crate::dom;
use crate::media::MediaGate;

const SHORTS_CLASS: &str = "shield-yt-shorts-hidden";
const RELATED_CLASS: &str = "shield-yt-related-hidden";
const EXPAND_CLASS: &str = "shield-yt-primary-expanded";
const COMMENTS_CLASS: &str = "shield-yt-comments-hidden";
const ENDSCREEN_CLASS: &str = "shield-yt-endscreen-hidden";
const BADGES_CLASS: &str = "shield-yt-badges-hidden";

/// Wrapper the autoplay gate searches for play buttons.
const PLAYER_SELECTOR: &str = "#movie_player, ytd-player";

pub static TOGGLES: [Toggle; 6] = [
    Toggle {
        name: "hide-shorts",
        enabled: |s| s.youtube.hide_shorts,
        apply: hide_shorts,
        clear: |doc, _| dom::unmark_all(doc, SHORTS_CLASS),
    },
    Toggle {
        name: "hide-related",
        enabled: |s| s.youtube.hide_related,
        apply: hide_related,
        clear: clear_related,
    },
    Toggle {
        name: "hide-comments",
        enabled: |s| s.youtube.hide_comments,
        apply: hide_comments,
        clear: |doc, _| dom::unmark_all(doc, COMMENTS_CLASS),
    },
    Toggle {
        name: "hide-endscreen",
        enabled: |s| s.youtube.hide_endscreen,
        apply: hide_endscreen,
        clear: |doc, _| dom::unmark_all(doc, ENDSCREEN_CLASS),
    },
    Toggle {
        name: "hide-header-badges",
        enabled: |s| s.youtube.hide_header_badges,
        apply: hide_header_badges,
        clear: |doc, _| dom::unmark_all(doc, BADGES_CLASS),
    },
    Toggle {
        name: "block-autoplay",
        enabled: |s| s.youtube.disable_autoplay,
        apply: |doc, gate| gate.block_autoplay(doc, PLAYER_SELECTOR),
        clear: |doc, gate| gate.release_all(doc),
    },
];

fn hide_shorts(doc: &Document, _gate: &MediaGate) {
    // Shelf sections on the home and search feeds.
    dom::for_each(doc, "[title=\"Shorts\"], [aria-label*=\"Shorts\"]", |el| {
        dom::mark_closest(
            &el,
            "ytd-rich-section-renderer, ytd-reel-shelf-renderer",
            SHORTS_CLASS,
        );
    });

    // The Shorts entry in the guide rail.
    if let Ok(Some(tab)) = doc.query_selector("a[title=\"Shorts\"]") {
        dom::mark_closest(
            &tab,
            "ytd-guide-entry-renderer, ytd-mini-guide-entry-renderer",
            SHORTS_CLASS,
        );
    }

    // Individual shorts cards mixed into regular feeds.
    dom::for_each(doc, "a[href*=\"/shorts/\"]", |link| {
        dom::mark_closest(
            &link,
            "ytd-video-renderer, ytd-grid-video-renderer, ytd-rich-item-renderer",
            SHORTS_CLASS,
        );
    });
}

fn hide_related(doc: &Document, _gate: &MediaGate) {
    dom::for_each(doc, "#secondary, #related, #secondary-inner", |el| {
        dom::mark(&el, RELATED_CLASS);
    });
    // Let the player column take the reclaimed width.
    if let Ok(Some(primary)) = doc.query_selector("#primary") {
        dom::mark(&primary, EXPAND_CLASS);
    }
}

fn clear_related(doc: &Document, _gate: &MediaGate) {
    dom::unmark_all(doc, RELATED_CLASS);
    dom::unmark_all(doc, EXPAND_CLASS);
}

fn hide_comments(doc: &Document, _gate: &MediaGate) {
    dom::for_each(
        doc,
        "#comments, ytd-comments, ytd-comment-thread-renderer, ytd-comment-renderer",
        |el| dom::mark(&el, COMMENTS_CLASS),
    );
}

fn hide_endscreen(doc: &Document, _gate: &MediaGate) {
    dom::for_each(doc, ".ytp-endscreen-content, .ytp-ce-element", |el| {
        dom::mark(&el, ENDSCREEN_CLASS);
    });
}

fn hide_header_badges(doc: &Document, _gate: &MediaGate) {
    dom::for_each(
        doc,
        "ytd-notification-topbar-button-renderer .yt-spec-icon-badge-shape__badge",
        |el| dom::mark(&el, BADGES_CLASS),
    );
}
