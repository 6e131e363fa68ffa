/// Autoplay gate: pauses autoplaying media until the user asks for playback
///
/// Per-element state lives in an identity-keyed WeakMap side table rather
/// than DOM attributes, so site scripts rewriting attributes cannot clear
/// it and removed elements are collected with their entries.
use js_sys::WeakMap;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Document, Event, EventTarget, HtmlMediaElement};

use crate::dom;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayState {
    /// Gated: play events are cancelled and the element re-paused.
    Blocked,
    /// The user clicked play once; never interfere again.
    ManuallyResumed,
}

impl PlayState {
    fn as_str(self) -> &'static str {
        match self {
            PlayState::Blocked => "blocked",
            PlayState::ManuallyResumed => "manual",
        }
    }

    fn from_value(value: &JsValue) -> Option<PlayState> {
        match value.as_string()?.as_str() {
            "blocked" => Some(PlayState::Blocked),
            "manual" => Some(PlayState::ManuallyResumed),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct MediaGate {
    states: WeakMap,
}

impl MediaGate {
    pub fn new() -> MediaGate {
        MediaGate {
            states: WeakMap::new(),
        }
    }

    fn state(&self, el: &HtmlMediaElement) -> Option<PlayState> {
        PlayState::from_value(&self.states.get(el.unchecked_ref()))
    }

    fn set_state(&self, el: &HtmlMediaElement, state: PlayState) {
        self.states
            .set(el.unchecked_ref(), &JsValue::from_str(state.as_str()));
    }

    /// Gate every media element on the page that is not gated yet.
    ///
    /// `container_selector` names the site's player wrapper; play buttons
    /// inside it count as manual-play intent alongside clicks on the
    /// element itself. Safe to call on every reconcile pass.
    pub fn block_autoplay(&self, doc: &Document, container_selector: &str) {
        dom::for_each(doc, "video", |el| {
            let Ok(video) = el.dyn_into::<HtmlMediaElement>() else {
                return;
            };
            // Strip the attribute every pass: the site re-adds it on
            // re-render.
            let _ = video.remove_attribute("autoplay");

            if self.state(&video).is_some() {
                return;
            }
            self.set_state(&video, PlayState::Blocked);

            if !video.paused() {
                let _ = video.pause();
            }
            self.install_play_listener(&video);
            self.install_resume_triggers(&video, container_selector);
        });
    }

    /// Stop gating: blocked elements are marked manually-resumed so the
    /// play listeners go inert. Playback is not restarted.
    pub fn release_all(&self, doc: &Document) {
        dom::for_each(doc, "video", |el| {
            let Ok(video) = el.dyn_into::<HtmlMediaElement>() else {
                return;
            };
            if self.state(&video) == Some(PlayState::Blocked) {
                self.set_state(&video, PlayState::ManuallyResumed);
            }
        });
    }

    fn install_play_listener(&self, video: &HtmlMediaElement) {
        let gate = self.clone();
        let el = video.clone();
        let on_play = Closure::wrap(Box::new(move |event: Event| {
            if gate.state(&el) == Some(PlayState::Blocked) {
                event.prevent_default();
                let _ = el.pause();
            }
        }) as Box<dyn FnMut(Event)>);
        let _ = video.add_event_listener_with_callback("play", on_play.as_ref().unchecked_ref());
        // Lives as long as the element; one listener per element, the side
        // table guards against re-attaching.
        on_play.forget();
    }

    fn install_resume_triggers(&self, video: &HtmlMediaElement, container_selector: &str) {
        self.attach_resume_once(video.unchecked_ref(), video);

        if let Ok(Some(container)) = video.closest(container_selector) {
            dom::for_each_in(
                &container,
                "[aria-label*=\"Play\"], [role=\"button\"]",
                |button| {
                    self.attach_resume_once(button.unchecked_ref(), video);
                },
            );
            self.attach_resume_once(container.unchecked_ref(), video);
        }
    }

    fn attach_resume_once(&self, target: &EventTarget, video: &HtmlMediaElement) {
        let gate = self.clone();
        let el = video.clone();
        let on_click = Closure::wrap(Box::new(move |_: Event| {
            gate.mark_resumed(&el);
        }) as Box<dyn FnMut(Event)>);

        let opts = AddEventListenerOptions::new();
        opts.set_once(true);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            "click",
            on_click.as_ref().unchecked_ref(),
            &opts,
        );
        on_click.forget();
    }

    fn mark_resumed(&self, video: &HtmlMediaElement) {
        self.set_state(video, PlayState::ManuallyResumed);

        // Restart shortly after the click so the site's own pause/play
        // handling has settled.
        let el = video.clone();
        let start = Closure::wrap(Box::new(move || {
            let _ = el.play();
        }) as Box<dyn FnMut()>);
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                start.as_ref().unchecked_ref(),
                50,
            );
        }
        start.forget();
    }
}

impl Default for MediaGate {
    fn default() -> Self {
        Self::new()
    }
}
