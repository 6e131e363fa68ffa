/// Reconciliation triggers: DOM mutations, a fixed cadence, URL changes
///
/// All three triggers funnel into the same idempotent reconcile callback,
/// so their relative ordering never matters.
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{MutationObserver, MutationObserverInit};

use crate::dom;

/// Milliseconds between scheduled re-evaluations; catches restriction
/// windows opening or closing while the page sits idle.
pub const RECONCILE_INTERVAL_MS: i32 = 60_000;

/// Delay before re-running after a same-document navigation, giving the
/// app shell time to render the new route.
const NAVIGATION_SETTLE_MS: i32 = 500;

/// Watches the page body for structural changes while restrictions are
/// active. Paused (observer disconnected) whenever they are not, so an
/// idle controller costs nothing on a busy feed page.
pub struct PageWatch {
    observer: MutationObserver,
    observing: bool,
    // Keeps the callback alive for as long as the observer can fire.
    _on_mutate: Closure<dyn FnMut()>,
}

impl PageWatch {
    /// Build the watch; it starts paused.
    ///
    /// `reconcile` runs on every observed DOM change, and again shortly
    /// after the page's URL changes without a full load.
    pub fn new(reconcile: Rc<dyn Fn()>) -> Result<PageWatch, JsValue> {
        let last_href = RefCell::new(dom::current_href().unwrap_or_default());
        let on_mutate = Closure::wrap(Box::new(move || {
            if let Some(href) = dom::current_href() {
                let moved = *last_href.borrow() != href;
                if moved {
                    last_href.replace(href);
                    schedule_settled_run(&reconcile);
                }
            }
            reconcile();
        }) as Box<dyn FnMut()>);

        let observer = MutationObserver::new(on_mutate.as_ref().unchecked_ref())?;
        Ok(PageWatch {
            observer,
            observing: false,
            _on_mutate: on_mutate,
        })
    }

    pub fn observe(&mut self) {
        if self.observing {
            return;
        }
        let Some(body) = dom::document().and_then(|doc| doc.body()) else {
            return;
        };
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        if self.observer.observe_with_options(&body, &init).is_ok() {
            self.observing = true;
        }
    }

    pub fn pause(&mut self) {
        if !self.observing {
            return;
        }
        self.observer.disconnect();
        self.observing = false;
    }
}

fn schedule_settled_run(reconcile: &Rc<dyn Fn()>) {
    let reconcile = reconcile.clone();
    // One-shot closure, freed after it fires.
    let callback = Closure::once_into_js(move || reconcile());
    if let Some(window) = web_sys::window() {
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            NAVIGATION_SETTLE_MS,
        );
    }
}

/// Run `reconcile` once a minute for the lifetime of the page.
///
/// The interval keeps ticking while restrictions are off; it is what
/// notices a restriction window opening with no DOM activity at all.
pub fn start_interval(reconcile: Rc<dyn Fn()>) {
    let callback = Closure::wrap(Box::new(move || reconcile()) as Box<dyn FnMut()>);
    if let Some(window) = web_sys::window() {
        if let Err(e) = window.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            RECONCILE_INTERVAL_MS,
        ) {
            log::warn!("could not start reconcile interval: {:?}", e);
        }
    }
    callback.forget();
}
