/// Per-site restriction controller
///
/// Owns the settings snapshot for its page context; the snapshot is only
/// ever replaced wholesale by `update_settings`, never mutated. Every
/// trigger (mutation, interval, navigation, settings push) funnels through
/// `reconcile_entry`, which re-derives the page state from scratch.
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::Document;

use crate::dom;
use crate::media::MediaGate;
use crate::schedule::{LocalTime, restrictions_active};
use crate::settings::Settings;
use crate::sites::Site;
use crate::storage;
use crate::watch::{self, PageWatch};

pub struct SiteController {
    site: Site,
    settings: Settings,
    media: MediaGate,
    watch: Option<PageWatch>,
    was_active: bool,
}

impl SiteController {
    pub fn new(site: Site) -> SiteController {
        SiteController {
            site,
            settings: Settings::default(),
            media: MediaGate::new(),
            watch: None,
            was_active: false,
        }
    }

    /// Replace the settings snapshot. Takes effect on the next reconcile.
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Re-derive the page state from the current snapshot and clock.
    ///
    /// Idempotent: state comes from DOM queries and the snapshot each
    /// pass, so re-entry from any trigger converges on the same result.
    /// Returns whether restrictions are active.
    pub fn reconcile(&mut self, now: LocalTime) -> bool {
        let Some(doc) = dom::document() else {
            return false;
        };
        let active = restrictions_active(&self.settings, self.site, now);

        if !active {
            if self.was_active {
                log::debug!("{}: restrictions off, clearing markers", self.site.name());
            }
            self.deactivate(&doc);
            return false;
        }

        if !self.was_active {
            log::debug!("{}: restrictions on", self.site.name());
        }
        dom::set_body_class(&doc, self.site.gate_class(), true);
        // Grayscale is gated by the common block alone.
        dom::set_body_class(&doc, dom::GRAYSCALE_CLASS, self.settings.common.grayscale);

        // Disabled toggles get their markers cleared so a settings flip
        // takes effect without a reload.
        for toggle in self.site.toggles() {
            if (toggle.enabled)(&self.settings) {
                (toggle.apply)(&doc, &self.media);
            } else {
                (toggle.clear)(&doc, &self.media);
            }
        }
        self.was_active = true;
        true
    }

    fn deactivate(&mut self, doc: &Document) {
        dom::set_body_class(doc, self.site.gate_class(), false);
        dom::set_body_class(doc, dom::GRAYSCALE_CLASS, false);
        for toggle in self.site.toggles() {
            (toggle.clear)(doc, &self.media);
        }
        self.was_active = false;
    }

    fn ensure_watching(&mut self, ctrl: &Rc<RefCell<SiteController>>) {
        if self.watch.is_none() {
            match PageWatch::new(reconcile_callback(ctrl)) {
                Ok(watch) => self.watch = Some(watch),
                Err(e) => {
                    log::warn!("{}: mutation watch unavailable: {:?}", self.site.name(), e);
                    return;
                }
            }
        }
        if let Some(watch) = self.watch.as_mut() {
            watch.observe();
        }
    }

    fn pause_watching(&mut self) {
        if let Some(watch) = self.watch.as_mut() {
            watch.pause();
        }
    }
}

/// One reconcile pass plus watch upkeep; the single entry point every
/// trigger funnels through.
pub fn reconcile_entry(ctrl: &Rc<RefCell<SiteController>>) {
    let mut controller = ctrl.borrow_mut();
    let active = controller.reconcile(LocalTime::now());
    if active {
        controller.ensure_watching(ctrl);
    } else {
        controller.pause_watching();
    }
}

fn reconcile_callback(ctrl: &Rc<RefCell<SiteController>>) -> Rc<dyn Fn()> {
    let ctrl = ctrl.clone();
    Rc::new(move || reconcile_entry(&ctrl))
}

/// Start the content-script side for `site`: load settings, subscribe to
/// change pushes, and keep reconciling for the lifetime of the page.
pub fn launch(site: Site) {
    let ctrl = Rc::new(RefCell::new(SiteController::new(site)));

    // Initial load, then the first reconcile pass.
    {
        let ctrl = ctrl.clone();
        spawn_local(async move {
            let settings = storage::load_settings().await;
            ctrl.borrow_mut().update_settings(settings);
            reconcile_entry(&ctrl);
        });
    }

    // Settings pushes from the options popup replace the snapshot.
    {
        let ctrl = ctrl.clone();
        storage::on_settings_push(move |settings| {
            ctrl.borrow_mut().update_settings(settings);
            reconcile_entry(&ctrl);
        });
    }

    watch::start_interval(reconcile_callback(&ctrl));

    log::info!("{}: restriction controller running", site.name());
}
