/// Thin helpers over web-sys; every operation is best-effort
///
/// Hiding is expressed by adding a marker class to the matched element and
/// letting the extension stylesheet do the actual `display: none`. Reverting
/// a toggle is then just removing its class from every element that carries
/// it, so a missing element or a failed call is always a silent no-op.
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList};

/// Body class applied while the grayscale filter is on.
pub const GRAYSCALE_CLASS: &str = "shield-grayscale";

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn elements(list: NodeList) -> impl Iterator<Item = Element> {
    (0..list.length())
        .filter_map(move |i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
}

/// Run `f` for every element matching `selector` under the document.
pub fn for_each(doc: &Document, selector: &str, mut f: impl FnMut(Element)) {
    if let Ok(list) = doc.query_selector_all(selector) {
        for el in elements(list) {
            f(el);
        }
    }
}

/// Run `f` for every element matching `selector` under `scope`.
pub fn for_each_in(scope: &Element, selector: &str, mut f: impl FnMut(Element)) {
    if let Ok(list) = scope.query_selector_all(selector) {
        for el in elements(list) {
            f(el);
        }
    }
}

pub fn mark(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

/// Mark the nearest ancestor of `el` matching `ancestor_selector`.
pub fn mark_closest(el: &Element, ancestor_selector: &str, class: &str) {
    if let Ok(Some(ancestor)) = el.closest(ancestor_selector) {
        mark(&ancestor, class);
    }
}

/// Remove `class` from every element currently carrying it.
pub fn unmark_all(doc: &Document, class: &str) {
    for_each(doc, &format!(".{}", class), |el| {
        let _ = el.class_list().remove_1(class);
    });
}

pub fn set_body_class(doc: &Document, class: &str, on: bool) {
    let Some(body) = doc.body() else { return };
    if on {
        let _ = body.class_list().add_1(class);
    } else {
        let _ = body.class_list().remove_1(class);
    }
}

pub fn body_has_class(doc: &Document, class: &str) -> bool {
    doc.body()
        .map(|body| body.class_list().contains(class))
        .unwrap_or(false)
}

/// Dispatch a native click, used to redirect focus (e.g. tab switching).
pub fn click(el: &Element) {
    if let Some(el) = el.dyn_ref::<HtmlElement>() {
        el.click();
    }
}

pub fn text_of(el: &Element) -> String {
    el.text_content().unwrap_or_default()
}

pub fn current_pathname() -> Option<String> {
    web_sys::window()?.location().pathname().ok()
}

pub fn current_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

/// One-shot per-tab flags kept in sessionStorage, absent store reads false.
pub fn session_flag(key: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    matches!(window.session_storage(), Ok(Some(storage))
        if matches!(storage.get_item(key), Ok(Some(_))))
}

pub fn set_session_flag(key: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(Some(storage)) = window.session_storage() {
            let _ = storage.set_item(key, "true");
        }
    }
}
