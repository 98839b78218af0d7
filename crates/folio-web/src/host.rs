#![forbid(unsafe_code)]

//! Folio host capabilities over `web-sys`.

use std::cell::RefCell;
use std::time::Duration;

use folio_core::clock::Clock;
use folio_core::host::{Dom, ElementId, Location, Viewport, ViewportObserver};
use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, EventTarget, HtmlElement, IntersectionObserver, MediaQueryList,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};
use web_time::Instant;

use crate::registry::Registry;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// The live page.
pub(crate) struct WebHost {
    window: Window,
    document: Document,
    registry: RefCell<Registry<Element>>,
    observer: Option<IntersectionObserver>,
    motion_query: Option<MediaQueryList>,
    epoch: Instant,
}

impl WebHost {
    pub(crate) fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let motion_query = window.match_media(REDUCED_MOTION_QUERY).ok().flatten();
        Ok(Self {
            window,
            document,
            registry: RefCell::new(Registry::new()),
            observer: None,
            motion_query,
            epoch: Instant::now(),
        })
    }

    pub(crate) fn window(&self) -> &Window {
        &self.window
    }

    pub(crate) fn document(&self) -> &Document {
        &self.document
    }

    pub(crate) fn motion_query(&self) -> Option<&MediaQueryList> {
        self.motion_query.as_ref()
    }

    pub(crate) fn set_observer(&mut self, observer: IntersectionObserver) {
        self.observer = Some(observer);
    }

    pub(crate) fn take_observer(&mut self) -> Option<IntersectionObserver> {
        self.observer.take()
    }

    /// Known element at `target` or its nearest known ancestor.
    pub(crate) fn resolve_target(&self, target: Option<EventTarget>) -> Option<ElementId> {
        let start = target?.dyn_into::<Element>().ok()?;
        let chain = std::iter::successors(Some(start), |el| el.parent_element());
        self.registry.borrow().find_in(chain)
    }

    /// Id of an element the runtime has already queried.
    pub(crate) fn lookup(&self, el: &Element) -> Option<ElementId> {
        self.registry.borrow().find(el)
    }

    fn element(&self, id: ElementId) -> Option<Element> {
        self.registry.borrow().get(id).cloned()
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }
}

fn log_js_error(op: &str, err: &JsValue) {
    warn!(op, error = ?err, "DOM call failed");
}

impl Dom for WebHost {
    fn query_all(&self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                log_js_error("query_selector_all", &err);
                return Vec::new();
            }
        };
        let mut registry = self.registry.borrow_mut();
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| registry.intern(el))
            .collect()
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(element) = self.element(el)
            && let Err(err) = element.set_attribute(name, value)
        {
            log_js_error("set_attribute", &err);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn set_class(&mut self, el: ElementId, class: &str, on: bool) {
        let Some(element) = self.element(el) else {
            return;
        };
        let list = element.class_list();
        let result = if on { list.add_1(class) } else { list.remove_1(class) };
        if let Err(err) = result {
            log_js_error("class_list", &err);
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(element) = self.html(el) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(drop)
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            log_js_error("style", &err);
        }
    }

    fn style(&self, el: ElementId, property: &str) -> Option<String> {
        let value = self.html(el)?.style().get_property_value(property).ok()?;
        (!value.is_empty()).then_some(value)
    }

    fn focus(&mut self, el: ElementId) {
        if let Some(element) = self.html(el)
            && let Err(err) = element.focus()
        {
            log_js_error("focus", &err);
        }
    }

    fn active_element(&self) -> Option<ElementId> {
        self.lookup(&self.document.active_element()?)
    }

    fn scroll_into_view(&mut self, el: ElementId, smooth: bool) {
        let Some(element) = self.element(el) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        options.set_block(ScrollLogicalPosition::Nearest);
        options.set_inline(ScrollLogicalPosition::Center);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn force_reflow(&mut self, el: ElementId) {
        if let Some(element) = self.html(el) {
            // Reading a layout property flushes pending style changes.
            let _ = element.offset_height();
        }
    }
}

impl Location for WebHost {
    fn hash(&self) -> String {
        self.window.location().hash().unwrap_or_default()
    }

    fn replace_hash(&mut self, hash: &str) {
        let result = self
            .window
            .history()
            .and_then(|history| history.replace_state_with_url(&JsValue::NULL, "", Some(hash)));
        if let Err(err) = result {
            log_js_error("history.replaceState", &err);
        }
    }
}

impl Viewport for WebHost {
    fn width(&self) -> u32 {
        self.window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .map_or(0, |w| w.max(0.0) as u32)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.motion_query.as_ref().is_some_and(MediaQueryList::matches)
    }

    fn is_hidden(&self) -> bool {
        self.document.hidden()
    }
}

impl ViewportObserver for WebHost {
    fn observe(&mut self, el: ElementId) {
        if let (Some(observer), Some(element)) = (&self.observer, self.element(el)) {
            observer.observe(&element);
        }
    }

    fn unobserve(&mut self, el: ElementId) {
        if let (Some(observer), Some(element)) = (&self.observer, self.element(el)) {
            observer.unobserve(&element);
        }
    }
}

impl Clock for WebHost {
    fn now_mono(&self) -> Duration {
        self.epoch.elapsed()
    }
}

impl std::fmt::Debug for WebHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebHost")
            .field("elements", &self.registry.borrow().len())
            .field("observing", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
