#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use folio_core::event::{EventOutcome, HostEvent, missed_lifecycle, normalize_dom_key};
use folio_core::host::Viewport;
use folio_runtime::config::SiteConfig;
use folio_runtime::filter::FilterChange;
use folio_runtime::site::Site;
use js_sys::Array;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;
use wasm_bindgen::prelude::*;
use web_sys::{
    Event, EventTarget, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent,
};

use crate::console;
use crate::host::WebHost;

/// Route `tracing` output to the browser console. `level` defaults to `info`.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) -> Result<(), JsValue> {
    let level = match level.as_deref() {
        None => LevelFilter::INFO,
        Some(name) => name
            .parse::<LevelFilter>()
            .map_err(|err| JsValue::from_str(&format!("invalid log level `{name}`: {err}")))?,
    };
    console::install(level);
    Ok(())
}

/// Which native event a listener translates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    DomReady,
    Load,
    Click,
    Key,
    Touch,
    Resize,
    Orientation,
    Visibility,
    HashChange,
    Motion,
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum On {
    Window,
    Document,
    MotionQuery,
}

const LISTENERS: [(Source, On, &str); 10] = [
    (Source::DomReady, On::Document, "DOMContentLoaded"),
    (Source::Load, On::Window, "load"),
    (Source::Click, On::Document, "click"),
    (Source::Key, On::Document, "keydown"),
    (Source::Touch, On::Document, "touchstart"),
    (Source::Resize, On::Window, "resize"),
    (Source::Orientation, On::Window, "orientationchange"),
    (Source::Visibility, On::Document, "visibilitychange"),
    (Source::HashChange, On::Window, "hashchange"),
    (Source::Motion, On::MotionQuery, "change"),
];

/// State shared between the JS handle and every callback.
struct Shared {
    site: RefCell<Site<WebHost>>,
    timeout: Cell<Option<i32>>,
    tick: RefCell<Option<Closure<dyn FnMut()>>>,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// The interactive layer of the current page.
#[wasm_bindgen]
pub struct FolioSite {
    shared: Rc<Shared>,
    listeners: Vec<Listener>,
    observer_callback: Option<Closure<dyn FnMut(Array, IntersectionObserver)>>,
    started: bool,
}

#[wasm_bindgen]
impl FolioSite {
    /// Create the runtime. `options` is a JSON object overriding any subset
    /// of the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<FolioSite, JsValue> {
        let config = match options.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                SiteConfig::from_json(json).map_err(|err| JsValue::from_str(&err.to_string()))?
            }
            _ => SiteConfig::default(),
        };
        let host = WebHost::new()?;
        let shared = Rc::new(Shared {
            site: RefCell::new(Site::new(host, config)),
            timeout: Cell::new(None),
            tick: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let tick = Closure::<dyn FnMut()>::new(move || {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            shared.timeout.set(None);
            match shared.site.try_borrow_mut() {
                Ok(mut site) => {
                    site.run_due_timers();
                }
                Err(_) => warn!("timer fired during dispatch"),
            }
            rearm(&shared);
        });
        *shared.tick.borrow_mut() = Some(tick);

        Ok(Self {
            shared,
            listeners: Vec::new(),
            observer_callback: None,
            started: false,
        })
    }

    /// Attach listeners and run setup as soon as the DOM allows.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        self.install_observer()?;
        self.install_listeners()?;

        let state = self.shared.site.borrow().host().document().ready_state();
        for event in missed_lifecycle(&state) {
            dispatch(&self.shared, event);
        }
        debug!(%state, "folio started");
        Ok(())
    }

    /// Switch the services filter. Returns `false` when nothing changed.
    pub fn filter(&self, category: &str) -> bool {
        let change = match self.shared.site.try_borrow_mut() {
            Ok(mut site) => site.filter(category),
            Err(_) => return false,
        };
        rearm(&self.shared);
        matches!(change, Some(FilterChange::Applied { .. }))
    }

    #[wasm_bindgen(js_name = currentFilter)]
    pub fn current_filter(&self) -> Option<String> {
        self.shared.site.borrow().current_filter().map(str::to_string)
    }

    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> Option<String> {
        self.shared.site.borrow().active_section().map(str::to_string)
    }

    /// Detach everything. The instance is inert afterwards.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        let mut site = self.shared.site.borrow_mut();
        site.shutdown();
        if let Some(observer) = site.host_mut().take_observer() {
            observer.disconnect();
        }
        if let Some(handle) = self.shared.timeout.take() {
            site.host().window().clear_timeout_with_handle(handle);
        }
        drop(site);
        self.observer_callback = None;
        self.started = false;
        debug!("folio destroyed");
    }
}

impl Drop for FolioSite {
    fn drop(&mut self) {
        if self.started {
            self.destroy();
        }
    }
}

impl FolioSite {
    fn install_observer(&mut self) -> Result<(), JsValue> {
        let weak = Rc::downgrade(&self.shared);
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let Some(shared) = weak.upgrade() else {
                    return;
                };
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = shared.site.borrow().host().lookup(&entry.target());
                    if let Some(target) = target {
                        dispatch(&shared, HostEvent::Intersecting { target });
                    }
                }
            },
        );

        let mut site = self.shared.site.borrow_mut();
        let reveal = &site.config().reveal;
        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(reveal.threshold));
        options.set_root_margin(&reveal.root_margin);
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
        site.host_mut().set_observer(observer);
        drop(site);
        self.observer_callback = Some(callback);
        Ok(())
    }

    fn install_listeners(&mut self) -> Result<(), JsValue> {
        for (source, on, kind) in LISTENERS {
            let target: EventTarget = {
                let site = self.shared.site.borrow();
                let host = site.host();
                match on {
                    On::Window => host.window().clone().into(),
                    On::Document => host.document().clone().into(),
                    On::MotionQuery => match host.motion_query() {
                        Some(query) => query.clone().into(),
                        None => continue,
                    },
                }
            };
            let weak = Rc::downgrade(&self.shared);
            let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                on_native_event(&weak, source, &event);
            });
            target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
            self.listeners.push(Listener {
                target,
                kind,
                callback,
            });
        }
        Ok(())
    }
}

fn on_native_event(weak: &Weak<Shared>, source: Source, event: &Event) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let translated = match shared.site.try_borrow() {
        Ok(site) => translate(source, event, site.host()),
        Err(_) => {
            warn!(?source, "event dropped during dispatch");
            return;
        }
    };
    let Some(host_event) = translated else {
        return;
    };
    if dispatch(&shared, host_event).prevent_default {
        event.prevent_default();
    }
}

fn translate(source: Source, event: &Event, host: &WebHost) -> Option<HostEvent> {
    Some(match source {
        Source::DomReady => HostEvent::DomReady,
        Source::Load => HostEvent::WindowLoad,
        Source::Click => HostEvent::Click {
            target: host.resolve_target(event.target())?,
        },
        Source::Key => {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            HostEvent::Key {
                target: host.resolve_target(event.target()),
                code: normalize_dom_key(&key),
            }
        }
        Source::Touch => HostEvent::TouchStart {
            target: host.resolve_target(event.target())?,
        },
        Source::Resize => {
            let height = host
                .window()
                .inner_height()
                .ok()
                .and_then(|h| h.as_f64())
                .map_or(0, |h| h.max(0.0) as u32);
            HostEvent::Resize {
                width: host.width(),
                height,
            }
        }
        Source::Orientation => HostEvent::OrientationChange,
        Source::Visibility => HostEvent::VisibilityChange {
            hidden: host.is_hidden(),
        },
        Source::HashChange => HostEvent::HashChange {
            hash: host.window().location().hash().unwrap_or_default(),
        },
        Source::Motion => HostEvent::MotionPreference {
            reduced: host.prefers_reduced_motion(),
        },
    })
}

fn dispatch(shared: &Shared, event: HostEvent) -> EventOutcome {
    let outcome = match shared.site.try_borrow_mut() {
        Ok(mut site) => {
            let outcome = site.handle_event(event);
            site.run_due_timers();
            outcome
        }
        Err(_) => {
            warn!(?event, "re-entrant event dropped");
            return EventOutcome::IGNORED;
        }
    };
    rearm(shared);
    outcome
}

/// Point the single pending `setTimeout` at the earliest runtime deadline.
fn rearm(shared: &Shared) {
    let Ok(site) = shared.site.try_borrow() else {
        return;
    };
    let window = site.host().window();
    if let Some(handle) = shared.timeout.take() {
        window.clear_timeout_with_handle(handle);
    }
    let Some(deadline) = site.next_deadline() else {
        return;
    };
    let now = folio_core::clock::Clock::now_mono(site.host());
    let delay = deadline.saturating_sub(now).as_millis();
    let delay = i32::try_from(delay).unwrap_or(i32::MAX);
    let tick = shared.tick.borrow();
    let Some(tick) = tick.as_ref() else {
        return;
    };
    match window
        .set_timeout_with_callback_and_timeout_and_arguments_0(tick.as_ref().unchecked_ref(), delay)
    {
        Ok(handle) => shared.timeout.set(Some(handle)),
        Err(err) => warn!(error = ?err, "setTimeout failed"),
    }
}
