#![forbid(unsafe_code)]

//! Host capabilities.
//!
//! The runtime never touches a browser API directly. It consumes these
//! traits, implemented over `web-sys` by the web frontend and over an
//! in-memory tree by [`crate::testing::VirtualHost`].
//!
//! Elements are referred to by opaque [`ElementId`] handles that stay valid
//! for the life of the host.

use core::fmt;

use crate::clock::Clock;

/// Opaque, stable handle to a DOM element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a raw host index.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw host index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el#{}", self.0)
    }
}

/// Element query and mutation.
pub trait Dom {
    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementId>;

    /// First element matching a CSS selector.
    fn query(&self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// The `<body>` element.
    fn body(&self) -> Option<ElementId> {
        self.query("body")
    }

    /// Attribute value, `None` when absent.
    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;

    /// Set an attribute.
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);

    /// Whether the element's class list contains `class`.
    fn has_class(&self, el: ElementId, class: &str) -> bool;

    /// Add (`on == true`) or remove `class`.
    fn set_class(&mut self, el: ElementId, class: &str, on: bool);

    /// Toggle `class`; returns whether it is now present.
    fn toggle_class(&mut self, el: ElementId, class: &str) -> bool {
        let on = !self.has_class(el, class);
        self.set_class(el, class, on);
        on
    }

    /// Set an inline style property. An empty value removes the override.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);

    /// Inline style property, `None` when not set.
    fn style(&self, el: ElementId, property: &str) -> Option<String>;

    /// Move keyboard focus to `el`.
    fn focus(&mut self, el: ElementId);

    /// The element that currently has keyboard focus.
    fn active_element(&self) -> Option<ElementId>;

    /// Scroll `el` into the nearest visible position, centred inline.
    fn scroll_into_view(&mut self, el: ElementId, smooth: bool);

    /// Force a synchronous layout pass (e.g. by reading `offsetHeight`).
    fn force_reflow(&mut self, el: ElementId);
}

/// URL fragment access.
pub trait Location {
    /// Current fragment including the leading `#`, or empty.
    fn hash(&self) -> String;

    /// Replace the fragment without adding a history entry and without
    /// firing `hashchange` (`history.replaceState`).
    fn replace_hash(&mut self, hash: &str);
}

/// Viewport and user preference queries.
pub trait Viewport {
    /// Layout viewport width in CSS pixels (`window.innerWidth`).
    fn width(&self) -> u32;

    /// Whether `(prefers-reduced-motion: reduce)` currently matches.
    fn prefers_reduced_motion(&self) -> bool;

    /// Whether the document is hidden (`document.hidden`).
    fn is_hidden(&self) -> bool {
        false
    }
}

/// One-shot visibility notification.
///
/// After [`ViewportObserver::observe`], the host delivers
/// [`HostEvent::Intersecting`](crate::event::HostEvent::Intersecting) once the
/// element enters the viewport. The runtime calls
/// [`ViewportObserver::unobserve`] when it has reacted.
pub trait ViewportObserver {
    /// Start watching `el`.
    fn observe(&mut self, el: ElementId);

    /// Stop watching `el`.
    fn unobserve(&mut self, el: ElementId);
}

/// Everything the runtime needs from its environment.
pub trait Host: Dom + Location + Viewport + ViewportObserver + Clock {}

impl<T: Dom + Location + Viewport + ViewportObserver + Clock> Host for T {}

/// Split a link target into its fragment: `"/page#about"` → `Some("about")`.
///
/// Returns `None` when there is no fragment or it is empty.
#[must_use]
pub fn fragment(href: &str) -> Option<&str> {
    let (_, frag) = href.split_once('#')?;
    let frag = frag.split('#').next().unwrap_or(frag);
    if frag.is_empty() { None } else { Some(frag) }
}
