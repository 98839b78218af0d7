#![forbid(unsafe_code)]

//! Canonical host events.
//!
//! The host (a browser frontend or a test harness) translates its native
//! events into [`HostEvent`] values and feeds them to the runtime one at a
//! time. Keyboard input is normalized from DOM `key` strings so the runtime
//! never sees platform spellings like `"Spacebar"` or `"Esc"`.

use crate::host::ElementId;

/// Normalized key code.
///
/// Only the keys the runtime reacts to get dedicated variants; anything else
/// is carried as [`KeyCode::Other`] so it can still be logged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Tab,
    Home,
    End,
    Up,
    Down,
    Left,
    Right,
    Other(Box<str>),
}

impl KeyCode {
    /// Whether this key activates a focused button (Enter or Space).
    #[must_use]
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Char(' '))
    }

    /// Step for roving focus: `-1` for Left/Up, `+1` for Right/Down.
    #[must_use]
    pub fn roving_step(&self) -> Option<isize> {
        match self {
            Self::Left | Self::Up => Some(-1),
            Self::Right | Self::Down => Some(1),
            _ => None,
        }
    }
}

/// Deterministic normalization of a DOM `KeyboardEvent.key` string.
#[must_use]
pub fn normalize_dom_key(dom_key: &str) -> KeyCode {
    let mut chars = dom_key.chars();
    if let Some(first) = chars.next()
        && chars.next().is_none()
    {
        return KeyCode::Char(first);
    }

    match dom_key {
        "Enter" => KeyCode::Enter,
        "Escape" | "Esc" => KeyCode::Escape,
        "Tab" => KeyCode::Tab,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        // Legacy spellings from older engines.
        "ArrowUp" | "Up" => KeyCode::Up,
        "ArrowDown" | "Down" => KeyCode::Down,
        "ArrowLeft" | "Left" => KeyCode::Left,
        "ArrowRight" | "Right" => KeyCode::Right,
        "Spacebar" => KeyCode::Char(' '),
        other => KeyCode::Other(other.into()),
    }
}

/// A host event delivered to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The DOM finished parsing (`DOMContentLoaded`).
    DomReady,
    /// All page resources finished loading (`window.load`).
    WindowLoad,
    /// Primary-button click on `target`.
    Click { target: ElementId },
    /// Key press. `target` is the focused element, if any.
    Key {
        target: Option<ElementId>,
        code: KeyCode,
    },
    /// Touch began on `target`.
    TouchStart { target: ElementId },
    /// Viewport resized to `width` x `height` CSS pixels.
    Resize { width: u32, height: u32 },
    /// Device orientation changed.
    OrientationChange,
    /// Page visibility changed; `hidden` mirrors `document.hidden`.
    VisibilityChange { hidden: bool },
    /// The URL fragment changed. `hash` includes the leading `#`.
    HashChange { hash: String },
    /// The `prefers-reduced-motion` media query flipped.
    MotionPreference { reduced: bool },
    /// An observed element crossed into the viewport.
    Intersecting { target: ElementId },
}

/// Lifecycle events a host attaching late has already missed, given the
/// DOM `document.readyState` string.
///
/// `loading` has missed nothing, `interactive` has missed DOM ready and
/// `complete` has missed both. Unknown states are treated as `loading`.
#[must_use]
pub fn missed_lifecycle(ready_state: &str) -> Vec<HostEvent> {
    match ready_state {
        "interactive" => vec![HostEvent::DomReady],
        "complete" => vec![HostEvent::DomReady, HostEvent::WindowLoad],
        _ => Vec::new(),
    }
}

/// What the host should do with the native event after dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventOutcome {
    /// Call `preventDefault()` on the native event.
    pub prevent_default: bool,
    /// The runtime changed state in response.
    pub handled: bool,
}

impl EventOutcome {
    /// Event ignored.
    pub const IGNORED: Self = Self {
        prevent_default: false,
        handled: false,
    };

    /// Event consumed; browser default still runs.
    pub const HANDLED: Self = Self {
        prevent_default: false,
        handled: true,
    };

    /// Event consumed and browser default suppressed.
    pub const CONSUMED: Self = Self {
        prevent_default: true,
        handled: true,
    };

    /// Combine two outcomes from independent handlers.
    #[must_use]
    pub const fn merge(self, other: Self) -> Self {
        Self {
            prevent_default: self.prevent_default || other.prevent_default,
            handled: self.handled || other.handled,
        }
    }
}
