#![forbid(unsafe_code)]

//! Roving tabindex over a fixed row of controls.
//!
//! Exactly one control is tab-reachable (`tabindex="0"`); the rest carry
//! `tabindex="-1"`. Arrow keys move the marker circularly and focus follows.

/// Position of the tab stop within a row of `len` controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RovingTabindex {
    len: usize,
    current: usize,
}

impl RovingTabindex {
    /// Tab stop on the first of `len` controls.
    #[must_use]
    pub const fn new(len: usize) -> Self {
        Self { len, current: 0 }
    }

    /// Number of controls.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the row is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index holding the tab stop, `None` for an empty row.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        if self.len == 0 { None } else { Some(self.current) }
    }

    /// Move the tab stop `step` places from `from`, wrapping at both ends.
    ///
    /// Movement is relative to `from` (the focused control), not to the
    /// current tab stop, so a mouse-focused control is honoured.
    pub fn step_from(&mut self, from: usize, step: isize) -> Option<usize> {
        if self.len == 0 || from >= self.len {
            return None;
        }
        let len = self.len as isize;
        let next = (from as isize + step).rem_euclid(len) as usize;
        self.current = next;
        Some(next)
    }

    /// `tabindex` attribute value for control `index`.
    #[must_use]
    pub fn tabindex(&self, index: usize) -> &'static str {
        if self.current() == Some(index) { "0" } else { "-1" }
    }
}
