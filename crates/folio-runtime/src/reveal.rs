#![forbid(unsafe_code)]

//! One-shot scroll reveal.
//!
//! Elements matching the reveal selector are handed to the host's viewport
//! observer. The first time one intersects it gains the visible class and is
//! never observed again.

use folio_core::host::{ElementId, Host};
use tracing::{debug, trace};

use crate::config::RevealConfig;

/// Tracks which reveal targets are still waiting.
#[derive(Debug)]
pub struct RevealController {
    config: RevealConfig,
    initialized: bool,
    pending: Vec<ElementId>,
    revealed: usize,
}

impl RevealController {
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            initialized: false,
            pending: Vec::new(),
            revealed: 0,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Elements still waiting to intersect.
    #[must_use]
    pub fn pending(&self) -> &[ElementId] {
        &self.pending
    }

    /// Number of elements revealed so far.
    #[must_use]
    pub const fn revealed(&self) -> usize {
        self.revealed
    }

    /// Start observing. Skipped when motion is reduced or already running.
    ///
    /// Returns the number of elements newly observed.
    pub fn setup<H: Host>(&mut self, host: &mut H) -> usize {
        if self.initialized {
            return 0;
        }
        if host.prefers_reduced_motion() {
            trace!("reveal skipped: reduced motion");
            return 0;
        }
        let targets: Vec<ElementId> = host
            .query_all(&self.config.selector)
            .into_iter()
            .filter(|&el| !host.has_class(el, &self.config.visible_class))
            .collect();
        if targets.is_empty() {
            trace!("reveal skipped: nothing to observe");
            return 0;
        }
        self.initialized = true;
        self.pending = targets;
        for &el in &self.pending {
            host.observe(el);
        }
        debug!(observed = self.pending.len(), "scroll reveal armed");
        self.pending.len()
    }

    /// `target` crossed into view.
    pub fn on_intersecting<H: Host>(&mut self, host: &mut H, target: ElementId) -> bool {
        let Some(pos) = self.pending.iter().position(|&el| el == target) else {
            return false;
        };
        self.pending.remove(pos);
        host.set_class(target, &self.config.visible_class, true);
        host.unobserve(target);
        self.revealed += 1;
        true
    }

    /// Page became visible again: retry setup if it never ran.
    pub fn on_visibility_change<H: Host>(&mut self, host: &mut H, hidden: bool) -> bool {
        if hidden || self.initialized {
            return false;
        }
        self.setup(host) > 0
    }

    /// Freeze reveal transitions while motion is reduced.
    pub fn set_reduced_motion<H: Host>(&self, host: &mut H, reduced: bool) {
        let value = if reduced { "none" } else { "" };
        for el in host.query_all(&self.config.selector) {
            host.set_style(el, "transition", value);
        }
    }
}
