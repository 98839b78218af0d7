#![forbid(unsafe_code)]

//! Page load sequencing.
//!
//! The body carries the preload class from DOM ready until the page
//! settles, which happens shortly after `window.load` or, failing that, at a
//! fixed fallback after DOM ready. Whichever fires first wins; the other is
//! cancelled.

use folio_core::host::Host;
use folio_core::scheduler::TimerId;
use tracing::debug;

use crate::config::PageLoadConfig;
use crate::task::{Task, Timers};

/// Load phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// DOM not ready yet.
    #[default]
    Parsing,
    /// DOM ready; waiting for resources or the fallback.
    Preloading,
    /// Settled.
    Loaded,
}

/// Deferred load step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadTask {
    /// Short settle after `window.load`.
    Settle,
    /// Safety net when `window.load` is slow or never arrives.
    Fallback,
}

#[derive(Debug)]
pub struct PageLoad {
    config: PageLoadConfig,
    phase: LoadPhase,
    settle: Option<TimerId>,
    fallback: Option<TimerId>,
}

impl PageLoad {
    #[must_use]
    pub fn new(config: PageLoadConfig) -> Self {
        Self {
            config,
            phase: LoadPhase::Parsing,
            settle: None,
            fallback: None,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> LoadPhase {
        self.phase
    }

    /// DOM parsed: mark the body and arm the fallback.
    pub fn dom_ready<H: Host>(&mut self, host: &mut H, timers: &mut Timers) {
        if self.phase != LoadPhase::Parsing {
            return;
        }
        self.phase = LoadPhase::Preloading;
        if let Some(body) = host.body() {
            host.set_class(body, &self.config.preload_class, true);
        }
        let now = host.now_mono();
        self.fallback = Some(timers.schedule(
            now,
            self.config.fallback,
            Task::PageLoad(PageLoadTask::Fallback),
        ));
    }

    /// Resources loaded: arm the settle delay.
    pub fn window_load<H: Host>(&mut self, host: &mut H, timers: &mut Timers) {
        if self.phase == LoadPhase::Loaded || self.settle.is_some() {
            return;
        }
        let now = host.now_mono();
        self.settle = Some(timers.schedule(
            now,
            self.config.settle,
            Task::PageLoad(PageLoadTask::Settle),
        ));
    }

    /// A load timer fired. Returns `true` when this completed the sequence.
    pub fn on_task<H: Host>(&mut self, host: &mut H, timers: &mut Timers, task: PageLoadTask) -> bool {
        if self.phase == LoadPhase::Loaded {
            return false;
        }
        let other = match task {
            PageLoadTask::Settle => self.fallback.take(),
            PageLoadTask::Fallback => self.settle.take(),
        };
        if let Some(id) = other {
            timers.cancel(id);
        }
        self.settle = None;
        self.fallback = None;
        self.phase = LoadPhase::Loaded;
        if let Some(body) = host.body() {
            host.set_class(body, &self.config.preload_class, false);
            host.set_class(body, &self.config.loaded_class, true);
        }
        debug!(via = ?task, "page loaded");
        true
    }
}
