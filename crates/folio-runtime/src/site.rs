#![forbid(unsafe_code)]

//! Site runtime: owns the host, the timer queue and every component.
//!
//! The host feeds [`HostEvent`]s to [`Site::handle_event`] and calls
//! [`Site::run_due_timers`] whenever [`Site::next_deadline`] passes. Nothing
//! here blocks or spawns; all deferred work lives on one queue ordered by
//! host time, so a run is fully reproducible under a deterministic clock.
//!
//! Setup runs in independent phases. A phase that fails is logged and
//! reported, and the phases after it still run.

use folio_core::event::{EventOutcome, HostEvent};
use folio_core::host::Host;
use folio_core::scheduler::{Debouncer, TimerId};
use tracing::{debug, error, info, trace};

use crate::config::SiteConfig;
use crate::error::{SetupError, SetupPhase};
use crate::filter::{FilterChange, FilterEngine};
use crate::nav::{NavOutcome, SectionNavigator, Trigger};
use crate::page_load::PageLoad;
use crate::reveal::RevealController;
use crate::task::{Task, Timers};

/// Outcome of [`Site::setup`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupReport {
    /// Phases that completed.
    pub completed: Vec<SetupPhase>,
    /// Phases that failed, with the reason.
    pub failed: Vec<SetupError>,
}

impl SetupReport {
    /// Every phase succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Whether `phase` completed.
    #[must_use]
    pub fn completed(&self, phase: SetupPhase) -> bool {
        self.completed.contains(&phase)
    }
}

/// The interactive layer of one page.
#[derive(Debug)]
pub struct Site<H: Host> {
    host: H,
    config: SiteConfig,
    timers: Timers,
    filter: Option<FilterEngine>,
    nav: Option<SectionNavigator>,
    reveal: RevealController,
    page_load: PageLoad,
    resize: Debouncer,
    orientation: Debouncer,
    responsive: bool,
    reduced_motion: bool,
    report: Option<SetupReport>,
}

impl<H: Host> Site<H> {
    /// Wrap `host`. Nothing touches the DOM until [`Site::setup`].
    pub fn new(host: H, config: SiteConfig) -> Self {
        Self {
            reveal: RevealController::new(config.reveal.clone()),
            page_load: PageLoad::new(config.page_load.clone()),
            resize: Debouncer::new(config.responsive.resize_debounce),
            orientation: Debouncer::new(config.responsive.orientation_delay),
            host,
            config,
            timers: Timers::new(),
            filter: None,
            nav: None,
            responsive: false,
            reduced_motion: false,
            report: None,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn filter_engine(&self) -> Option<&FilterEngine> {
        self.filter.as_ref()
    }

    #[must_use]
    pub fn navigator(&self) -> Option<&SectionNavigator> {
        self.nav.as_ref()
    }

    #[must_use]
    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    #[must_use]
    pub fn page_load(&self) -> &PageLoad {
        &self.page_load
    }

    /// Report from the first [`Site::setup`], if it ran.
    #[must_use]
    pub fn report(&self) -> Option<&SetupReport> {
        self.report.as_ref()
    }

    /// Earliest pending timer deadline on the host clock.
    #[must_use]
    pub fn next_deadline(&self) -> Option<core::time::Duration> {
        self.timers.next_deadline()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Mount every component. Runs once; later calls return the first report.
    pub fn setup(&mut self) -> &SetupReport {
        if self.report.is_none() {
            self.reduced_motion = self.host.prefers_reduced_motion();
            let mut report = SetupReport::default();
            for phase in SetupPhase::ALL {
                match self.run_phase(phase) {
                    Ok(()) => report.completed.push(phase),
                    Err(err) => {
                        error!(phase = %phase, error = %err, "setup phase failed");
                        report.failed.push(err);
                    }
                }
            }
            info!(
                completed = report.completed.len(),
                failed = report.failed.len(),
                "site setup finished"
            );
            self.report = Some(report);
        }
        self.report.get_or_insert_with(SetupReport::default)
    }

    fn run_phase(&mut self, phase: SetupPhase) -> Result<(), SetupError> {
        match phase {
            SetupPhase::Filters => {
                self.filter = Some(FilterEngine::mount(
                    self.config.filter.clone(),
                    &mut self.host,
                )?);
            }
            SetupPhase::Reveal => {
                self.reveal.setup(&mut self.host);
                if self.reduced_motion {
                    self.reveal.set_reduced_motion(&mut self.host, true);
                }
            }
            SetupPhase::Navigation => {
                self.nav = Some(SectionNavigator::mount(
                    self.config.nav.clone(),
                    &mut self.host,
                )?);
            }
            SetupPhase::Responsive => self.responsive = true,
        }
        Ok(())
    }

    /// Dispatch one host event.
    pub fn handle_event(&mut self, event: HostEvent) -> EventOutcome {
        trace!(?event, "host event");
        match event {
            HostEvent::DomReady => {
                self.setup();
                self.page_load.dom_ready(&mut self.host, &mut self.timers);
                EventOutcome::HANDLED
            }
            HostEvent::WindowLoad => {
                self.page_load.window_load(&mut self.host, &mut self.timers);
                EventOutcome::HANDLED
            }
            HostEvent::Click { target } => {
                let mut outcome = EventOutcome::IGNORED;
                if let Some(filter) = &mut self.filter {
                    outcome = outcome.merge(filter.on_click(&mut self.host, &mut self.timers, target));
                }
                if let Some(nav) = &mut self.nav {
                    outcome = outcome.merge(nav.on_click(&mut self.host, &mut self.timers, target));
                }
                outcome
            }
            HostEvent::Key { target, code } => match &mut self.filter {
                Some(filter) => filter.on_key(&mut self.host, &mut self.timers, target, &code),
                None => EventOutcome::IGNORED,
            },
            HostEvent::TouchStart { target } => match &mut self.filter {
                Some(filter) => filter.on_touch(&mut self.host, &mut self.timers, target),
                None => EventOutcome::IGNORED,
            },
            HostEvent::Resize { width, height } => {
                if !self.responsive {
                    return EventOutcome::IGNORED;
                }
                trace!(width, height, "resize");
                let now = self.host.now_mono();
                self.resize.arm(&mut self.timers, now, Task::ResizeSettled);
                EventOutcome::HANDLED
            }
            HostEvent::OrientationChange => {
                if !self.responsive {
                    return EventOutcome::IGNORED;
                }
                let now = self.host.now_mono();
                self.orientation
                    .arm(&mut self.timers, now, Task::OrientationSettled);
                EventOutcome::HANDLED
            }
            HostEvent::VisibilityChange { hidden } => {
                if self.reveal.on_visibility_change(&mut self.host, hidden) {
                    EventOutcome::HANDLED
                } else {
                    EventOutcome::IGNORED
                }
            }
            HostEvent::HashChange { hash } => match &mut self.nav {
                Some(nav) => nav.on_hash_change(&mut self.host, &mut self.timers, &hash),
                None => EventOutcome::IGNORED,
            },
            HostEvent::MotionPreference { reduced } => {
                self.set_reduced_motion(reduced);
                EventOutcome::HANDLED
            }
            HostEvent::Intersecting { target } => {
                if self.reveal.on_intersecting(&mut self.host, target) {
                    EventOutcome::HANDLED
                } else {
                    EventOutcome::IGNORED
                }
            }
        }
    }

    /// Run every timer whose deadline has passed. Returns how many ran.
    pub fn run_due_timers(&mut self) -> usize {
        let mut ran = 0;
        while let Some((id, task)) = self.timers.pop_due(self.host.now_mono()) {
            self.run_task(id, task);
            ran += 1;
        }
        ran
    }

    fn run_task(&mut self, id: TimerId, task: Task) {
        match task {
            Task::Filter(task) => {
                if let Some(filter) = &mut self.filter {
                    filter.on_task(&mut self.host, &mut self.timers, id, task);
                }
            }
            Task::Nav(task) => {
                if let Some(nav) = &mut self.nav {
                    nav.on_task(&mut self.host, &mut self.timers, task);
                }
            }
            Task::PageLoad(task) => {
                if self.page_load.on_task(&mut self.host, &mut self.timers, task)
                    && let Some(nav) = &mut self.nav
                {
                    nav.mark_loaded(&mut self.host, &mut self.timers);
                }
            }
            Task::ResizeSettled => {
                if self.resize.fire(id) {
                    let reduced = self.host.prefers_reduced_motion();
                    self.set_reduced_motion(reduced);
                    self.refresh_layout();
                }
            }
            Task::OrientationSettled => {
                if self.orientation.fire(id) {
                    self.refresh_layout();
                }
            }
        }
    }

    fn refresh_layout(&mut self) {
        if let Some(filter) = &self.filter {
            filter.refresh_layout(&mut self.host);
            debug!("layout refreshed");
        }
    }

    /// Follow a change in the motion preference. Before setup the
    /// preference is read fresh by each phase.
    fn set_reduced_motion(&mut self, reduced: bool) {
        if self.report.is_none() || self.reduced_motion == reduced {
            return;
        }
        self.reduced_motion = reduced;
        if let Some(filter) = &mut self.filter {
            filter.set_reduced_motion(&mut self.host, &mut self.timers, reduced);
        }
        self.reveal.set_reduced_motion(&mut self.host, reduced);
        if !reduced {
            self.reveal.setup(&mut self.host);
        }
        debug!(reduced, "motion preference changed");
    }

    /// Switch the filter category, animated. `None` when filters failed setup.
    pub fn filter(&mut self, category: &str) -> Option<FilterChange> {
        let filter = self.filter.as_mut()?;
        Some(filter.set_filter(&mut self.host, &mut self.timers, category, true))
    }

    /// Current filter category.
    #[must_use]
    pub fn current_filter(&self) -> Option<&str> {
        self.filter.as_ref().map(FilterEngine::current)
    }

    /// Id of the active section.
    #[must_use]
    pub fn active_section(&self) -> Option<&str> {
        self.nav.as_ref().map(SectionNavigator::active_id)
    }

    /// Navigate to the section with `id`, as a link click would.
    pub fn navigate_to(&mut self, id: &str) -> NavOutcome {
        let Some(nav) = &mut self.nav else {
            return NavOutcome::Ignored;
        };
        match nav.section_index(id) {
            Some(index) => nav.navigate(&mut self.host, &mut self.timers, index, Trigger::Link),
            None => NavOutcome::Ignored,
        }
    }

    /// Drop every pending timer and unobserve reveal targets.
    pub fn shutdown(&mut self) {
        self.timers.clear();
        for &el in self.reveal.pending() {
            self.host.unobserve(el);
        }
        debug!("site shut down");
    }
}
