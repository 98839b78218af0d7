#![forbid(unsafe_code)]

//! Category filter over the services grid.
//!
//! A row of buttons, each carrying `data-filter`, selects which cards stay
//! in the grid. Cards carry `data-category`; the reserved category `all`
//! matches every card. Matching cards reveal in a staggered cascade while
//! the rest fade out and leave the layout.
//!
//! # Invariants
//!
//! - The current category is `all` or the filter of a button, and exactly
//!   the button carrying it holds the active class. Categories no button
//!   carries are refused.
//! - After all pending timers fire, a card is [`Visibility::Visible`] iff it
//!   matches the current category.
//! - The no-results panel is displayed iff zero cards match.
//! - A new filter cancels every pending step of the previous one, so a
//!   stale timer never mutates a card.

use core::time::Duration;

use folio_core::animation::{Direction, Transition, Visibility, stagger_offsets};
use folio_core::event::{EventOutcome, KeyCode};
use folio_core::host::{ElementId, Host};
use folio_core::scheduler::TimerId;
use tracing::{debug, trace};

use crate::config::FilterConfig;
use crate::error::{SetupError, SetupPhase};
use crate::roving::RovingTabindex;
use crate::task::{Task, Timers};

/// Category that matches every card.
pub const ALL: &str = "all";

/// Deferred filter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterTask {
    /// Staggered delay elapsed; start the entrance transition.
    RevealStart { item: usize },
    /// Entrance transition finished.
    RevealEnd { item: usize },
    /// Exit transition finished; drop the card from layout.
    ConcealEnd { item: usize },
    /// Slide the no-results panel in.
    NoResultsIn,
    /// Release the pressed look of a touched button.
    TouchRelease { button: usize },
}

/// A filter button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterButton {
    pub el: ElementId,
    pub filter: String,
}

/// A filterable card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterItem {
    pub el: ElementId,
    /// `None` when the card has no `data-category`; such cards only match `all`.
    pub category: Option<String>,
    pub visibility: Visibility,
}

impl FilterItem {
    /// Whether this card is shown under `category`.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        category == ALL || self.category.as_deref() == Some(category)
    }
}

/// Result of [`FilterEngine::set_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterChange {
    /// Category already current; nothing happened.
    Unchanged,
    /// No button carries the category; nothing happened.
    Unknown,
    /// Category applied; `shown` cards match.
    Applied { shown: usize },
}

/// Stateful filter over one grid.
#[derive(Debug)]
pub struct FilterEngine {
    config: FilterConfig,
    current: String,
    buttons: Vec<FilterButton>,
    items: Vec<FilterItem>,
    no_results: Option<ElementId>,
    no_results_shown: bool,
    grid: Option<ElementId>,
    roving: RovingTabindex,
    reduced_motion: bool,
    /// Outstanding transition steps, cancelled wholesale on re-filter.
    pending: Vec<TimerId>,
    /// Outstanding touch releases, one slot per button.
    touch: Vec<Option<TimerId>>,
}

impl FilterEngine {
    /// Discover buttons and cards, wire ARIA roles, and show every card.
    ///
    /// A page without buttons or cards mounts an inert engine. Buttons
    /// without a `data-filter` are left inert; two buttons sharing one fail
    /// the mount.
    pub fn mount<H: Host>(config: FilterConfig, host: &mut H) -> Result<Self, SetupError> {
        let mut buttons = Vec::new();
        for el in host.query_all(&config.button_selector) {
            let filter = host
                .attribute(el, "data-filter")
                .map(|f| f.trim().to_string())
                .unwrap_or_default();
            if filter.is_empty() {
                debug!(button = %el, "filter button without `data-filter` skipped");
                continue;
            }
            if buttons.iter().any(|b: &FilterButton| b.filter == filter) {
                return Err(SetupError::malformed(
                    SetupPhase::Filters,
                    format!("duplicate filter `{filter}`"),
                ));
            }
            buttons.push(FilterButton { el, filter });
        }

        let items = host
            .query_all(&config.item_selector)
            .into_iter()
            .map(|el| FilterItem {
                el,
                category: host
                    .attribute(el, "data-category")
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty()),
                visibility: Visibility::Visible,
            })
            .collect::<Vec<_>>();

        let no_results = host.query(&config.no_results_selector);
        let grid = host.query(&config.grid_selector);
        let touch = vec![None; buttons.len()];

        let mut engine = Self {
            current: ALL.to_string(),
            roving: RovingTabindex::new(buttons.len()),
            reduced_motion: host.prefers_reduced_motion(),
            no_results_shown: false,
            pending: Vec::new(),
            config,
            buttons,
            items,
            no_results,
            grid,
            touch,
        };
        engine.wire_accessibility(host);
        if engine.reduced_motion {
            engine.apply_reduced_motion_styles(host);
        }
        let mut timers = Timers::new();
        engine.apply(host, &mut timers, false);
        debug!(
            buttons = engine.buttons.len(),
            items = engine.items.len(),
            "filter engine mounted"
        );
        Ok(engine)
    }

    fn wire_accessibility<H: Host>(&self, host: &mut H) {
        if let Some(container) = host.query(&self.config.container_selector) {
            host.set_attribute(container, "role", "tablist");
            host.set_attribute(container, "aria-label", "Filter services by category");
        }
        for (i, button) in self.buttons.iter().enumerate() {
            host.set_attribute(button.el, "role", "tab");
            host.set_attribute(button.el, "tabindex", self.roving.tabindex(i));
        }
        if let Some(grid) = self.grid {
            host.set_attribute(grid, "role", "tabpanel");
            host.set_attribute(grid, "aria-live", "polite");
            host.set_attribute(grid, "aria-label", "Services list");
        }
    }

    /// Current category.
    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn buttons(&self) -> &[FilterButton] {
        &self.buttons
    }

    #[must_use]
    pub fn items(&self) -> &[FilterItem] {
        &self.items
    }

    /// Visibility of card `index`.
    #[must_use]
    pub fn visibility(&self, index: usize) -> Option<Visibility> {
        self.items.get(index).map(|item| item.visibility)
    }

    /// Number of cards matching the current category.
    #[must_use]
    pub fn shown_count(&self) -> usize {
        self.items.iter().filter(|i| i.matches(&self.current)).count()
    }

    /// Whether the no-results panel is displayed.
    #[must_use]
    pub const fn no_results_shown(&self) -> bool {
        self.no_results_shown
    }

    #[must_use]
    pub const fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    /// Number of transition steps still outstanding.
    #[must_use]
    pub fn pending_steps(&self) -> usize {
        self.pending.len()
    }

    /// Index of the button for element `el`.
    #[must_use]
    pub fn button_index(&self, el: ElementId) -> Option<usize> {
        self.buttons.iter().position(|b| b.el == el)
    }

    /// Switch to `category`.
    ///
    /// Re-selecting the current category, or naming one no button carries,
    /// is a no-op. Otherwise pending steps
    /// are cancelled, buttons and URL fragment are synced, and cards
    /// transition (or snap, when `animate` is false or motion is reduced).
    pub fn set_filter<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        category: &str,
        animate: bool,
    ) -> FilterChange {
        let category = category.trim();
        if category == self.current {
            trace!(category, "filter unchanged");
            return FilterChange::Unchanged;
        }
        if category != ALL && !self.buttons.iter().any(|b| b.filter == category) {
            debug!(category, "no filter button for category");
            return FilterChange::Unknown;
        }
        self.current = category.to_string();
        let shown = self.apply(host, timers, animate);
        self.write_hash(host);
        if let Some(active) = self.buttons.iter().find(|b| b.filter == self.current)
            && host.width() <= self.config.scroll_breakpoint
        {
            host.scroll_into_view(active.el, !self.reduced_motion);
        }
        debug!(category = %self.current, shown, "filter applied");
        FilterChange::Applied { shown }
    }

    fn write_hash<H: Host>(&self, host: &mut H) {
        let prefix = &self.config.hash_prefix;
        let hash = if self.current == ALL {
            format!("#{prefix}")
        } else {
            format!("#{prefix}-{}", self.current)
        };
        host.replace_hash(&hash);
    }

    /// Apply the current category to buttons, cards and the empty panel.
    fn apply<H: Host>(&mut self, host: &mut H, timers: &mut Timers, animate: bool) -> usize {
        for id in self.pending.drain(..) {
            timers.cancel(id);
        }
        self.sync_buttons(host);

        let animate = animate && !self.reduced_motion;
        let now = host.now_mono();
        let shown: Vec<usize> = (0..self.items.len())
            .filter(|&i| self.items[i].matches(&self.current))
            .collect();
        let offsets = if animate {
            stagger_offsets(shown.len(), self.config.stagger, self.config.stagger_mode)
        } else {
            vec![Duration::ZERO; shown.len()]
        };

        let mut next = shown.iter().zip(offsets).peekable();
        for index in 0..self.items.len() {
            match next.peek() {
                Some(&(&i, delay)) if i == index => {
                    self.show(host, timers, now, index, delay);
                    next.next();
                }
                _ => self.hide(host, timers, now, index, animate),
            }
        }

        self.sync_no_results(host, timers, now, shown.is_empty(), animate);
        shown.len()
    }

    fn sync_buttons<H: Host>(&self, host: &mut H) {
        for button in &self.buttons {
            let on = button.filter == self.current;
            host.set_class(button.el, &self.config.active_class, on);
            host.set_attribute(button.el, "aria-pressed", if on { "true" } else { "false" });
        }
    }

    fn schedule(&mut self, timers: &mut Timers, now: Duration, delay: Duration, task: FilterTask) {
        let id = timers.schedule(now, delay, Task::Filter(task));
        self.pending.push(id);
    }

    fn show<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        now: Duration,
        index: usize,
        delay: Duration,
    ) {
        let el = self.items[index].el;
        host.set_style(el, "display", "flex");
        host.set_class(el, &self.config.hidden_class, false);
        if delay.is_zero() {
            // Snap in, discarding any half-finished exit styling.
            host.set_style(el, "opacity", "");
            host.set_style(el, "transform", "");
            self.items[index].visibility = Visibility::Visible;
            return;
        }
        host.set_style(el, "opacity", "0");
        host.set_style(el, "transform", "translateY(30px) scale(0.9)");
        self.items[index].visibility = Visibility::Animating(Transition::new(
            Direction::In,
            now + delay,
            self.config.reveal,
        ));
        self.schedule(timers, now, delay, FilterTask::RevealStart { item: index });
    }

    fn hide<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        now: Duration,
        index: usize,
        animate: bool,
    ) {
        if self.items[index].visibility == Visibility::Hidden {
            return;
        }
        let el = self.items[index].el;
        if !animate {
            self.conceal(host, index);
            return;
        }
        host.set_style(el, "transition", &transition_css(self.config.fade_out));
        host.set_style(el, "opacity", "0");
        host.set_style(el, "transform", "translateY(-20px) scale(0.95)");
        self.items[index].visibility =
            Visibility::Animating(Transition::new(Direction::Out, now, self.config.fade_out));
        self.schedule(timers, now, self.config.fade_out, FilterTask::ConcealEnd { item: index });
    }

    fn conceal<H: Host>(&mut self, host: &mut H, index: usize) {
        let el = self.items[index].el;
        host.set_style(el, "display", "none");
        host.set_class(el, &self.config.hidden_class, true);
        self.items[index].visibility = Visibility::Hidden;
    }

    fn sync_no_results<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        now: Duration,
        empty: bool,
        animate: bool,
    ) {
        self.no_results_shown = empty;
        let Some(panel) = self.no_results else {
            return;
        };
        if !empty {
            host.set_style(panel, "display", "none");
            return;
        }
        host.set_style(panel, "display", "block");
        if animate {
            host.set_style(panel, "opacity", "0");
            host.set_style(panel, "transform", "translateY(20px)");
            self.schedule(timers, now, self.config.no_results_delay, FilterTask::NoResultsIn);
        } else {
            host.set_style(panel, "opacity", "");
            host.set_style(panel, "transform", "");
        }
    }

    /// Run a due step. Steps no longer pending are ignored.
    pub fn on_task<H: Host>(&mut self, host: &mut H, timers: &mut Timers, id: TimerId, task: FilterTask) {
        if let FilterTask::TouchRelease { button } = task {
            self.release_touch(host, id, button);
            return;
        }
        let Some(pos) = self.pending.iter().position(|&p| p == id) else {
            trace!(?task, "stale filter step dropped");
            return;
        };
        self.pending.swap_remove(pos);
        let now = host.now_mono();

        match task {
            FilterTask::RevealStart { item } => {
                let Some(FilterItem {
                    el,
                    visibility: Visibility::Animating(t),
                    ..
                }) = self.items.get(item).cloned()
                else {
                    return;
                };
                if t.direction() != Direction::In {
                    return;
                }
                host.set_style(el, "transition", &transition_css(self.config.reveal));
                host.set_style(el, "opacity", "1");
                host.set_style(el, "transform", "translateY(0) scale(1)");
                self.schedule(timers, now, self.config.reveal, FilterTask::RevealEnd { item });
            }
            FilterTask::RevealEnd { item } => {
                if let Some(entry) = self.items.get_mut(item)
                    && matches!(
                        entry.visibility,
                        Visibility::Animating(t) if t.direction() == Direction::In && t.is_complete(now)
                    )
                {
                    entry.visibility = Visibility::Visible;
                }
            }
            FilterTask::ConcealEnd { item } => {
                if matches!(
                    self.items.get(item).map(|i| i.visibility),
                    Some(Visibility::Animating(t))
                        if t.direction() == Direction::Out && t.is_complete(now)
                ) {
                    self.conceal(host, item);
                }
            }
            FilterTask::NoResultsIn => {
                if let Some(panel) = self.no_results
                    && self.no_results_shown
                {
                    host.set_style(panel, "transition", &transition_css(self.config.no_results_fade));
                    host.set_style(panel, "opacity", "1");
                    host.set_style(panel, "transform", "translateY(0)");
                }
            }
            FilterTask::TouchRelease { .. } => {}
        }
    }

    /// Click on `target`: a filter button applies its category.
    ///
    /// Button clicks suppress the browser default.
    pub fn on_click<H: Host>(&mut self, host: &mut H, timers: &mut Timers, target: ElementId) -> EventOutcome {
        let Some(index) = self.button_index(target) else {
            return EventOutcome::IGNORED;
        };
        let filter = self.buttons[index].filter.clone();
        self.set_filter(host, timers, &filter, true);
        EventOutcome::CONSUMED
    }

    /// Key press: Enter/Space activate a button, arrows move focus along
    /// the button row.
    pub fn on_key<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        target: Option<ElementId>,
        code: &KeyCode,
    ) -> EventOutcome {
        let focused = target.or_else(|| host.active_element());
        let Some(index) = focused.and_then(|el| self.button_index(el)) else {
            return EventOutcome::IGNORED;
        };
        if code.is_activation() {
            let el = self.buttons[index].el;
            return self.on_click(host, timers, el);
        }
        let Some(step) = code.roving_step() else {
            return EventOutcome::IGNORED;
        };
        let Some(next) = self.roving.step_from(index, step) else {
            return EventOutcome::IGNORED;
        };
        for (i, button) in self.buttons.iter().enumerate() {
            host.set_attribute(button.el, "tabindex", self.roving.tabindex(i));
        }
        host.focus(self.buttons[next].el);
        EventOutcome::CONSUMED
    }

    /// Touch on a button shrinks it briefly.
    pub fn on_touch<H: Host>(&mut self, host: &mut H, timers: &mut Timers, target: ElementId) -> EventOutcome {
        let Some(index) = self.button_index(target) else {
            return EventOutcome::IGNORED;
        };
        if let Some(previous) = self.touch[index].take() {
            timers.cancel(previous);
        }
        host.set_style(target, "transform", "scale(0.95)");
        let now = host.now_mono();
        let id = timers.schedule(
            now,
            self.config.touch_feedback,
            Task::Filter(FilterTask::TouchRelease { button: index }),
        );
        self.touch[index] = Some(id);
        EventOutcome::HANDLED
    }

    fn release_touch<H: Host>(&mut self, host: &mut H, id: TimerId, button: usize) {
        let Some(slot) = self.touch.get_mut(button) else {
            return;
        };
        if *slot != Some(id) {
            return;
        }
        *slot = None;
        host.set_style(self.buttons[button].el, "transform", "");
    }

    /// Follow the motion preference. Turning motion off settles in-flight
    /// transitions immediately.
    pub fn set_reduced_motion<H: Host>(&mut self, host: &mut H, timers: &mut Timers, reduced: bool) {
        if self.reduced_motion == reduced {
            return;
        }
        self.reduced_motion = reduced;
        if !reduced {
            for item in &self.items {
                host.set_style(item.el, "transition", "");
            }
            return;
        }
        for id in self.pending.drain(..) {
            timers.cancel(id);
        }
        for index in 0..self.items.len() {
            match self.items[index].visibility.target() {
                Visibility::Hidden => {
                    if self.items[index].visibility != Visibility::Hidden {
                        self.conceal(host, index);
                    }
                }
                _ => {
                    let el = self.items[index].el;
                    host.set_style(el, "opacity", "");
                    host.set_style(el, "transform", "");
                    self.items[index].visibility = Visibility::Visible;
                }
            }
        }
        if let Some(panel) = self.no_results
            && self.no_results_shown
        {
            host.set_style(panel, "opacity", "");
            host.set_style(panel, "transform", "");
        }
        self.apply_reduced_motion_styles(host);
    }

    fn apply_reduced_motion_styles<H: Host>(&self, host: &mut H) {
        for item in &self.items {
            host.set_style(item.el, "transition", "none");
        }
    }

    /// Force the grid to lay out again after a viewport change.
    pub fn refresh_layout<H: Host>(&self, host: &mut H) {
        let Some(grid) = self.grid else {
            return;
        };
        let display = host.style(grid, "display").unwrap_or_default();
        host.set_style(grid, "display", "none");
        host.force_reflow(grid);
        host.set_style(grid, "display", &display);
    }
}

fn transition_css(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    format!("opacity {secs}s ease, transform {secs}s ease")
}
