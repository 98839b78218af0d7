#![forbid(unsafe_code)]

//! Single-page section navigation.
//!
//! Sections are full-viewport panels; exactly one is active. Leaving a
//! section marks it as the back section so CSS can animate it out underneath
//! the incoming one. Nav links, call-to-action buttons (by
//! `data-section-index`) and the URL fragment all drive the same transition.
//!
//! A transition runs five steps in order:
//!
//! 1. every section loses back status;
//! 2. the outgoing section becomes back (when the trigger records one);
//! 3. the outgoing section loses active status and the target gains it;
//! 4. nav links are synced so only the link to the target is active;
//! 5. on narrow viewports the aside closes.

use core::time::Duration;

use folio_core::event::EventOutcome;
use folio_core::host::{ElementId, Host, fragment};
use tracing::{debug, trace};

use crate::config::NavConfig;
use crate::error::{SetupError, SetupPhase};
use crate::task::{Task, Timers};

/// Role of a section in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionStatus {
    /// On screen.
    Active,
    /// Most recently left; animating out underneath.
    Back,
    #[default]
    Inactive,
}

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Nav link click.
    Link,
    /// Call-to-action click.
    Cta,
    /// Hash present when the page finished loading.
    DeepLink,
    /// Fragment changed after load (back/forward, typed URL).
    HashChange,
}

impl Trigger {
    /// Whether the outgoing section becomes back.
    #[must_use]
    pub const fn records_back(self) -> bool {
        !matches!(self, Self::DeepLink)
    }
}

/// Deferred navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTask {
    /// Honour the URL fragment once the page has settled.
    DeepLink,
    /// Drop inline transition overrides from a section.
    ClearStyles { section: usize },
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Target did not resolve.
    Ignored,
    /// Target was already active.
    AlreadyActive,
    /// Active section changed.
    Moved { from: usize, to: usize },
}

/// A page section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub el: ElementId,
    pub id: String,
    pub status: SectionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NavLink {
    el: ElementId,
    section: usize,
}

/// Section state machine.
#[derive(Debug)]
pub struct SectionNavigator {
    config: NavConfig,
    sections: Vec<Section>,
    links: Vec<NavLink>,
    ctas: Vec<ElementId>,
    aside: Option<ElementId>,
    toggler: Option<ElementId>,
    aside_open: bool,
    loaded: bool,
}

impl SectionNavigator {
    /// Discover sections, links and the aside.
    ///
    /// The initially active section is the one marked active in markup,
    /// falling back to the first. Links whose fragment names no section are
    /// left inert.
    pub fn mount<H: Host>(config: NavConfig, host: &mut H) -> Result<Self, SetupError> {
        let sections: Vec<Section> = host
            .query_all(&config.section_selector)
            .into_iter()
            .filter_map(|el| {
                let id = host.attribute(el, "id")?;
                Some(Section {
                    el,
                    id,
                    status: SectionStatus::Inactive,
                })
            })
            .collect();
        if sections.is_empty() {
            return Err(SetupError::missing(
                SetupPhase::Navigation,
                &config.section_selector,
            ));
        }

        let mut nav = Self {
            links: Vec::new(),
            ctas: host.query_all(&config.cta_selector),
            aside: host.query(&config.aside_selector),
            toggler: host.query(&config.toggler_selector),
            aside_open: false,
            loaded: false,
            sections,
            config,
        };

        let links: Vec<NavLink> = host
            .query_all(&nav.config.link_selector)
            .into_iter()
            .filter_map(|el| {
                let href = host.attribute(el, "href")?;
                let section = nav.section_index(fragment(&href)?)?;
                Some(NavLink { el, section })
            })
            .collect();
        nav.links = links;
        nav.aside_open = nav
            .aside
            .is_some_and(|aside| host.has_class(aside, &nav.config.open_class));

        let initial = nav
            .sections
            .iter()
            .position(|s| host.has_class(s.el, &nav.config.active_class))
            .unwrap_or(0);
        for (i, section) in nav.sections.iter_mut().enumerate() {
            section.status = if i == initial {
                SectionStatus::Active
            } else {
                SectionStatus::Inactive
            };
        }
        nav.sync_classes(host);
        nav.sync_links(host);
        debug!(
            sections = nav.sections.len(),
            links = nav.links.len(),
            active = %nav.sections[initial].id,
            "section navigator mounted"
        );
        Ok(nav)
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Index of the active section.
    #[must_use]
    pub fn active(&self) -> usize {
        self.sections
            .iter()
            .position(|s| s.status == SectionStatus::Active)
            .unwrap_or(0)
    }

    /// Id of the active section.
    #[must_use]
    pub fn active_id(&self) -> &str {
        &self.sections[self.active()].id
    }

    /// Index of the back section, if any.
    #[must_use]
    pub fn back(&self) -> Option<usize> {
        self.sections
            .iter()
            .position(|s| s.status == SectionStatus::Back)
    }

    #[must_use]
    pub fn status(&self, index: usize) -> Option<SectionStatus> {
        self.sections.get(index).map(|s| s.status)
    }

    #[must_use]
    pub const fn aside_open(&self) -> bool {
        self.aside_open
    }

    /// Whether the page load sequence has completed.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Index of the section with `id`.
    #[must_use]
    pub fn section_index(&self, id: &str) -> Option<usize> {
        if id.is_empty() {
            return None;
        }
        self.sections.iter().position(|s| s.id == id)
    }

    /// Resolve a URL fragment to a section that also has a nav link.
    #[must_use]
    pub fn resolve_hash(&self, hash: &str) -> Option<usize> {
        let id = hash.strip_prefix('#').unwrap_or(hash);
        let section = self.section_index(id)?;
        self.links
            .iter()
            .any(|l| l.section == section)
            .then_some(section)
    }

    /// Transition to section `target`.
    pub fn navigate<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        target: usize,
        trigger: Trigger,
    ) -> NavOutcome {
        if target >= self.sections.len() {
            return NavOutcome::Ignored;
        }
        let from = self.active();
        if target == from {
            self.close_aside_if_narrow(host);
            trace!(section = %self.sections[target].id, "already active");
            return NavOutcome::AlreadyActive;
        }

        for section in &mut self.sections {
            if section.status == SectionStatus::Back {
                section.status = SectionStatus::Inactive;
            }
        }
        self.sections[from].status = if trigger.records_back() {
            SectionStatus::Back
        } else {
            SectionStatus::Inactive
        };
        self.sections[target].status = SectionStatus::Active;
        self.sync_classes(host);
        self.sync_links(host);
        self.close_aside_if_narrow(host);

        if trigger == Trigger::DeepLink {
            self.clear_styles(host, target);
        } else if self.loaded {
            let now = host.now_mono();
            let delay = self.config.style_reset_delay;
            self.schedule_clear(timers, now, delay, target);
            if trigger.records_back() {
                self.schedule_clear(timers, now, delay, from);
            }
        }

        debug!(
            from = %self.sections[from].id,
            to = %self.sections[target].id,
            ?trigger,
            "section transition"
        );
        NavOutcome::Moved { from, to: target }
    }

    fn schedule_clear(&self, timers: &mut Timers, now: Duration, delay: Duration, section: usize) {
        timers.schedule(now, delay, Task::Nav(NavTask::ClearStyles { section }));
    }

    fn sync_classes<H: Host>(&self, host: &mut H) {
        for section in &self.sections {
            host.set_class(
                section.el,
                &self.config.active_class,
                section.status == SectionStatus::Active,
            );
            host.set_class(
                section.el,
                &self.config.back_class,
                section.status == SectionStatus::Back,
            );
        }
    }

    fn sync_links<H: Host>(&self, host: &mut H) {
        let active = self.active();
        for link in &self.links {
            host.set_class(link.el, &self.config.active_class, link.section == active);
        }
    }

    fn close_aside_if_narrow<H: Host>(&mut self, host: &mut H) {
        if host.width() < self.config.aside_breakpoint && self.aside_open {
            self.set_aside(host, false);
        }
    }

    fn clear_styles<H: Host>(&self, host: &mut H, index: usize) {
        let Some(section) = self.sections.get(index) else {
            return;
        };
        for property in ["transform", "opacity", "filter"] {
            host.set_style(section.el, property, "");
        }
    }

    /// Click dispatch: nav links, call-to-action buttons, the aside toggler.
    pub fn on_click<H: Host>(
        &mut self,
        host: &mut H,
        timers: &mut Timers,
        target: ElementId,
    ) -> EventOutcome {
        if let Some(section) = self
            .links
            .iter()
            .find(|l| l.el == target)
            .map(|l| l.section)
        {
            self.navigate(host, timers, section, Trigger::Link);
            return EventOutcome::HANDLED;
        }
        if self.ctas.contains(&target) {
            return match self.cta_target(host, target) {
                Some(section) => {
                    self.navigate(host, timers, section, Trigger::Cta);
                    EventOutcome::HANDLED
                }
                None => {
                    debug!(%target, "call-to-action has no resolvable target");
                    EventOutcome::IGNORED
                }
            };
        }
        if self.toggler == Some(target) {
            self.toggle_aside(host);
            return EventOutcome::CONSUMED;
        }
        EventOutcome::IGNORED
    }

    /// `data-section-index` picks a section by position.
    fn cta_target<H: Host>(&self, host: &H, el: ElementId) -> Option<usize> {
        let index = host
            .attribute(el, "data-section-index")?
            .trim()
            .parse::<usize>()
            .ok()?;
        (index < self.sections.len()).then_some(index)
    }

    /// Fragment changed. Ignored until the page has loaded; the deferred
    /// deep link reads the fragment itself.
    pub fn on_hash_change<H: Host>(&mut self, host: &mut H, timers: &mut Timers, hash: &str) -> EventOutcome {
        if !self.loaded {
            trace!(hash, "hash change before load ignored");
            return EventOutcome::IGNORED;
        }
        match self.resolve_hash(hash) {
            Some(section) => match self.navigate(host, timers, section, Trigger::HashChange) {
                NavOutcome::Ignored => EventOutcome::IGNORED,
                _ => EventOutcome::HANDLED,
            },
            None => EventOutcome::IGNORED,
        }
    }

    /// Flip the aside open or closed.
    pub fn toggle_aside<H: Host>(&mut self, host: &mut H) {
        let open = !self.aside_open;
        self.set_aside(host, open);
    }

    /// Open or close the aside, mirroring the state onto the toggler and
    /// every section.
    pub fn set_aside<H: Host>(&mut self, host: &mut H, open: bool) {
        self.aside_open = open;
        let class = &self.config.open_class;
        if let Some(aside) = self.aside {
            host.set_class(aside, class, open);
        }
        if let Some(toggler) = self.toggler {
            host.set_class(toggler, class, open);
        }
        for section in &self.sections {
            host.set_class(section.el, class, open);
        }
        trace!(open, "aside toggled");
    }

    /// The page finished loading: reset positions and schedule the deep link.
    pub fn mark_loaded<H: Host>(&mut self, host: &mut H, timers: &mut Timers) {
        if self.loaded {
            return;
        }
        self.loaded = true;
        self.reset_positions(host);
        let now = host.now_mono();
        timers.schedule(now, self.config.deep_link_delay, Task::Nav(NavTask::DeepLink));
    }

    /// Clear inline overrides everywhere and keep only the active section.
    pub fn reset_positions<H: Host>(&mut self, host: &mut H) {
        for index in 0..self.sections.len() {
            self.clear_styles(host, index);
            if self.sections[index].status == SectionStatus::Back {
                self.sections[index].status = SectionStatus::Inactive;
            }
        }
        self.sync_classes(host);
    }

    /// Run a due step.
    pub fn on_task<H: Host>(&mut self, host: &mut H, timers: &mut Timers, task: NavTask) {
        match task {
            NavTask::DeepLink => {
                let hash = host.hash();
                if hash.len() <= 1 {
                    return;
                }
                match self.resolve_hash(&hash) {
                    Some(section) => {
                        if let NavOutcome::AlreadyActive =
                            self.navigate(host, timers, section, Trigger::DeepLink)
                        {
                            self.clear_styles(host, section);
                        }
                    }
                    None => debug!(%hash, "deep link names no linked section"),
                }
            }
            NavTask::ClearStyles { section } => self.clear_styles(host, section),
        }
    }
}
