#![forbid(unsafe_code)]

//! Deferred work.
//!
//! Every delayed step of a component is a variant here, scheduled on the
//! site-wide [`Timers`] queue and routed back to its owner when due.

use folio_core::scheduler::TimerQueue;

use crate::filter::FilterTask;
use crate::nav::NavTask;
use crate::page_load::PageLoadTask;

/// Site-wide timer queue.
pub type Timers = TimerQueue<Task>;

/// A scheduled step, tagged with the component that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Filter(FilterTask),
    Nav(NavTask),
    PageLoad(PageLoadTask),
    /// Debounced resize burst ended.
    ResizeSettled,
    /// Orientation change delay elapsed.
    OrientationSettled,
}
