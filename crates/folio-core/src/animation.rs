#![forbid(unsafe_code)]

//! Transition primitives.
//!
//! The page drives its visuals with CSS transitions; the runtime only needs
//! to know *when* an element is mid-transition and in which direction. A
//! [`Transition`] records that window on the host clock, and
//! [`Visibility`] is the per-element state machine:
//!
//! ```text
//! Hidden ──show──▶ Animating(In)  ──complete──▶ Visible
//! Visible ──hide──▶ Animating(Out) ──complete──▶ Hidden
//! ```
//!
//! With reduced motion every duration is zero and elements jump straight to
//! the terminal state.

pub mod stagger;

use core::time::Duration;

pub use stagger::{StaggerMode, stagger_offsets};

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Quadratic ease-in (slow start).
#[inline]
pub fn ease_in(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t
}

/// Quadratic ease-out (slow end).
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Quadratic ease-in-out (slow start and end).
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Which way an element is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Becoming visible.
    In,
    /// Becoming hidden.
    Out,
}

/// A time window on the host clock during which an element animates.
///
/// `start` may lie in the future: staggered reveals are scheduled up front
/// and hold at progress `0.0` until their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    direction: Direction,
    start: Duration,
    duration: Duration,
}

impl Transition {
    /// Create a transition beginning at `start` and lasting `duration`.
    #[must_use]
    pub const fn new(direction: Direction, start: Duration, duration: Duration) -> Self {
        Self {
            direction,
            start,
            duration,
        }
    }

    /// Direction of travel.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Host time at which the transition begins.
    #[must_use]
    pub const fn start(&self) -> Duration {
        self.start
    }

    /// Length of the transition.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Host time at which the transition completes.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }

    /// Linear progress at `now`, in [0.0, 1.0].
    #[must_use]
    pub fn progress(&self, now: Duration) -> f32 {
        if now <= self.start {
            return 0.0;
        }
        if self.duration.is_zero() || now >= self.end() {
            return 1.0;
        }
        let elapsed = now - self.start;
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32
    }

    /// Whether the transition has finished at `now`.
    #[must_use]
    pub fn is_complete(&self, now: Duration) -> bool {
        now >= self.end()
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

/// Visibility of a filterable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Laid out and fully opaque.
    #[default]
    Visible,
    /// `display: none`.
    Hidden,
    /// Mid-transition towards the state named by the direction.
    Animating(Transition),
}

impl Visibility {
    /// The state this element is heading to.
    #[must_use]
    pub fn target(&self) -> Visibility {
        match self {
            Self::Animating(t) if t.direction() == Direction::In => Self::Visible,
            Self::Animating(_) => Self::Hidden,
            other => *other,
        }
    }
}
