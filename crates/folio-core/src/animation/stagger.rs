#![forbid(unsafe_code)]

//! Stagger offsets for cascading reveals.
//!
//! When a filter change reveals `n` cards, card `i` (in DOM order) starts its
//! entrance `offset[i]` after the change. The default [`StaggerMode::Linear`]
//! gives `offset[i] = i * step`.
//!
//! # Invariants
//!
//! 1. `stagger_offsets(0, ..)` is empty.
//! 2. The first offset is always `Duration::ZERO`.
//! 3. Offsets are monotonically non-decreasing.
//! 4. The last offset is `(count - 1) * step` for every mode.

use core::time::Duration;

use super::{EasingFn, ease_in, ease_in_out, ease_out};

/// How delay offsets are distributed across revealed items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaggerMode {
    /// Equal spacing: `offset[i] = i * step`.
    #[default]
    Linear,
    /// Gaps grow towards the end of the list.
    EaseIn,
    /// Gaps shrink towards the end of the list.
    EaseOut,
    /// Small gaps at both ends, larger in the middle.
    EaseInOut,
}

impl StaggerMode {
    /// Parse a mode name (`linear`, `ease-in`, `ease-out`, `ease-in-out`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }

    /// Canonical name, the inverse of [`StaggerMode::from_name`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }

    fn easing(self) -> Option<EasingFn> {
        match self {
            Self::Linear => None,
            Self::EaseIn => Some(ease_in),
            Self::EaseOut => Some(ease_out),
            Self::EaseInOut => Some(ease_in_out),
        }
    }
}

/// Compute start offsets for `count` items spaced by `step`.
#[must_use]
pub fn stagger_offsets(count: usize, step: Duration, mode: StaggerMode) -> Vec<Duration> {
    match count {
        0 => return Vec::new(),
        1 => return vec![Duration::ZERO],
        _ => {}
    }

    let Some(easing) = mode.easing() else {
        // Integer arithmetic keeps linear offsets exact.
        return (0..count)
            .map(|i| step.saturating_mul(u32::try_from(i).unwrap_or(u32::MAX)))
            .collect();
    };

    let last = count - 1;
    let span = step.as_nanos() as f64 * last as f64;
    let mut offsets: Vec<Duration> = (0..count)
        .map(|i| {
            let t = i as f32 / last as f32;
            Duration::from_nanos((span * f64::from(easing(t))) as u64)
        })
        .collect();
    // Pin the tail so float rounding never shortens the cascade.
    offsets[last] = step.saturating_mul(u32::try_from(last).unwrap_or(u32::MAX));
    offsets
}
