#![forbid(unsafe_code)]

//! Core: host capabilities, canonical host events, timers, and transition
//! primitives shared by the folio runtime and its web frontend.

pub mod animation;
pub mod clock;
pub mod event;
pub mod host;
pub mod logging;
pub mod scheduler;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
