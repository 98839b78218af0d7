#![forbid(unsafe_code)]

//! Runtime error types.
//!
//! Nothing here is ever shown to a visitor. Configuration errors go back to
//! whoever constructed the runtime; setup errors are logged and collected in
//! a [`SetupReport`](crate::site::SetupReport) while the remaining setup
//! phases carry on.

use core::fmt;

/// Configuration could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The JSON document did not parse.
    Parse(String),
    /// A field holds an unusable value.
    Invalid { field: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid configuration JSON: {msg}"),
            Self::Invalid { field, reason } => write!(f, "invalid `{field}`: {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Independent setup phase, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupPhase {
    Filters,
    Reveal,
    Navigation,
    Responsive,
}

impl SetupPhase {
    /// All phases in execution order.
    pub const ALL: [SetupPhase; 4] = [
        SetupPhase::Filters,
        SetupPhase::Reveal,
        SetupPhase::Navigation,
        SetupPhase::Responsive,
    ];

    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Filters => "filters",
            Self::Reveal => "reveal",
            Self::Navigation => "navigation",
            Self::Responsive => "responsive",
        }
    }
}

impl fmt::Display for SetupPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a setup phase failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupErrorKind {
    /// A required element is absent.
    MissingElement { selector: String },
    /// Markup is present but violates the contract.
    Malformed { reason: String },
}

/// A setup phase failed; other phases are unaffected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupError {
    pub phase: SetupPhase,
    pub kind: SetupErrorKind,
}

impl SetupError {
    /// Required element missing.
    #[must_use]
    pub fn missing(phase: SetupPhase, selector: &str) -> Self {
        Self {
            phase,
            kind: SetupErrorKind::MissingElement {
                selector: selector.to_string(),
            },
        }
    }

    /// Markup contract violated.
    #[must_use]
    pub fn malformed(phase: SetupPhase, reason: impl Into<String>) -> Self {
        Self {
            phase,
            kind: SetupErrorKind::Malformed {
                reason: reason.into(),
            },
        }
    }
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SetupErrorKind::MissingElement { selector } => {
                write!(f, "{} setup: no element matches `{selector}`", self.phase)
            }
            SetupErrorKind::Malformed { reason } => {
                write!(f, "{} setup: {reason}", self.phase)
            }
        }
    }
}

impl std::error::Error for SetupError {}
