#![forbid(unsafe_code)]

//! Interactive layer of the folio portfolio site.
//!
//! - [`filter::FilterEngine`] filters the services grid by category with
//!   staggered transitions.
//! - [`nav::SectionNavigator`] swaps full-screen sections and tracks the
//!   back section.
//! - [`reveal::RevealController`] reveals elements as they scroll into view.
//! - [`page_load::PageLoad`] sequences the preload to loaded handoff.
//! - [`site::Site`] owns a [`Host`](folio_core::host::Host), wires the
//!   components together and dispatches host events and timers.
//!
//! # Example
//!
//! ```
//! use folio_core::event::HostEvent;
//! use folio_core::testing::{VirtualHost, el};
//! use folio_runtime::config::SiteConfig;
//! use folio_runtime::site::Site;
//!
//! let mut host = VirtualHost::new();
//! let root = host.root();
//! host.append(root, el("section").class("section").id("home"));
//!
//! let mut site = Site::new(host, SiteConfig::default());
//! site.handle_event(HostEvent::DomReady);
//! assert_eq!(site.active_section(), Some("home"));
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod nav;
pub mod page_load;
pub mod reveal;
pub mod roving;
pub mod site;
pub mod task;

pub use config::SiteConfig;
pub use error::{ConfigError, SetupError, SetupPhase};
pub use site::{SetupReport, Site};
