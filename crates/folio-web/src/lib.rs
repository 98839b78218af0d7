#![forbid(unsafe_code)]

//! Browser frontend for folio.
//!
//! Implements the folio host capabilities over `web-sys`, translates DOM
//! events into [`folio_core::event::HostEvent`]s, and drives the runtime's
//! timer queue with a single re-armed `setTimeout`. JS sees one class:
//!
//! ```js
//! import init, { FolioSite, initLogging } from "./folio_web.js";
//! await init();
//! initLogging("info");
//! const site = new FolioSite(JSON.stringify({ filter: { stagger_ms: 80 } }));
//! site.start();
//! site.filter("web");
//! ```

pub mod registry;

#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod host;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{FolioSite, init_logging};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct FolioSite;

#[cfg(not(target_arch = "wasm32"))]
impl FolioSite {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
