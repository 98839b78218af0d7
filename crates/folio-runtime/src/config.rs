#![forbid(unsafe_code)]

//! Runtime configuration.
//!
//! Every selector, class name and timing the page scripts hard-coded lives
//! here with the same defaults. The browser frontend accepts an optional JSON
//! object; absent keys fall back to [`Default`]. Durations are written in
//! milliseconds.
//!
//! ```
//! use folio_runtime::config::SiteConfig;
//!
//! let config = SiteConfig::from_json(r#"{ "filter": { "stagger_ms": 60 } }"#).unwrap();
//! assert_eq!(config.filter.stagger.as_millis(), 60);
//! assert_eq!(config.nav.aside_breakpoint, 1200);
//! ```

use core::time::Duration;

use folio_core::animation::StaggerMode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Filter grid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub button_selector: String,
    pub item_selector: String,
    pub no_results_selector: String,
    pub container_selector: String,
    pub grid_selector: String,
    pub active_class: String,
    pub hidden_class: String,
    /// Gap between consecutive reveals.
    #[serde(rename = "stagger_ms", with = "millis")]
    pub stagger: Duration,
    #[serde(with = "stagger_mode")]
    pub stagger_mode: StaggerMode,
    /// Entrance transition length.
    #[serde(rename = "reveal_ms", with = "millis")]
    pub reveal: Duration,
    /// Exit transition length; items are removed from layout afterwards.
    #[serde(rename = "fade_out_ms", with = "millis")]
    pub fade_out: Duration,
    /// Lag before the no-results panel slides in.
    #[serde(rename = "no_results_delay_ms", with = "millis")]
    pub no_results_delay: Duration,
    #[serde(rename = "no_results_fade_ms", with = "millis")]
    pub no_results_fade: Duration,
    /// How long a touched button stays pressed.
    #[serde(rename = "touch_feedback_ms", with = "millis")]
    pub touch_feedback: Duration,
    /// Viewports at or below this width scroll the active button into view.
    pub scroll_breakpoint: u32,
    /// Fragment prefix written for shareable filter links.
    pub hash_prefix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            button_selector: ".svc-filter".to_string(),
            item_selector: ".svc-card".to_string(),
            no_results_selector: "#noResults".to_string(),
            container_selector: ".svc-filters".to_string(),
            grid_selector: ".svc-grid".to_string(),
            active_class: "is-active".to_string(),
            hidden_class: "svc-card--hidden".to_string(),
            stagger: Duration::from_millis(100),
            stagger_mode: StaggerMode::Linear,
            reveal: Duration::from_millis(400),
            fade_out: Duration::from_millis(300),
            no_results_delay: Duration::from_millis(50),
            no_results_fade: Duration::from_millis(300),
            touch_feedback: Duration::from_millis(150),
            scroll_breakpoint: 768,
            hash_prefix: "services".to_string(),
        }
    }
}

/// Section navigation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavConfig {
    pub section_selector: String,
    pub link_selector: String,
    pub cta_selector: String,
    pub aside_selector: String,
    pub toggler_selector: String,
    pub active_class: String,
    pub back_class: String,
    pub open_class: String,
    /// Below this width a navigation closes the aside.
    pub aside_breakpoint: u32,
    /// Wait after the load sequence settles before honouring the URL hash.
    #[serde(rename = "deep_link_delay_ms", with = "millis")]
    pub deep_link_delay: Duration,
    /// Wait after a post-load transition before clearing inline overrides.
    #[serde(rename = "style_reset_delay_ms", with = "millis")]
    pub style_reset_delay: Duration,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            section_selector: ".section".to_string(),
            link_selector: ".nav a".to_string(),
            cta_selector: "[data-section-index]".to_string(),
            aside_selector: ".aside".to_string(),
            toggler_selector: ".nav-toggler".to_string(),
            active_class: "active".to_string(),
            back_class: "back-section".to_string(),
            open_class: "open".to_string(),
            aside_breakpoint: 1200,
            deep_link_delay: Duration::from_millis(200),
            style_reset_delay: Duration::from_millis(50),
        }
    }
}

/// Scroll reveal configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    pub visible_class: String,
    /// Fraction of the element that must be on screen.
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".reveal".to_string(),
            visible_class: "is-visible".to_string(),
            threshold: 0.1,
            root_margin: "0px 0px -50px 0px".to_string(),
        }
    }
}

/// Page load sequencing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLoadConfig {
    pub preload_class: String,
    pub loaded_class: String,
    /// Wait after `window.load` before declaring the page settled.
    #[serde(rename = "settle_ms", with = "millis")]
    pub settle: Duration,
    /// Declare the page settled this long after DOM ready even without `load`.
    #[serde(rename = "fallback_ms", with = "millis")]
    pub fallback: Duration,
}

impl Default for PageLoadConfig {
    fn default() -> Self {
        Self {
            preload_class: "preload".to_string(),
            loaded_class: "loaded".to_string(),
            settle: Duration::from_millis(100),
            fallback: Duration::from_millis(1000),
        }
    }
}

/// Resize and orientation handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponsiveConfig {
    #[serde(rename = "resize_debounce_ms", with = "millis")]
    pub resize_debounce: Duration,
    #[serde(rename = "orientation_delay_ms", with = "millis")]
    pub orientation_delay: Duration,
}

impl Default for ResponsiveConfig {
    fn default() -> Self {
        Self {
            resize_debounce: Duration::from_millis(250),
            orientation_delay: Duration::from_millis(500),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub filter: FilterConfig,
    pub nav: NavConfig,
    pub reveal: RevealConfig,
    pub page_load: PageLoadConfig,
    pub responsive: ResponsiveConfig,
}

impl SiteConfig {
    /// Parse a JSON object; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the runtime unable to find anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let selectors = [
            ("filter.button_selector", &self.filter.button_selector),
            ("filter.item_selector", &self.filter.item_selector),
            ("nav.section_selector", &self.nav.section_selector),
            ("nav.link_selector", &self.nav.link_selector),
            ("reveal.selector", &self.reveal.selector),
        ];
        for (field, value) in selectors {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "selector must not be empty".to_string(),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            return Err(ConfigError::Invalid {
                field: "reveal.threshold",
                reason: format!("{} is outside [0, 1]", self.reveal.threshold),
            });
        }
        Ok(())
    }
}

mod millis {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

mod stagger_mode {
    use super::*;

    pub fn serialize<S: Serializer>(value: &StaggerMode, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(value.name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<StaggerMode, D::Error> {
        let name = String::deserialize(d)?;
        StaggerMode::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown stagger mode `{name}`")))
    }
}
