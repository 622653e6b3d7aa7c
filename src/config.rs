//! Runtime configuration for both controllers.
//!
//! Every field has a default, so the page may pass a partial JSON object (or
//! nothing at all) to the browser entry point.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub theme: ThemeConfig,
    pub navigation: NavigationConfig,
    /// Console log level: `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: ThemeConfig::default(),
            navigation: NavigationConfig::default(),
            log_level: "warn".to_owned(),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] on malformed JSON or unknown fields.
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `log_level` as a filter, falling back to `Warn` when unrecognised.
    #[must_use]
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Warn)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    pub storage_key: String,
    pub attribute: String,
    pub loading_class: String,
    pub ready_class: String,
    pub changing_class: String,
    pub settle_delay_ms: u32,
    pub transition_timeout_ms: u32,
    pub watched_properties: Vec<String>,
    pub toggle_id: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: consts::PREF_STORAGE_KEY.to_owned(),
            attribute: consts::MODE_ATTRIBUTE.to_owned(),
            loading_class: consts::LOADING_CLASS.to_owned(),
            ready_class: consts::READY_CLASS.to_owned(),
            changing_class: consts::CHANGING_CLASS.to_owned(),
            settle_delay_ms: consts::SETTLE_DELAY_MS,
            transition_timeout_ms: consts::TRANSITION_TIMEOUT_MS,
            watched_properties: consts::WATCHED_PROPERTIES.iter().map(|p| (*p).to_owned()).collect(),
            toggle_id: consts::TOGGLE_ID.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavigationConfig {
    pub overlay_class: String,
    pub visible_class: String,
    pub opt_out_attribute: String,
    pub enter_delay_ms: u32,
    pub exit_fallback_ms: u32,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            overlay_class: consts::OVERLAY_CLASS.to_owned(),
            visible_class: consts::VISIBLE_CLASS.to_owned(),
            opt_out_attribute: consts::OPT_OUT_ATTRIBUTE.to_owned(),
            enter_delay_ms: consts::ENTER_DELAY_MS,
            exit_fallback_ms: consts::EXIT_FALLBACK_MS,
        }
    }
}
