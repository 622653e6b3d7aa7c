//! Host capabilities the controllers drive.
//!
//! Everything synchronous the controllers need from the page sits behind these
//! traits: the preference store, media queries, the root element, the overlay
//! and the navigation primitive. The browser binding implements them over
//! `web-sys`; tests implement them with recording fakes.

#[cfg(test)]
#[path = "host_test.rs"]
mod host_test;

use crate::error::Result;

/// `document.readyState`, as far as the wiring cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    /// Still parsing; `<body>` and its controls may not exist yet.
    Loading,
    /// Parsed; subresources may still be loading.
    Interactive,
    /// The `load` event has fired or is about to.
    Complete,
}

impl ReadyState {
    /// Map the DOM string. Unknown values count as still loading, so wiring
    /// waits for `DOMContentLoaded` instead of querying a partial tree.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "interactive" => Self::Interactive,
            "complete" => Self::Complete,
            _ => Self::Loading,
        }
    }

    /// The element tree is parsed, so controls in `<body>` can be looked up.
    #[must_use]
    pub fn is_parsed(self) -> bool {
        self != Self::Loading
    }

    #[must_use]
    pub fn is_complete(self) -> bool {
        self == Self::Complete
    }
}

/// Capabilities used by [`crate::theme::ThemeResolver`].
pub trait ThemeHost {
    /// Read the persisted preference stored under `key`.
    fn load_preference(&self, key: &str) -> Result<Option<String>>;

    /// Persist `value` under `key`.
    fn save_preference(&mut self, key: &str, value: &str) -> Result<()>;

    /// Whether the system reports a dark color-scheme preference.
    fn prefers_dark(&self) -> Result<bool>;

    /// Set attribute `name` on the root element.
    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()>;

    /// Add `class` to the root element's class list.
    fn add_root_class(&mut self, class: &str) -> Result<()>;

    /// Remove `class` from the root element's class list; absent is not an error.
    fn remove_root_class(&mut self, class: &str) -> Result<()>;
}

/// Capabilities used by [`crate::navigation::NavigationController`].
pub trait NavHost {
    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> Result<bool>;

    /// Create the overlay element and attach it to the page.
    fn insert_overlay(&mut self) -> Result<()>;

    /// Detach the overlay element, if one was inserted.
    fn remove_overlay(&mut self) -> Result<()>;

    fn set_overlay_visible(&mut self, visible: bool) -> Result<()>;

    /// Perform a real page load of `url`.
    fn navigate(&mut self, url: &str) -> Result<()>;
}
