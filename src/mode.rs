//! Visual mode and path classification.
//!
//! `classify` is a pure function of the path string: a path is an entry page
//! when it contains `/entry/<segment>/` with a non-empty, slash-free segment.
//! The trailing slash is required, so `/entry/my-post` is a listing.

#[cfg(test)]
#[path = "mode_test.rs"]
mod mode_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

const ENTRY_PREFIX: &str = "/entry/";

/// The active visual theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

impl Mode {
    /// Attribute / storage representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Map the system "prefers dark" signal onto a mode.
    #[must_use]
    pub fn from_prefers_dark(prefers_dark: bool) -> Self {
        if prefers_dark { Self::Dark } else { Self::Light }
    }

    #[must_use]
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(Error::InvalidMode(other.to_owned())),
        }
    }
}

/// Category of a navigation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    /// Per-item detail route.
    Entry,
    /// Everything else.
    Listing,
}

impl PathClass {
    /// Mode a page of this category is forced into.
    #[must_use]
    pub fn target_mode(self) -> Mode {
        match self {
            Self::Entry => Mode::Light,
            Self::Listing => Mode::Dark,
        }
    }
}

/// Classify `path` as an entry or listing page.
#[must_use]
pub fn classify(path: &str) -> PathClass {
    let is_entry = path.match_indices(ENTRY_PREFIX).any(|(start, _)| {
        let rest = &path[start + ENTRY_PREFIX.len()..];
        rest.find('/').is_some_and(|end| end > 0)
    });
    if is_entry { PathClass::Entry } else { PathClass::Listing }
}
