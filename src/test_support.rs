//! Recording fake hosts shared by the controller tests.

use std::collections::{BTreeSet, HashMap};

use crate::error::{Error, Result};
use crate::host::{NavHost, ThemeHost};

#[derive(Debug, Default)]
pub struct FakeThemeHost {
    pub storage: HashMap<String, String>,
    pub storage_broken: bool,
    pub prefers_dark: Option<bool>,
    pub attributes: HashMap<String, String>,
    pub attribute_broken: bool,
    pub classes: BTreeSet<String>,
    pub saves: Vec<(String, String)>,
    pub attribute_writes: Vec<String>,
}

impl FakeThemeHost {
    pub fn with_preference(value: &str) -> Self {
        let mut host = Self::default();
        host.storage.insert("pref-theme".into(), value.into());
        host
    }

    pub fn with_system_dark(prefers_dark: bool) -> Self {
        Self { prefers_dark: Some(prefers_dark), ..Self::default() }
    }

    pub fn theme_attribute(&self) -> Option<&str> {
        self.attributes.get("data-theme").map(String::as_str)
    }

    pub fn stored(&self) -> Option<&str> {
        self.storage.get("pref-theme").map(String::as_str)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

impl ThemeHost for FakeThemeHost {
    fn load_preference(&self, key: &str) -> Result<Option<String>> {
        if self.storage_broken {
            return Err(Error::StorageUnavailable("denied".into()));
        }
        Ok(self.storage.get(key).cloned())
    }

    fn save_preference(&mut self, key: &str, value: &str) -> Result<()> {
        if self.storage_broken {
            return Err(Error::StorageUnavailable("denied".into()));
        }
        self.saves.push((key.to_owned(), value.to_owned()));
        self.storage.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn prefers_dark(&self) -> Result<bool> {
        self.prefers_dark
            .ok_or_else(|| Error::MediaQueryUnavailable("matchMedia missing".into()))
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        if self.attribute_broken {
            return Err(Error::Dom("attribute write rejected".into()));
        }
        self.attribute_writes.push(value.to_owned());
        self.attributes.insert(name.to_owned(), value.to_owned());
        Ok(())
    }

    fn add_root_class(&mut self, class: &str) -> Result<()> {
        self.classes.insert(class.to_owned());
        Ok(())
    }

    fn remove_root_class(&mut self, class: &str) -> Result<()> {
        self.classes.remove(class);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeNavHost {
    pub reduced_motion: Option<bool>,
    pub overlay_insert_fails: bool,
    pub navigate_fails: bool,
    pub overlay_inserted: bool,
    pub overlay_visible: bool,
    pub visibility_writes: Vec<bool>,
    pub navigations: Vec<String>,
}

impl FakeNavHost {
    pub fn new() -> Self {
        Self { reduced_motion: Some(false), ..Self::default() }
    }
}

impl NavHost for FakeNavHost {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        self.reduced_motion
            .ok_or_else(|| Error::MediaQueryUnavailable("matchMedia missing".into()))
    }

    fn insert_overlay(&mut self) -> Result<()> {
        if self.overlay_insert_fails {
            return Err(Error::MissingElement("body".into()));
        }
        self.overlay_inserted = true;
        Ok(())
    }

    fn remove_overlay(&mut self) -> Result<()> {
        self.overlay_inserted = false;
        Ok(())
    }

    fn set_overlay_visible(&mut self, visible: bool) -> Result<()> {
        if !self.overlay_inserted {
            return Err(Error::MissingElement("overlay".into()));
        }
        self.overlay_visible = visible;
        self.visibility_writes.push(visible);
        Ok(())
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        if self.navigate_fails {
            return Err(Error::Navigation { url: url.to_owned(), reason: "blocked".into() });
        }
        self.navigations.push(url.to_owned());
        Ok(())
    }
}
