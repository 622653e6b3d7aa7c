//! Theme resolution and page-transition controllers for a content site.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It keeps the
//! `data-theme` attribute on `<html>` consistent with the persisted preference
//! at load and with the current path afterwards, animates mode changes only
//! once the first paint has settled, and fades an overlay around same-origin
//! link navigations while guaranteeing the real navigation fires exactly once.
//!
//! Both controllers are plain state machines over host traits, so everything
//! except the `web` binding runs natively under `cargo test`.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`theme`] | Theme resolver: initial mode, path sync, toggle |
//! | [`transition`] | Settling / idle / animating lifecycle of mode changes |
//! | [`navigation`] | Link interception, overlay exit/enter, navigation race |
//! | [`latch`] | Settle-once latch arbitrating the exit race |
//! | [`mode`] | `Mode` and path classification |
//! | [`host`] | Host capability traits |
//! | [`config`] | Serde-backed runtime configuration |
//! | [`consts`] | Default names and timings |
//! | [`error`] | Error type |
//! | `web` | `web-sys` hosts and event wiring (feature `web`) |

pub mod config;
pub mod consts;
pub mod error;
pub mod host;
pub mod latch;
pub mod mode;
pub mod navigation;
pub mod theme;
pub mod transition;
#[cfg(feature = "web")]
pub mod web;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Error, Result};
pub use mode::{Mode, PathClass, classify};
