//! Default names and timings shared by the theme and navigation controllers.

// ── Theme ───────────────────────────────────────────────────────

/// `localStorage` key holding the persisted mode.
pub const PREF_STORAGE_KEY: &str = "pref-theme";

/// Attribute on `<html>` carrying the active mode.
pub const MODE_ATTRIBUTE: &str = "data-theme";

/// Root class that suppresses every transition until the first paint settles.
pub const LOADING_CLASS: &str = "theme-loading";

/// Root class marking that mode changes may animate.
pub const READY_CLASS: &str = "theme-transitions-ready";

/// Root class present while a mode change is animating.
pub const CHANGING_CLASS: &str = "is-changing-theme";

/// Pause after the initial paint before transitions are enabled.
pub const SETTLE_DELAY_MS: u32 = 100;

/// Upper bound on how long a mode change may stay in the animating state.
///
/// Slightly longer than the slowest declared color transition (0.6s).
pub const TRANSITION_TIMEOUT_MS: u32 = 700;

/// CSS properties whose `transitionend` closes a mode-change animation.
pub const WATCHED_PROPERTIES: [&str; 2] = ["background-color", "color"];

/// Id of the optional toggle control.
pub const TOGGLE_ID: &str = "theme-toggle";

/// Media query for the system dark preference.
pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

// ── Navigation ──────────────────────────────────────────────────

/// Class of the full-page overlay element.
pub const OVERLAY_CLASS: &str = "page-transition-overlay";

/// Overlay class that drives the opacity transition to visible.
pub const VISIBLE_CLASS: &str = "is-visible";

/// Anchor attribute that opts a link out when set to `"false"`.
pub const OPT_OUT_ATTRIBUTE: &str = "data-transition";

/// The only overlay property whose `transitionend` can trigger navigation.
pub const OVERLAY_PROPERTY: &str = "opacity";

/// Delay after load-complete before the overlay fades out.
pub const ENTER_DELAY_MS: u32 = 50;

/// Fallback that forces navigation when the exit animation never reports back.
pub const EXIT_FALLBACK_MS: u32 = 600;

/// Media query for the reduced-motion opt-out.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
