//! Navigation transition controller: overlay fades around same-origin loads.
//!
//! SYSTEM CONTEXT
//! ==============
//! An eligible link click is intercepted and the real page load is deferred
//! behind an overlay fade. Two participants race to trigger it: the overlay's
//! opacity `transitionend` and a fallback timer. A [`SettleOnce`] latch per
//! attempt lets exactly one of them navigate; the winner's effects tell the
//! host to cancel the loser.
//!
//! The controller never touches the theme attribute or the persisted
//! preference. With reduced motion requested, or when the overlay cannot be
//! inserted, it stays disabled and every click navigates natively.

#[cfg(test)]
#[path = "navigation_test.rs"]
mod navigation_test;

use url::Url;

use crate::config::NavigationConfig;
use crate::consts;
use crate::host::NavHost;
use crate::latch::{ExitSignal, SettleOnce};

/// The link element a click resolved to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href`, absolute or relative to the current page.
    pub href: String,
    /// Browsing-context `target`, if set.
    pub target: Option<String>,
    /// The `download` attribute is present.
    pub download: bool,
    /// Value of the opt-out attribute (`data-transition`), if set.
    pub transition: Option<String>,
}

/// Keyboard modifiers held during a click.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key held.
    pub shift: bool,
    /// Control key held.
    pub ctrl: bool,
    /// Alt/Option key held.
    pub alt: bool,
    /// Meta/Command key held.
    pub meta: bool,
}

impl Modifiers {
    #[must_use]
    pub fn any(self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Button {
    #[default]
    Primary,
    Middle,
    Secondary,
    Other,
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Other,
        }
    }
}

/// A click as seen by the document-level listener.
#[derive(Debug, Clone, Default)]
pub struct Click {
    pub anchor: Option<Anchor>,
    pub button: Button,
    pub modifiers: Modifiers,
    pub default_prevented: bool,
    /// Absolute URL of the current page.
    pub current_url: String,
}

/// Deferred work requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEffect {
    /// Listen for the overlay's `transitionend` and start a fallback timer of
    /// `fallback_ms`, both reporting `attempt`.
    ArmExit { attempt: u64, fallback_ms: u32 },
    /// Remove the listener and clear the timer armed for `attempt`.
    DisarmExit { attempt: u64 },
    /// Call [`NavigationController::on_frame`] on the next paint frame.
    RequestFrame,
    /// Call [`NavigationController::play_enter`] after `delay_ms`.
    ScheduleEnter { delay_ms: u32 },
}

/// Outcome of [`NavigationController::on_click`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDecision {
    /// Let the browser navigate.
    Native,
    /// Prevent the default action and run the effects.
    Intercept(Vec<NavEffect>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayVisibility {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisableReason {
    ReducedMotion,
    OverlayUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// Not started, or torn down.
    Inactive,
    Active,
    Disabled(DisableReason),
}

#[derive(Debug)]
struct ExitAttempt {
    id: u64,
    href: String,
    latch: SettleOnce,
}

pub struct NavigationController<H: NavHost> {
    host: H,
    config: NavigationConfig,
    status: ControllerStatus,
    overlay: OverlayVisibility,
    next_attempt: u64,
    pending: Option<ExitAttempt>,
    enter_scheduled: bool,
    frame_requested: bool,
}

impl<H: NavHost> NavigationController<H> {
    #[must_use]
    pub fn new(host: H, config: NavigationConfig) -> Self {
        Self {
            host,
            config,
            status: ControllerStatus::Inactive,
            overlay: OverlayVisibility::Hidden,
            next_attempt: 0,
            pending: None,
            enter_scheduled: false,
            frame_requested: false,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    #[must_use]
    pub fn status(&self) -> ControllerStatus {
        self.status
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayVisibility {
        self.overlay
    }

    /// Id of the exit attempt in flight, if any.
    #[must_use]
    pub fn pending_attempt(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.id)
    }

    fn is_active(&self) -> bool {
        self.status == ControllerStatus::Active
    }

    // --- Lifecycle ---

    /// Check the reduced-motion opt-out once and insert the overlay.
    ///
    /// The overlay starts visible so a freshly loaded page fades in.
    pub fn start(&mut self) -> ControllerStatus {
        if self.status != ControllerStatus::Inactive {
            return self.status;
        }
        match self.host.prefers_reduced_motion() {
            Ok(true) => {
                log::info!("navigation: reduced motion requested; transitions disabled");
                self.status = ControllerStatus::Disabled(DisableReason::ReducedMotion);
                return self.status;
            }
            Ok(false) => {}
            Err(e) => log::warn!("{}: {e}; assuming full motion", e.code()),
        }

        if let Err(e) = self.host.insert_overlay() {
            log::warn!("{}: {e}; falling back to native navigation", e.code());
            self.status = ControllerStatus::Disabled(DisableReason::OverlayUnavailable);
            return self.status;
        }
        self.status = ControllerStatus::Active;
        self.set_overlay(OverlayVisibility::Visible);
        self.status
    }

    /// Load complete: fade the overlay out after the enter delay, once.
    pub fn on_load_complete(&mut self) -> Vec<NavEffect> {
        if !self.is_active() || self.enter_scheduled {
            return Vec::new();
        }
        self.enter_scheduled = true;
        vec![NavEffect::ScheduleEnter { delay_ms: self.config.enter_delay_ms }]
    }

    /// Page shown again from the back/forward cache.
    ///
    /// Forces the overlay visible, forgets any attempt left over from the
    /// forward navigation, and schedules the hide.
    pub fn on_cache_restore(&mut self) -> Vec<NavEffect> {
        if !self.is_active() {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if let Some(stale) = self.pending.take() {
            log::debug!("navigation: dropping stale attempt {}", stale.id);
            effects.push(NavEffect::DisarmExit { attempt: stale.id });
        }
        self.set_overlay(OverlayVisibility::Visible);
        effects.extend(self.play_enter());
        effects
    }

    /// Remove the overlay and forget any attempt in flight.
    pub fn teardown(&mut self) -> Vec<NavEffect> {
        let mut effects = Vec::new();
        if let Some(pending) = self.pending.take() {
            effects.push(NavEffect::DisarmExit { attempt: pending.id });
        }
        if self.is_active() {
            if let Err(e) = self.host.remove_overlay() {
                log::warn!("{}: {e}; overlay left in place", e.code());
            }
        }
        self.status = ControllerStatus::Inactive;
        self.overlay = OverlayVisibility::Hidden;
        self.enter_scheduled = false;
        self.frame_requested = false;
        effects
    }

    // --- Clicks ---

    /// Decide whether a click is intercepted.
    ///
    /// A click during an exit replaces the attempt in flight, so the last
    /// link clicked is the one loaded.
    pub fn on_click(&mut self, click: &Click) -> ClickDecision {
        if !self.is_active() || click.default_prevented {
            return ClickDecision::Native;
        }
        if click.button != Button::Primary || click.modifiers.any() {
            return ClickDecision::Native;
        }
        let Some(anchor) = &click.anchor else {
            return ClickDecision::Native;
        };
        let current = match Url::parse(&click.current_url) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("navigation: unparseable page url {:?}: {e}", click.current_url);
                return ClickDecision::Native;
            }
        };
        let Some(target) = eligible_target(anchor, &current) else {
            return ClickDecision::Native;
        };

        let mut effects = Vec::new();
        if let Some(superseded) = self.pending.take() {
            log::debug!("navigation: attempt {} superseded by {target}", superseded.id);
            effects.push(NavEffect::DisarmExit { attempt: superseded.id });
        }
        effects.extend(self.play_exit(target.as_str()));
        ClickDecision::Intercept(effects)
    }

    // --- Exit ---

    /// Show the overlay and arm both race participants for `href`.
    ///
    /// While disabled there is nothing to animate, so this navigates at once.
    pub fn play_exit(&mut self, href: &str) -> Vec<NavEffect> {
        if !self.is_active() {
            self.navigate(href);
            return Vec::new();
        }
        self.set_overlay(OverlayVisibility::Visible);
        self.next_attempt += 1;
        let attempt = self.next_attempt;
        log::debug!("navigation: exit {attempt} to {href}");
        self.pending = Some(ExitAttempt { id: attempt, href: href.to_owned(), latch: SettleOnce::new() });
        vec![NavEffect::ArmExit { attempt, fallback_ms: self.config.exit_fallback_ms }]
    }

    /// The overlay reported `transitionend` for `property`.
    pub fn on_exit_transition_end(&mut self, attempt: u64, property: &str) -> Vec<NavEffect> {
        if property != consts::OVERLAY_PROPERTY {
            return Vec::new();
        }
        self.finish_exit(attempt, ExitSignal::TransitionEnd)
    }

    /// The fallback timer armed for `attempt` fired.
    pub fn on_exit_fallback(&mut self, attempt: u64) -> Vec<NavEffect> {
        self.finish_exit(attempt, ExitSignal::Fallback)
    }

    fn finish_exit(&mut self, attempt: u64, signal: ExitSignal) -> Vec<NavEffect> {
        let Some(pending) = self.pending.as_mut() else {
            return Vec::new();
        };
        if pending.id != attempt {
            log::debug!("navigation: ignoring {signal:?} for stale attempt {attempt}");
            return Vec::new();
        }
        let Some(loser) = pending.latch.settle(signal) else {
            return Vec::new();
        };
        log::debug!("navigation: exit {attempt} settled by {signal:?}, cancelling {loser:?}");

        let href = pending.href.clone();
        let mut effects = vec![NavEffect::DisarmExit { attempt }];
        if !self.navigate(&href) {
            self.pending = None;
            effects.extend(self.play_enter());
        }
        effects
    }

    fn navigate(&mut self, href: &str) -> bool {
        match self.host.navigate(href) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{}: {e}", e.code());
                false
            }
        }
    }

    // --- Enter ---

    /// Hide the overlay on the next paint frame.
    pub fn play_enter(&mut self) -> Vec<NavEffect> {
        if !self.is_active() || self.frame_requested {
            return Vec::new();
        }
        self.frame_requested = true;
        vec![NavEffect::RequestFrame]
    }

    /// The frame requested by [`Self::play_enter`] arrived.
    pub fn on_frame(&mut self) {
        if !self.frame_requested {
            return;
        }
        self.frame_requested = false;
        if self.pending.is_some() {
            return;
        }
        self.set_overlay(OverlayVisibility::Hidden);
    }

    fn set_overlay(&mut self, visibility: OverlayVisibility) {
        let visible = visibility == OverlayVisibility::Visible;
        if let Err(e) = self.host.set_overlay_visible(visible) {
            log::warn!("{}: {e}; overlay visibility unchanged", e.code());
            return;
        }
        self.overlay = visibility;
    }
}

/// Whether a click on `anchor` should be animated.
#[must_use]
pub fn is_eligible(anchor: &Anchor, current: &Url) -> bool {
    eligible_target(anchor, current).is_some()
}

/// The resolved destination of an eligible anchor.
///
/// Eligible means same origin, same browsing context, not a download, not
/// opted out, and not a fragment jump within the current document.
#[must_use]
pub fn eligible_target(anchor: &Anchor, current: &Url) -> Option<Url> {
    if anchor.download || opens_new_context(anchor.target.as_deref()) {
        return None;
    }
    if anchor.transition.as_deref() == Some("false") {
        return None;
    }
    let target = match current.join(&anchor.href) {
        Ok(url) => url,
        Err(e) => {
            log::debug!("navigation: unparseable href {:?}: {e}", anchor.href);
            return None;
        }
    };
    if target.origin() != current.origin() {
        return None;
    }
    if target.fragment().is_some() && without_fragment(&target) == without_fragment(current) {
        return None;
    }
    Some(target)
}

fn opens_new_context(target: Option<&str>) -> bool {
    match target.map(str::trim) {
        None | Some("" | "_self" | "_parent" | "_top") => false,
        Some(_) => true,
    }
}

fn without_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}
