//! Theme resolver: which mode is active, and when changing it may animate.
//!
//! SYSTEM CONTEXT
//! ==============
//! The resolver owns the `data-theme` attribute on the root element and the
//! single persisted preference entry. At load it resolves a mode from storage
//! (or the system color-scheme signal) and applies it with transitions
//! suppressed. Once the settle delay elapses it enables transitions and forces
//! the mode implied by the current path. Every later path change observed by
//! the host (popstate, cache-restore) re-asserts the path-derived mode; a
//! manual toggle holds only until then.
//!
//! Deferred work is returned as [`ThemeEffect`]s. The host schedules them and
//! reports back through [`ThemeResolver::on_settled`] and
//! [`ThemeResolver::on_transition_timeout`].
//!
//! ORDERING
//! ========
//! A silent mutation always adds the loading marker before the attribute is
//! written, and the marker removal is only ever requested as a `Settle`
//! effect returned after that write.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::config::ThemeConfig;
use crate::host::ThemeHost;
use crate::mode::{Mode, classify};
use crate::transition::{TransitionMachine, TransitionPhase};

/// Deferred work requested by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeEffect {
    /// Call [`ThemeResolver::on_settled`] after `delay_ms`, replacing any
    /// pending settle.
    Settle { delay_ms: u32 },
    /// Call [`ThemeResolver::on_transition_timeout`] with `generation` after
    /// `delay_ms`, replacing any armed timeout.
    ArmTransitionTimeout { generation: u64, delay_ms: u32 },
    /// Cancel the armed transition timeout.
    DisarmTransitionTimeout,
}

/// What caused a mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Resolved from storage or system preference at load.
    Initial,
    /// Forced by path classification.
    Path,
    /// Flipped by the toggle control.
    Toggle,
    /// Set through [`ThemeResolver::apply_mode`].
    Direct,
}

/// Notification emitted synchronously by every mode mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeChange {
    /// Mode before the write; `None` for the first one.
    pub previous: Option<Mode>,
    /// Mode now on the root.
    pub current: Mode,
    /// What asked for the change.
    pub origin: ChangeOrigin,
}

type Listener = Box<dyn FnMut(&ModeChange)>;

pub struct ThemeResolver<H: ThemeHost> {
    host: H,
    config: ThemeConfig,
    mode: Option<Mode>,
    transition: TransitionMachine,
    listeners: Vec<Listener>,
}

impl<H: ThemeHost> ThemeResolver<H> {
    #[must_use]
    pub fn new(host: H, config: ThemeConfig) -> Self {
        let transition = TransitionMachine::new(config.watched_properties.clone());
        Self { host, config, mode: None, transition, listeners: Vec::new() }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The mode last written, or `None` before the first write.
    #[must_use]
    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    /// Register a mode-changed listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&ModeChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    // --- Resolution ---

    /// Persisted preference if present and valid, else the system signal.
    ///
    /// Unavailable capabilities degrade to [`Mode::Light`].
    #[must_use]
    pub fn resolve_initial_mode(&self) -> Mode {
        match self.host.load_preference(&self.config.storage_key) {
            Ok(Some(raw)) => match raw.parse::<Mode>() {
                Ok(mode) => return mode,
                Err(e) => log::warn!("{}: {e}; ignoring persisted preference", e.code()),
            },
            Ok(None) => {}
            Err(e) => log::warn!("{}: {e}; ignoring persisted preference", e.code()),
        }

        match self.host.prefers_dark() {
            Ok(prefers_dark) => Mode::from_prefers_dark(prefers_dark),
            Err(e) => {
                log::warn!("{}: {e}; defaulting to light", e.code());
                Mode::Light
            }
        }
    }

    // --- Lifecycle ---

    /// Load: resolve the initial mode and apply it without animation.
    pub fn start(&mut self) -> Vec<ThemeEffect> {
        let mode = self.resolve_initial_mode();
        log::debug!("theme: initial mode {mode}");
        self.apply(mode, false, ChangeOrigin::Initial)
    }

    /// Settle delay elapsed: enable transitions, then force the path mode.
    pub fn on_settled(&mut self, path: &str) -> Vec<ThemeEffect> {
        if !self.transition.settle() {
            return Vec::new();
        }
        remove_class(&mut self.host, &self.config.loading_class);
        add_class(&mut self.host, &self.config.ready_class);
        log::debug!("theme: transitions enabled");
        self.sync_to_path(path)
    }

    /// Back/forward navigation observed.
    pub fn on_history_navigation(&mut self, path: &str) -> Vec<ThemeEffect> {
        self.sync_to_path(path)
    }

    /// Page shown again from the back/forward cache.
    pub fn on_cache_restore(&mut self, path: &str) -> Vec<ThemeEffect> {
        self.sync_to_path(path)
    }

    // --- Mutations ---

    /// Force the mode implied by `path`. No-op when it already holds.
    pub fn sync_to_path(&mut self, path: &str) -> Vec<ThemeEffect> {
        let target = classify(path).target_mode();
        if self.mode == Some(target) {
            return Vec::new();
        }
        log::debug!("theme: {path} forces {target}");
        let effects = self.apply(target, self.transition.is_enabled(), ChangeOrigin::Path);
        self.persist(target);
        effects
    }

    /// Flip the mode and persist it. Holds until the next path change.
    pub fn toggle(&mut self) -> Vec<ThemeEffect> {
        let next = self.mode.unwrap_or_else(|| self.resolve_initial_mode()).toggled();
        let effects = self.apply(next, self.transition.is_enabled(), ChangeOrigin::Toggle);
        self.persist(next);
        effects
    }

    /// Write `mode`. With `animate == false` transitions are suppressed until
    /// the returned `Settle` effect fires.
    pub fn apply_mode(&mut self, mode: Mode, animate: bool) -> Vec<ThemeEffect> {
        self.apply(mode, animate, ChangeOrigin::Direct)
    }

    // --- Transition reports ---

    /// A `transitionend` bubbled to the document.
    pub fn on_transition_end(&mut self, property: &str) -> Vec<ThemeEffect> {
        if !self.transition.on_transition_end(property) {
            return Vec::new();
        }
        remove_class(&mut self.host, &self.config.changing_class);
        vec![ThemeEffect::DisarmTransitionTimeout]
    }

    /// The transition timeout armed for `generation` fired.
    pub fn on_transition_timeout(&mut self, generation: u64) {
        if self.transition.on_timeout(generation) {
            log::debug!("theme: transition {generation} timed out");
            remove_class(&mut self.host, &self.config.changing_class);
        }
    }

    /// Drop listeners and return to the pre-start state. Both lifecycle
    /// classes come off the root so page transitions are not left suppressed.
    pub fn teardown(&mut self) -> Vec<ThemeEffect> {
        self.listeners.clear();
        let was_animating = matches!(self.transition.phase(), TransitionPhase::Animating { .. });
        self.transition.suppress();
        self.mode = None;
        if was_animating {
            remove_class(&mut self.host, &self.config.changing_class);
        }
        remove_class(&mut self.host, &self.config.loading_class);
        remove_class(&mut self.host, &self.config.ready_class);
        vec![ThemeEffect::DisarmTransitionTimeout]
    }

    // --- Internals ---

    fn apply(&mut self, mode: Mode, animate: bool, origin: ChangeOrigin) -> Vec<ThemeEffect> {
        let mut effects = Vec::new();
        if !animate {
            if matches!(self.transition.phase(), TransitionPhase::Animating { .. }) {
                remove_class(&mut self.host, &self.config.changing_class);
                effects.push(ThemeEffect::DisarmTransitionTimeout);
            }
            self.transition.suppress();
            add_class(&mut self.host, &self.config.loading_class);
            remove_class(&mut self.host, &self.config.ready_class);
            self.set_mode(mode, origin);
            effects.push(ThemeEffect::Settle { delay_ms: self.config.settle_delay_ms });
            return effects;
        }

        if let Some(generation) = self.set_mode(mode, origin) {
            add_class(&mut self.host, &self.config.changing_class);
            effects.push(ThemeEffect::ArmTransitionTimeout {
                generation,
                delay_ms: self.config.transition_timeout_ms,
            });
        }
        effects
    }

    /// The single setter. Writes the attribute, notifies listeners, and feeds
    /// the transition machine. Returns the generation of a started animation.
    fn set_mode(&mut self, mode: Mode, origin: ChangeOrigin) -> Option<u64> {
        let previous = self.mode;
        if let Err(e) = self.host.set_root_attribute(&self.config.attribute, mode.as_str()) {
            log::warn!("{}: {e}; mode {mode} not reflected on root", e.code());
        }
        self.mode = Some(mode);
        if previous == Some(mode) {
            return None;
        }

        let change = ModeChange { previous, current: mode, origin };
        for listener in &mut self.listeners {
            listener(&change);
        }
        self.transition.on_mode_changed()
    }

    fn persist(&mut self, mode: Mode) {
        if let Err(e) = self.host.save_preference(&self.config.storage_key, mode.as_str()) {
            log::warn!("{}: {e}; preference {mode} not persisted", e.code());
        }
    }
}

fn add_class<H: ThemeHost>(host: &mut H, class: &str) {
    if let Err(e) = host.add_root_class(class) {
        log::warn!("{}: {e}; could not add {class}", e.code());
    }
}

fn remove_class<H: ThemeHost>(host: &mut H, class: &str) {
    if let Err(e) = host.remove_root_class(class) {
        log::warn!("{}: {e}; could not remove {class}", e.code());
    }
}
