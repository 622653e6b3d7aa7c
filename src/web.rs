//! Browser binding: `web-sys` hosts and DOM event wiring.
//!
//! ARCHITECTURE
//! ============
//! [`start`] builds a single [`Runtime`] holding both controllers in
//! `RefCell`s behind an `Rc`. DOM listeners, timers and animation frames hold
//! only a `Weak` back-reference, so dropping the [`PageFx`] handle (or calling
//! [`PageFx::teardown`]) releases everything. Controller borrows are always
//! released before their effects run.
//!
//! Call `start()` from a script in `<head>` so the mode attribute is set
//! before first paint. The toggle control and navigation wiring wait for
//! `DOMContentLoaded`, since both need `<body>`.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    Document, Element, Event, EventTarget, HtmlAnchorElement, MouseEvent, PageTransitionEvent, TransitionEvent,
    Window,
};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::{NavHost, ReadyState, ThemeHost};
use crate::navigation::{Anchor, Button, Click, ClickDecision, ControllerStatus, Modifiers, NavEffect, NavigationController};
use crate::theme::{ThemeEffect, ThemeResolver};
use crate::consts;

// =============================================================
// Hosts
// =============================================================

fn dom(e: JsValue) -> Error {
    Error::Dom(format!("{e:?}"))
}

fn match_media(window: &Window, query: &str) -> Result<bool> {
    match window.match_media(query) {
        Ok(Some(list)) => Ok(list.matches()),
        Ok(None) => Err(Error::MediaQueryUnavailable(query.to_owned())),
        Err(e) => Err(Error::MediaQueryUnavailable(format!("{query}: {e:?}"))),
    }
}

struct BrowserThemeHost {
    window: Window,
    root: Element,
}

impl BrowserThemeHost {
    fn storage(&self) -> Result<web_sys::Storage> {
        match self.window.local_storage() {
            Ok(Some(storage)) => Ok(storage),
            Ok(None) => Err(Error::StorageUnavailable("localStorage disabled".to_owned())),
            Err(e) => Err(Error::StorageUnavailable(format!("{e:?}"))),
        }
    }
}

impl ThemeHost for BrowserThemeHost {
    fn load_preference(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| Error::StorageUnavailable(format!("{e:?}")))
    }

    fn save_preference(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| Error::StorageUnavailable(format!("{e:?}")))
    }

    fn prefers_dark(&self) -> Result<bool> {
        match_media(&self.window, consts::PREFERS_DARK_QUERY)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.root.set_attribute(name, value).map_err(dom)
    }

    fn add_root_class(&mut self, class: &str) -> Result<()> {
        self.root.class_list().add_1(class).map_err(dom)
    }

    fn remove_root_class(&mut self, class: &str) -> Result<()> {
        self.root.class_list().remove_1(class).map_err(dom)
    }
}

struct BrowserNavHost {
    window: Window,
    document: Document,
    overlay: Option<Element>,
    overlay_class: String,
    visible_class: String,
}

impl BrowserNavHost {
    fn overlay(&self) -> Option<Element> {
        self.overlay.clone()
    }
}

impl NavHost for BrowserNavHost {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        match_media(&self.window, consts::REDUCED_MOTION_QUERY)
    }

    fn insert_overlay(&mut self) -> Result<()> {
        let body = self
            .document
            .body()
            .ok_or_else(|| Error::MissingElement("body".to_owned()))?;
        let overlay = self.document.create_element("div").map_err(dom)?;
        overlay.set_class_name(&self.overlay_class);
        overlay.set_attribute("aria-hidden", "true").map_err(dom)?;
        body.append_child(&overlay).map_err(dom)?;
        self.overlay = Some(overlay);
        Ok(())
    }

    fn remove_overlay(&mut self) -> Result<()> {
        if let Some(overlay) = self.overlay.take() {
            overlay.remove();
        }
        Ok(())
    }

    fn set_overlay_visible(&mut self, visible: bool) -> Result<()> {
        let overlay = self
            .overlay
            .as_ref()
            .ok_or_else(|| Error::MissingElement(self.overlay_class.clone()))?;
        let classes = overlay.class_list();
        if visible {
            classes.add_1(&self.visible_class).map_err(dom)
        } else {
            classes.remove_1(&self.visible_class).map_err(dom)
        }
    }

    fn navigate(&mut self, url: &str) -> Result<()> {
        self.window
            .location()
            .assign(url)
            .map_err(|e| Error::Navigation { url: url.to_owned(), reason: format!("{e:?}") })
    }
}

// =============================================================
// Listeners
// =============================================================

/// A DOM listener that detaches itself when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, event: &'static str, handler: impl FnMut(Event) + 'static) -> Option<Self> {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if let Err(e) = target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
            log::warn!("E_DOM: could not listen for {event}: {e:?}");
            return None;
        }
        Some(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("E_DOM: could not detach {}: {e:?}", self.event);
        }
    }
}

/// Both participants of one exit race. Dropping it cancels whichever is left.
struct ExitArm {
    attempt: u64,
    _listener: Option<Listener>,
    _fallback: Timeout,
}

#[derive(Default)]
struct Timers {
    settle: Option<Timeout>,
    transition: Option<Timeout>,
    enter: Option<Timeout>,
}

impl Timers {
    fn clear(&mut self) {
        for slot in [&mut self.settle, &mut self.transition, &mut self.enter] {
            drop(slot.take());
        }
    }
}

// =============================================================
// Runtime
// =============================================================

struct Runtime {
    window: Window,
    toggle_id: String,
    opt_out_attribute: String,
    theme: RefCell<ThemeResolver<BrowserThemeHost>>,
    nav: RefCell<NavigationController<BrowserNavHost>>,
    timers: RefCell<Timers>,
    exit: RefCell<Option<ExitArm>>,
    frame: RefCell<Option<Closure<dyn FnMut(f64)>>>,
    listeners: RefCell<Vec<Listener>>,
}

impl Runtime {
    fn path(&self) -> String {
        match self.window.location().pathname() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("E_DOM: location.pathname unavailable: {e:?}");
                "/".to_owned()
            }
        }
    }

    fn href(&self) -> String {
        match self.window.location().href() {
            Ok(href) => href,
            Err(e) => {
                log::warn!("E_DOM: location.href unavailable: {e:?}");
                String::new()
            }
        }
    }

    fn listen(self: &Rc<Self>, target: &EventTarget, event: &'static str, handler: impl Fn(&Rc<Self>, &Event) + 'static) {
        let weak = Rc::downgrade(self);
        let listener = Listener::attach(target, event, move |e: Event| {
            if let Some(rt) = weak.upgrade() {
                handler(&rt, &e);
            }
        });
        if let Some(listener) = listener {
            self.listeners.borrow_mut().push(listener);
        }
    }

    // --- Startup ---

    fn install(self: &Rc<Self>, document: &Document) {
        let effects = self.theme.borrow_mut().start();
        self.run_theme(effects);

        self.listen(document, "transitionend", |rt, event| {
            if let Some(transition) = event.dyn_ref::<TransitionEvent>() {
                let effects = rt.theme.borrow_mut().on_transition_end(&transition.property_name());
                rt.run_theme(effects);
            }
        });
        self.listen(&self.window, "popstate", |rt, _| {
            let path = rt.path();
            let effects = rt.theme.borrow_mut().on_history_navigation(&path);
            rt.run_theme(effects);
        });
        self.listen(&self.window, "pageshow", |rt, event| {
            if event.dyn_ref::<PageTransitionEvent>().is_some_and(PageTransitionEvent::persisted) {
                rt.cache_restored();
            }
        });

        if ReadyState::parse(&document.ready_state()).is_parsed() {
            self.dom_ready();
        } else {
            self.listen(document, "DOMContentLoaded", |rt, _| rt.dom_ready());
        }
    }

    /// The tree is parsed: wire the toggle control and navigation.
    fn dom_ready(self: &Rc<Self>) {
        let Some(document) = self.window.document() else {
            return;
        };
        self.bind_toggle(&document);
        self.start_navigation(&document);
    }

    fn bind_toggle(self: &Rc<Self>, document: &Document) {
        let Some(toggle) = document.get_element_by_id(&self.toggle_id) else {
            log::debug!("theme: no #{} control", self.toggle_id);
            return;
        };
        if let Some(mode) = self.theme.borrow().mode() {
            set_pressed(&toggle, mode.is_dark());
        }
        let pressed = toggle.clone();
        self.theme.borrow_mut().subscribe(move |change| {
            set_pressed(&pressed, change.current.is_dark());
        });
        self.listen(&toggle, "click", |rt, _| {
            let effects = rt.theme.borrow_mut().toggle();
            rt.run_theme(effects);
        });
    }

    fn start_navigation(self: &Rc<Self>, document: &Document) {
        let status = self.nav.borrow_mut().start();
        if status != ControllerStatus::Active {
            return;
        }
        self.listen(document, "click", |rt, event| rt.handle_click(event));
        if ReadyState::parse(&document.ready_state()).is_complete() {
            self.load_complete();
        } else {
            self.listen(&self.window, "load", |rt, _| rt.load_complete());
        }
    }

    // --- Event handlers ---

    fn load_complete(self: &Rc<Self>) {
        let effects = self.nav.borrow_mut().on_load_complete();
        self.run_nav(effects);
    }

    fn cache_restored(self: &Rc<Self>) {
        let path = self.path();
        let theme_effects = self.theme.borrow_mut().on_cache_restore(&path);
        self.run_theme(theme_effects);
        let nav_effects = self.nav.borrow_mut().on_cache_restore();
        self.run_nav(nav_effects);
    }

    fn handle_click(self: &Rc<Self>, event: &Event) {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let click = Click {
            anchor: closest_anchor(event, &self.opt_out_attribute),
            button: Button::from_code(mouse.button()),
            modifiers: Modifiers {
                shift: mouse.shift_key(),
                ctrl: mouse.ctrl_key(),
                alt: mouse.alt_key(),
                meta: mouse.meta_key(),
            },
            default_prevented: event.default_prevented(),
            current_url: self.href(),
        };
        let decision = self.nav.borrow_mut().on_click(&click);
        if let ClickDecision::Intercept(effects) = decision {
            event.prevent_default();
            self.run_nav(effects);
        }
    }

    // --- Effects ---

    fn run_theme(self: &Rc<Self>, effects: Vec<ThemeEffect>) {
        for effect in effects {
            match effect {
                ThemeEffect::Settle { delay_ms } => {
                    let weak = Rc::downgrade(self);
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(rt) = weak.upgrade() {
                            let path = rt.path();
                            let effects = rt.theme.borrow_mut().on_settled(&path);
                            rt.run_theme(effects);
                        }
                    });
                    self.timers.borrow_mut().settle = Some(timeout);
                }
                ThemeEffect::ArmTransitionTimeout { generation, delay_ms } => {
                    let weak = Rc::downgrade(self);
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(rt) = weak.upgrade() {
                            rt.theme.borrow_mut().on_transition_timeout(generation);
                        }
                    });
                    self.timers.borrow_mut().transition = Some(timeout);
                }
                ThemeEffect::DisarmTransitionTimeout => {
                    self.timers.borrow_mut().transition = None;
                }
            }
        }
    }

    fn run_nav(self: &Rc<Self>, effects: Vec<NavEffect>) {
        for effect in effects {
            match effect {
                NavEffect::ArmExit { attempt, fallback_ms } => self.arm_exit(attempt, fallback_ms),
                NavEffect::DisarmExit { attempt } => {
                    let arm = self.exit.borrow_mut().take_if(|arm| arm.attempt == attempt);
                    drop(arm);
                }
                NavEffect::RequestFrame => self.request_frame(),
                NavEffect::ScheduleEnter { delay_ms } => {
                    let weak = Rc::downgrade(self);
                    let timeout = Timeout::new(delay_ms, move || {
                        if let Some(rt) = weak.upgrade() {
                            let effects = rt.nav.borrow_mut().play_enter();
                            rt.run_nav(effects);
                        }
                    });
                    self.timers.borrow_mut().enter = Some(timeout);
                }
            }
        }
    }

    fn arm_exit(self: &Rc<Self>, attempt: u64, fallback_ms: u32) {
        let overlay = self.nav.borrow().host().overlay();
        let listener = overlay.and_then(|overlay| {
            let weak = Rc::downgrade(self);
            Listener::attach(&overlay, "transitionend", move |event: Event| {
                if event.target() != event.current_target() {
                    return;
                }
                let Some(transition) = event.dyn_ref::<TransitionEvent>() else {
                    return;
                };
                if let Some(rt) = weak.upgrade() {
                    let effects = rt
                        .nav
                        .borrow_mut()
                        .on_exit_transition_end(attempt, &transition.property_name());
                    rt.run_nav(effects);
                }
            })
        });

        let weak = Rc::downgrade(self);
        let fallback = Timeout::new(fallback_ms, move || {
            if let Some(rt) = weak.upgrade() {
                let effects = rt.nav.borrow_mut().on_exit_fallback(attempt);
                rt.run_nav(effects);
            }
        });

        let previous = self
            .exit
            .borrow_mut()
            .replace(ExitArm { attempt, _listener: listener, _fallback: fallback });
        drop(previous);
    }

    fn request_frame(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        let cb = Closure::wrap(Box::new(move |_ts: f64| {
            if let Some(rt) = weak.upgrade() {
                rt.frame.borrow_mut().take();
                rt.nav.borrow_mut().on_frame();
            }
        }) as Box<dyn FnMut(f64)>);

        match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(_) => *self.frame.borrow_mut() = Some(cb),
            Err(e) => {
                log::warn!("E_DOM: requestAnimationFrame failed: {e:?}; hiding overlay now");
                self.nav.borrow_mut().on_frame();
            }
        }
    }

    fn teardown(self: &Rc<Self>) {
        self.listeners.borrow_mut().clear();
        let theme_effects = self.theme.borrow_mut().teardown();
        self.run_theme(theme_effects);
        let nav_effects = self.nav.borrow_mut().teardown();
        self.run_nav(nav_effects);
        self.timers.borrow_mut().clear();
        self.exit.borrow_mut().take();
        self.frame.borrow_mut().take();
    }
}

fn set_pressed(toggle: &Element, dark: bool) {
    let value = if dark { "true" } else { "false" };
    if let Err(e) = toggle.set_attribute("aria-pressed", value) {
        log::debug!("E_DOM: aria-pressed not updated: {e:?}");
    }
}

fn closest_anchor(event: &Event, opt_out_attribute: &str) -> Option<Anchor> {
    let target = event.target()?;
    let element = target.dyn_ref::<Element>()?;
    let anchor = match element.closest("a[href]") {
        Ok(found) => found?,
        Err(e) => {
            log::debug!("E_DOM: closest(a) failed: {e:?}");
            return None;
        }
    };
    let href = match anchor.dyn_ref::<HtmlAnchorElement>() {
        Some(html) => html.href(),
        None => anchor.get_attribute("href")?,
    };
    Some(Anchor {
        href,
        target: anchor.get_attribute("target"),
        download: anchor.has_attribute("download"),
        transition: anchor.get_attribute(opt_out_attribute),
    })
}

// =============================================================
// Entry point
// =============================================================

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&format!("{}: {e}", e.code()))
}

fn init_logging(config: &Config) {
    console_error_panic_hook::set_once();
    let Some(level) = config.level_filter().to_level() else {
        return;
    };
    if console_log::init_with_level(level).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Handle returned to the page; keeps the controllers alive.
#[wasm_bindgen]
pub struct PageFx {
    runtime: Option<Rc<Runtime>>,
}

#[wasm_bindgen]
impl PageFx {
    /// Detach every listener, cancel pending timers and remove the overlay.
    pub fn teardown(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.teardown();
        }
    }

    /// The active mode, `"light"` or `"dark"`.
    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> Option<String> {
        let runtime = self.runtime.as_ref()?;
        runtime.theme.borrow().mode().map(|mode| mode.as_str().to_owned())
    }
}

/// Start both controllers. `config` is an optional JSON object overriding
/// any subset of [`Config`].
///
/// # Errors
///
/// Fails on invalid configuration or when there is no `window`/`document`.
#[wasm_bindgen]
pub fn start(config: Option<String>) -> std::result::Result<PageFx, JsValue> {
    let config = match config {
        Some(raw) => Config::from_json(&raw).map_err(to_js)?,
        None => Config::default(),
    };
    init_logging(&config);

    let window = web_sys::window().ok_or_else(|| to_js(Error::MissingElement("window".to_owned())))?;
    let document = window
        .document()
        .ok_or_else(|| to_js(Error::MissingElement("document".to_owned())))?;
    let root = document
        .document_element()
        .ok_or_else(|| to_js(Error::MissingElement("html".to_owned())))?;

    let theme_host = BrowserThemeHost { window: window.clone(), root };
    let nav_host = BrowserNavHost {
        window: window.clone(),
        document: document.clone(),
        overlay: None,
        overlay_class: config.navigation.overlay_class.clone(),
        visible_class: config.navigation.visible_class.clone(),
    };
    let runtime = Rc::new(Runtime {
        window,
        toggle_id: config.theme.toggle_id.clone(),
        opt_out_attribute: config.navigation.opt_out_attribute.clone(),
        theme: RefCell::new(ThemeResolver::new(theme_host, config.theme.clone())),
        nav: RefCell::new(NavigationController::new(nav_host, config.navigation.clone())),
        timers: RefCell::new(Timers::default()),
        exit: RefCell::new(None),
        frame: RefCell::new(None),
        listeners: RefCell::new(Vec::new()),
    });
    runtime.install(&document);
    log::info!("pagefx started");
    Ok(PageFx { runtime: Some(runtime) })
}
