//! Session bridge between the host input framework and an engine session.
//!
//! The `SessionBridge` owns one engine session for its whole lifetime. Host
//! events (keys, focus changes, property activations, configuration
//! changes) are translated into session requests; the session answers
//! through `WindowHandler` callbacks, which the bridge turns into host UI
//! updates.
//!
//! Callbacks arrive synchronously while a request is still running. They are
//! delivered to a `BridgeWindow` that borrows only the host, the lookup pager
//! and the toggle state, so a callback never observes the session, the
//! hotkey profile or the configuration half-updated.
//!
//! ## State machine
//!
//! ```text
//! Uninitialized --(session created)--> Active <--focus--> Suspended
//!       |                                 |                  |
//!       +---------------------------------+------------------+--> Destroyed
//! ```
//!
//! A bridge whose session could not be created never leaves
//! `Uninitialized`; it reports `is_valid() == false` and ignores every event.

use std::rc::Rc;

use tracing::{debug, info, trace, warn};

use crate::candidate::LookupPager;
use crate::composition::{Preedit, PreeditText};
use crate::config::BridgeConfig;
use crate::engine::{
    EngineSession, RedrawMask, SessionFactory, SessionHandle, StatusFlag, WindowHandler,
};
use crate::error::BridgeError;
use crate::host::{Host, Property, SetupLauncher};
use crate::hotkey::{HotkeyProfile, HotkeyProfileBuilder};
use crate::key::translate_key;
use crate::toggle::{ToggleGroup, ToggleState};

/// Lifecycle state of a bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    /// No session; only reachable when session creation failed
    Uninitialized,
    /// Session live and focused
    Active,
    /// Session live, host focus elsewhere
    Suspended,
    /// Session released to its factory
    Destroyed,
}

/// Receives engine callbacks and forwards them to the host.
struct BridgeWindow<'a, H: Host> {
    host: &'a mut H,
    pager: &'a mut LookupPager,
    toggles: &'a mut ToggleState,
}

impl<H: Host> WindowHandler for BridgeWindow<'_, H> {
    fn commit(&mut self, text: &str) {
        trace!(text, "commit");
        self.host.commit_text(text);
    }

    fn update_preedit(&mut self, preedit: &Preedit) {
        match PreeditText::from_preedit(preedit) {
            Some(text) => {
                trace!(text = %text.text, caret = text.caret, "update preedit");
                self.host.update_preedit_text(&text);
            }
            None => self.host.hide_preedit_text(),
        }
    }

    fn update_candidates(&mut self, candidates: &[String]) {
        if self.pager.set_items(candidates.iter().cloned()) > 0 {
            trace!(count = self.pager.len(), "update lookup table");
            self.host.update_lookup_table(&self.pager.table(), true);
        } else {
            self.host.hide_lookup_table();
        }
    }

    fn update_status(&mut self, flag: StatusFlag, value: bool) {
        let group = ToggleGroup::from_status_flag(flag);
        trace!(?group, value, "engine status changed");
        self.toggles.set(group, value);
        self.host.update_property(&self.toggles.property(group));
    }
}

/// Adapter between host events and one engine session.
pub struct SessionBridge<F: SessionFactory, H: Host> {
    handle: Option<SessionHandle<F>>,
    state: BridgeState,
    init_error: Option<BridgeError>,

    host: H,
    toggles: ToggleState,
    pager: LookupPager,
    setup: SetupLauncher,

    hotkeys: HotkeyProfile,
    hotkey_builder: HotkeyProfileBuilder,
    config: BridgeConfig,
}

impl<F: SessionFactory, H: Host> SessionBridge<F, H> {
    /// Create a bridge and its engine session.
    ///
    /// Scheme and window size are pushed to the factory before the session
    /// is created. If creation fails the bridge is returned anyway, invalid
    /// for its whole lifetime; check `is_valid()` before use.
    pub fn new(factory: Rc<F>, host: H, config: BridgeConfig) -> Self {
        factory.set_pinyin_scheme(config.pinyin.scheme, config.pinyin.shuangpin_layout);
        factory.set_candidate_window_size(config.view.window_size());

        let mut bridge = Self {
            handle: None,
            state: BridgeState::Uninitialized,
            init_error: None,
            host,
            toggles: ToggleState::new(),
            pager: LookupPager::with_page_size(config.view.window_size()),
            setup: SetupLauncher::new(),
            hotkeys: HotkeyProfile::new(),
            hotkey_builder: HotkeyProfileBuilder::new(),
            config,
        };

        match SessionHandle::acquire(factory) {
            Ok(handle) => {
                bridge.handle = Some(handle);
                bridge.state = BridgeState::Active;
                bridge.sync_toggles_from_session();
                bridge.update_history_power();
                bridge.update_hotkey_profile();
                info!("session bridge active");
            }
            Err(err) => {
                warn!(%err, "session bridge disabled");
                bridge.init_error = Some(err);
            }
        }
        bridge
    }

    /// False if the session could not be created or was destroyed.
    pub fn is_valid(&self) -> bool {
        self.live_session().is_some()
    }

    pub fn initialization_error(&self) -> Option<&BridgeError> {
        self.init_error.as_ref()
    }

    /// Explain why the bridge cannot serve events, if it cannot.
    pub fn ensure_valid(&self) -> Result<(), BridgeError> {
        if self.state == BridgeState::Destroyed {
            return Err(BridgeError::Destroyed);
        }
        if self.live_session().is_none() {
            return Err(self
                .init_error
                .clone()
                .unwrap_or(BridgeError::SessionUnavailable));
        }
        Ok(())
    }

    pub fn state(&self) -> BridgeState {
        self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn toggles(&self) -> &ToggleState {
        &self.toggles
    }

    pub fn pager(&self) -> &LookupPager {
        &self.pager
    }

    pub fn hotkey_profile(&self) -> &HotkeyProfile {
        &self.hotkeys
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// The session, if one is live.
    pub fn session(&self) -> Option<&F::Session> {
        self.live_session()
    }

    fn live_session(&self) -> Option<&F::Session> {
        self.handle.as_ref().and_then(SessionHandle::session)
    }

    /// Run `f` against the session with a window wired to the host.
    fn with_session<R>(
        &mut self,
        f: impl FnOnce(&mut F::Session, &mut dyn WindowHandler) -> R,
    ) -> Option<R> {
        let session = self.handle.as_mut().and_then(SessionHandle::session_mut)?;
        let mut win = BridgeWindow {
            host: &mut self.host,
            pager: &mut self.pager,
            toggles: &mut self.toggles,
        };
        Some(f(session, &mut win))
    }

    /// Property panel in registration order.
    pub fn properties(&self) -> Vec<Property> {
        let mut props: Vec<Property> = ToggleGroup::ALL
            .iter()
            .map(|&group| self.toggles.property(group))
            .collect();
        props.push(self.setup.property().clone());
        props
    }

    fn sync_toggles_from_session(&mut self) {
        let Some(session) = self.handle.as_ref().and_then(SessionHandle::session) else {
            return;
        };
        for group in ToggleGroup::ALL {
            self.toggles.set(group, session.status_flag(group.status_flag()));
        }
    }

    // ========== Host events ==========

    /// Handle a key from the host. Returns whether the key was consumed.
    ///
    /// With Chinese mode off only mode-switch keys reach the session; every
    /// other key is left to the host.
    pub fn process_key_event(&mut self, key_val: u32, key_code: u32, modifiers: u32) -> bool {
        debug!(
            "process_key_event: key_val = {:#x}, key_code = {:#x}, modifiers = {:#x}",
            key_val, key_code, modifiers
        );
        let key = translate_key(key_val, key_code, modifiers);

        let Some(session) = self.handle.as_mut().and_then(SessionHandle::session_mut) else {
            return false;
        };
        if !session.status_flag(StatusFlag::Chinese) && !self.hotkeys.is_mode_switch_key(&key) {
            return false;
        }
        let mut win = BridgeWindow {
            host: &mut self.host,
            pager: &mut self.pager,
            toggles: &mut self.toggles,
        };
        session.on_key_event(&key, &mut win)
    }

    /// Host focus entered: register properties and redraw everything.
    pub fn focus_in(&mut self) {
        if !self.is_valid() {
            return;
        }
        let props = self.properties();
        self.host.register_properties(&props);
        self.with_session(|session, win| session.redraw(RedrawMask::all(), win));
        self.transition(BridgeState::Active);
    }

    /// Host focus left: drop in-flight preedit and candidates.
    pub fn focus_out(&mut self) {
        if !self.is_valid() {
            return;
        }
        self.reset();
        self.transition(BridgeState::Suspended);
    }

    /// Clear preedit and candidates in the session and hide what it cleared.
    pub fn reset(&mut self) {
        let Some(mask) = self.with_session(|session, _| session.clear_preedit_and_candidates())
        else {
            return;
        };
        debug!(?mask, "reset");
        if mask.contains(RedrawMask::PREEDIT) {
            self.host.hide_preedit_text();
        }
        if mask.contains(RedrawMask::CANDIDATE) {
            self.pager.clear();
            self.host.hide_lookup_table();
        }
    }

    pub fn enable(&mut self) {
        self.focus_in();
    }

    /// Does nothing; kept so hosts can call `enable` and `disable` as a pair.
    pub fn disable(&mut self) {}

    pub fn page_up(&mut self) {
        self.with_session(|session, win| session.on_candidate_page_request(-1, true, win));
    }

    pub fn page_down(&mut self) {
        self.with_session(|session, win| session.on_candidate_page_request(1, true, win));
    }

    /// Forward a candidate click. The session checks the index.
    pub fn candidate_clicked(&mut self, index: usize) {
        self.with_session(|session, win| session.on_candidate_select_request(index, win));
    }

    /// Move the lookup cursor up within the window. Returns whether it moved.
    pub fn cursor_up(&mut self) -> bool {
        if !self.is_valid() || !self.pager.cursor_up() {
            return false;
        }
        self.host.update_lookup_table(&self.pager.table(), true);
        true
    }

    /// Move the lookup cursor down within the window. Returns whether it moved.
    pub fn cursor_down(&mut self) -> bool {
        if !self.is_valid() || !self.pager.cursor_down() {
            return false;
        }
        self.host.update_lookup_table(&self.pager.table(), true);
        true
    }

    /// Handle a property activation from the host's panel.
    ///
    /// A toggle property flips its group, pushes the new value to the
    /// session and refreshes the property. Any other property is offered to
    /// the setup launcher.
    pub fn property_activate(&mut self, name: &str, _state: u32) {
        if !self.is_valid() {
            return;
        }
        match self.toggles.activate_property(name) {
            Some((group, state)) => {
                debug!(?group, state, "toggle activated");
                self.with_session(|session, _| session.set_status_flag(group.status_flag(), state));
                self.host.update_property(&self.toggles.property(group));
            }
            None => {
                if !self.setup.launch(name, &mut self.host) {
                    warn!(property = name, "unrecognized property");
                }
            }
        }
    }

    /// Apply a new configuration snapshot.
    ///
    /// Runs in order: history weighting, pinyin scheme, window size, then
    /// the hotkey profile rebuild.
    pub fn on_config_changed(&mut self, config: BridgeConfig) {
        if !self.is_valid() {
            return;
        }
        self.config = config;
        self.update_history_power();
        self.update_pinyin_scheme();
        self.update_candidate_window_size();
        self.update_hotkey_profile();
    }

    /// Release the session to its factory. Safe to call repeatedly; returns
    /// true only on the call that released it.
    pub fn destroy(&mut self) -> bool {
        if self.state == BridgeState::Destroyed {
            return false;
        }
        let released = self.handle.as_mut().is_some_and(SessionHandle::release);
        self.transition(BridgeState::Destroyed);
        released
    }

    fn transition(&mut self, next: BridgeState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "bridge state");
            self.state = next;
        }
    }

    // ========== Configuration updates ==========

    fn update_history_power(&mut self) {
        let power = self.config.pinyin.memory_power;
        self.with_session(|session, _| session.context().set_history_power(power));
        debug!(power, "history power updated");
    }

    fn update_pinyin_scheme(&mut self) {
        let pinyin = &self.config.pinyin;
        if let Some(handle) = &self.handle {
            handle
                .factory()
                .set_pinyin_scheme(pinyin.scheme, pinyin.shuangpin_layout);
        }
        debug!(scheme = ?pinyin.scheme, "pinyin scheme updated");
    }

    /// The live session keeps the window it was created with, so the pager
    /// keeps that limit too; only sessions created later see the new size.
    fn update_candidate_window_size(&mut self) {
        let size = self.config.view.window_size();
        if let Some(handle) = &self.handle {
            handle.factory().set_candidate_window_size(size);
        }
        debug!(size, live = self.pager.page_size(), "candidate window size updated");
    }

    fn update_hotkey_profile(&mut self) {
        self.hotkeys = self
            .hotkey_builder
            .rebuild(&self.hotkeys, &self.config.keyboard);
        let hotkeys = &self.hotkeys;
        if let Some(session) = self.handle.as_mut().and_then(SessionHandle::session_mut) {
            session.set_hotkey_profile(hotkeys);
        }
    }
}
