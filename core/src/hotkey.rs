//! Hotkey profile handed to the engine session.
//!
//! The profile lists the keys that switch input mode and the keys that page
//! through candidates. It is derived from the keyboard section of the
//! configuration and rebuilt on every configuration change.

use ahash::AHashSet;

use crate::config::KeyboardConfig;
use crate::key::{keysym, KeyEvent, Modifiers};

/// A key binding.
///
/// Bindings with a non-zero `value` match printable keys by character,
/// bindings with `value == 0` match by key code. Modifiers must match
/// exactly in both cases.
pub type KeyBinding = KeyEvent;

fn binding_matches(binding: &KeyBinding, key: &KeyEvent) -> bool {
    if binding.modifiers != key.modifiers {
        return false;
    }
    if binding.value != 0 {
        binding.value == key.value
    } else {
        key.value == 0 && binding.code == key.code
    }
}

/// Key bindings for mode switching and paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HotkeyProfile {
    mode_switch_keys: AHashSet<KeyBinding>,
    page_up_keys: AHashSet<KeyBinding>,
    page_down_keys: AHashSet<KeyBinding>,
}

impl HotkeyProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_mode_switch_key(&mut self, key: KeyBinding) {
        self.mode_switch_keys.insert(key);
    }

    pub fn add_page_up_key(&mut self, key: KeyBinding) {
        self.page_up_keys.insert(key);
    }

    pub fn add_page_down_key(&mut self, key: KeyBinding) {
        self.page_down_keys.insert(key);
    }

    pub fn remove_mode_switch_key(&mut self, key: &KeyBinding) -> bool {
        self.mode_switch_keys.remove(key)
    }

    pub fn remove_page_up_key(&mut self, key: &KeyBinding) -> bool {
        self.page_up_keys.remove(key)
    }

    pub fn remove_page_down_key(&mut self, key: &KeyBinding) -> bool {
        self.page_down_keys.remove(key)
    }

    pub fn is_mode_switch_key(&self, key: &KeyEvent) -> bool {
        self.mode_switch_keys.iter().any(|b| binding_matches(b, key))
    }

    pub fn is_page_up_key(&self, key: &KeyEvent) -> bool {
        self.page_up_keys.iter().any(|b| binding_matches(b, key))
    }

    pub fn is_page_down_key(&self, key: &KeyEvent) -> bool {
        self.page_down_keys.iter().any(|b| binding_matches(b, key))
    }

    pub fn mode_switch_keys(&self) -> impl Iterator<Item = &KeyBinding> {
        self.mode_switch_keys.iter()
    }

    pub fn page_up_keys(&self) -> impl Iterator<Item = &KeyBinding> {
        self.page_up_keys.iter()
    }

    pub fn page_down_keys(&self) -> impl Iterator<Item = &KeyBinding> {
        self.page_down_keys.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.mode_switch_keys.is_empty()
            && self.page_up_keys.is_empty()
            && self.page_down_keys.is_empty()
    }
}

/// Release of Shift toggles input mode.
pub const SHIFT_MODE_SWITCH: KeyBinding =
    KeyEvent::from_code(keysym::SHIFT_L, Modifiers::SHIFT.union(Modifiers::RELEASE));
/// Release of Control toggles input mode.
pub const CONTROL_MODE_SWITCH: KeyBinding =
    KeyEvent::from_code(keysym::CONTROL_L, Modifiers::CONTROL.union(Modifiers::RELEASE));

/// Page keys as (page up, page down) pairs.
pub const MINUS_EQUALS_PAGING: (KeyBinding, KeyBinding) = (
    KeyEvent::from_char('-', Modifiers::empty()),
    KeyEvent::from_char('=', Modifiers::empty()),
);
pub const COMMA_PERIOD_PAGING: (KeyBinding, KeyBinding) = (
    KeyEvent::from_char(',', Modifiers::empty()),
    KeyEvent::from_char('.', Modifiers::empty()),
);

/// What a rebuild does with bindings whose flag is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingPolicy {
    /// Keep bindings from earlier rebuilds; disabling a flag adds nothing
    /// and removes nothing.
    #[default]
    Accumulate,
    /// Remove the bindings of every disabled flag.
    Retract,
}

/// Derives a `HotkeyProfile` from the keyboard configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct HotkeyProfileBuilder;

impl HotkeyProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the profile for `config`, starting from `previous`.
    ///
    /// Under `BindingPolicy::Accumulate` every binding already in `previous`
    /// survives. Under `BindingPolicy::Retract` the bindings of disabled
    /// flags are removed.
    pub fn rebuild(&self, previous: &HotkeyProfile, config: &KeyboardConfig) -> HotkeyProfile {
        let policy = config.binding_policy();
        let mut profile = previous.clone();

        Self::apply_paging(&mut profile, config.page_minus_equals, MINUS_EQUALS_PAGING, policy);
        Self::apply_paging(&mut profile, config.page_comma_period, COMMA_PERIOD_PAGING, policy);
        Self::apply_mode_switch(&mut profile, config.mode_switch_shift, SHIFT_MODE_SWITCH, policy);
        Self::apply_mode_switch(
            &mut profile,
            config.mode_switch_control,
            CONTROL_MODE_SWITCH,
            policy,
        );

        tracing::debug!(
            mode_switch = profile.mode_switch_keys.len(),
            page_up = profile.page_up_keys.len(),
            page_down = profile.page_down_keys.len(),
            ?policy,
            "rebuilt hotkey profile"
        );
        profile
    }

    fn apply_paging(
        profile: &mut HotkeyProfile,
        enabled: bool,
        (up, down): (KeyBinding, KeyBinding),
        policy: BindingPolicy,
    ) {
        if enabled {
            profile.add_page_up_key(up);
            profile.add_page_down_key(down);
        } else if policy == BindingPolicy::Retract {
            profile.remove_page_up_key(&up);
            profile.remove_page_down_key(&down);
        }
    }

    fn apply_mode_switch(
        profile: &mut HotkeyProfile,
        enabled: bool,
        key: KeyBinding,
        policy: BindingPolicy,
    ) {
        if enabled {
            profile.add_mode_switch_key(key);
        } else if policy == BindingPolicy::Retract {
            profile.remove_mode_switch_key(&key);
        }
    }
}
