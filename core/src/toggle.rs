//! Toggle groups shared between host properties and engine status flags.
//!
//! Each group is an independent boolean. A group is reached from the host
//! through its property name and from the engine through its status flag;
//! both mappings are fixed.

use crate::engine::StatusFlag;
use crate::host::{Property, PropertyKind};

/// The three toggle groups exposed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleGroup {
    /// Chinese / English input mode
    Mode,
    /// Full-width / half-width letters
    LetterWidth,
    /// Full-width / half-width punctuation
    PunctWidth,
}

impl ToggleGroup {
    pub const ALL: [ToggleGroup; 3] = [
        ToggleGroup::Mode,
        ToggleGroup::LetterWidth,
        ToggleGroup::PunctWidth,
    ];

    /// Resolve a host property name to the group that owns it.
    pub fn from_property(name: &str) -> Option<Self> {
        match name {
            "status" => Some(Self::Mode),
            "full_letter" => Some(Self::LetterWidth),
            "full_punct" => Some(Self::PunctWidth),
            _ => None,
        }
    }

    /// Host property name for this group.
    pub fn property_name(self) -> &'static str {
        match self {
            Self::Mode => "status",
            Self::LetterWidth => "full_letter",
            Self::PunctWidth => "full_punct",
        }
    }

    /// Engine status flag mirrored by this group.
    pub fn status_flag(self) -> StatusFlag {
        match self {
            Self::Mode => StatusFlag::Chinese,
            Self::LetterWidth => StatusFlag::FullSymbol,
            Self::PunctWidth => StatusFlag::FullPunct,
        }
    }

    pub fn from_status_flag(flag: StatusFlag) -> Self {
        match flag {
            StatusFlag::Chinese => Self::Mode,
            StatusFlag::FullSymbol => Self::LetterWidth,
            StatusFlag::FullPunct => Self::PunctWidth,
        }
    }

    /// Labels shown for the (on, off) states.
    fn labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Mode => ("中", "英"),
            Self::LetterWidth => ("Ａ", "A"),
            Self::PunctWidth => ("，。", ",."),
        }
    }

    fn tooltip(self) -> &'static str {
        match self {
            Self::Mode => "Switch Chinese/English input",
            Self::LetterWidth => "Switch full/half width letters",
            Self::PunctWidth => "Switch full/half width punctuation",
        }
    }
}

/// Current value of the three groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    mode: bool,
    letter_width: bool,
    punct_width: bool,
}

impl ToggleState {
    pub fn new() -> Self {
        Self {
            mode: true,
            letter_width: false,
            punct_width: true,
        }
    }

    fn slot(&mut self, group: ToggleGroup) -> &mut bool {
        match group {
            ToggleGroup::Mode => &mut self.mode,
            ToggleGroup::LetterWidth => &mut self.letter_width,
            ToggleGroup::PunctWidth => &mut self.punct_width,
        }
    }

    pub fn get(&self, group: ToggleGroup) -> bool {
        match group {
            ToggleGroup::Mode => self.mode,
            ToggleGroup::LetterWidth => self.letter_width,
            ToggleGroup::PunctWidth => self.punct_width,
        }
    }

    /// Overwrite a group's value. Returns true if it changed.
    pub fn set(&mut self, group: ToggleGroup, state: bool) -> bool {
        let slot = self.slot(group);
        let changed = *slot != state;
        *slot = state;
        changed
    }

    /// Flip the group owning `property`.
    ///
    /// Returns `None` without touching any group when no group owns the
    /// property; the caller then falls back to its non-toggle handling.
    pub fn activate_property(&mut self, property: &str) -> Option<(ToggleGroup, bool)> {
        let group = ToggleGroup::from_property(property)?;
        let slot = self.slot(group);
        *slot = !*slot;
        Some((group, *slot))
    }

    /// Host-facing description of a group in its current state.
    pub fn property(&self, group: ToggleGroup) -> Property {
        let state = self.get(group);
        let (on, off) = group.labels();
        Property {
            key: group.property_name().to_string(),
            label: if state { on } else { off }.to_string(),
            tooltip: group.tooltip().to_string(),
            kind: PropertyKind::Toggle { state },
        }
    }
}

impl Default for ToggleState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_property_flips_one_group() {
        let mut toggles = ToggleState::new();
        let before = toggles;

        let (group, state) = toggles.activate_property("full_letter").unwrap();
        assert_eq!(group, ToggleGroup::LetterWidth);
        assert_eq!(state, !before.get(ToggleGroup::LetterWidth));
        assert_eq!(toggles.get(ToggleGroup::Mode), before.get(ToggleGroup::Mode));
        assert_eq!(
            toggles.get(ToggleGroup::PunctWidth),
            before.get(ToggleGroup::PunctWidth)
        );
    }

    #[test]
    fn test_unknown_property_is_not_a_toggle() {
        let mut toggles = ToggleState::new();
        let before = toggles;
        assert_eq!(toggles.activate_property("setup"), None);
        assert_eq!(toggles, before);
    }

    #[test]
    fn test_group_mappings_round_trip() {
        for group in ToggleGroup::ALL {
            assert_eq!(ToggleGroup::from_property(group.property_name()), Some(group));
            assert_eq!(ToggleGroup::from_status_flag(group.status_flag()), group);
        }
    }

    #[test]
    fn test_property_label_follows_state() {
        let mut toggles = ToggleState::new();
        toggles.set(ToggleGroup::Mode, true);
        assert_eq!(toggles.property(ToggleGroup::Mode).label, "中");
        toggles.set(ToggleGroup::Mode, false);
        let prop = toggles.property(ToggleGroup::Mode);
        assert_eq!(prop.label, "英");
        assert_eq!(prop.kind, PropertyKind::Toggle { state: false });
    }

    #[test]
    fn test_set_reports_change() {
        let mut toggles = ToggleState::new();
        assert!(!toggles.set(ToggleGroup::Mode, true));
        assert!(toggles.set(ToggleGroup::Mode, false));
    }

    proptest! {
        #[test]
        fn toggling_twice_restores_state(idx in 0usize..3) {
            let name = ToggleGroup::ALL[idx].property_name();
            let mut toggles = ToggleState::new();
            let before = toggles;
            toggles.activate_property(name);
            prop_assert_ne!(toggles, before);
            toggles.activate_property(name);
            prop_assert_eq!(toggles, before);
        }

        #[test]
        fn unknown_names_never_mutate(name in "[a-z_]{0,12}") {
            prop_assume!(ToggleGroup::from_property(&name).is_none());
            let mut toggles = ToggleState::new();
            let before = toggles;
            prop_assert!(toggles.activate_property(&name).is_none());
            prop_assert_eq!(toggles, before);
        }
    }
}
