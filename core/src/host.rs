//! Host UI interface.
//!
//! The host is the desktop input framework: it owns the preedit area, the
//! lookup table window and the property panel. The bridge pushes every
//! visible change through the `Host` trait; the host never pulls.

use crate::candidate::LookupTable;
use crate::composition::PreeditText;

/// Kind of an entry in the host's property panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Two-state property backed by a toggle group
    Toggle { state: bool },
    /// Plain action, e.g. opening the setup dialog
    Normal,
}

/// An entry in the host's property panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Name the host sends back on activation
    pub key: String,
    pub label: String,
    pub tooltip: String,
    pub kind: PropertyKind,
}

/// Calls the bridge makes into the host UI.
pub trait Host {
    /// Insert finished text into the focused application.
    fn commit_text(&mut self, text: &str);

    fn update_preedit_text(&mut self, preedit: &PreeditText);

    fn hide_preedit_text(&mut self);

    fn update_lookup_table(&mut self, table: &LookupTable<'_>, visible: bool);

    fn hide_lookup_table(&mut self);

    /// Replace the property panel.
    fn register_properties(&mut self, properties: &[Property]);

    /// Refresh one property already registered.
    fn update_property(&mut self, property: &Property);

    /// Open the external configuration surface.
    fn launch_setup(&mut self);
}

/// Non-toggle property that opens the setup dialog when activated.
#[derive(Debug, Clone)]
pub struct SetupLauncher {
    property: Property,
}

impl SetupLauncher {
    pub const PROPERTY_NAME: &'static str = "setup";

    pub fn new() -> Self {
        Self {
            property: Property {
                key: Self::PROPERTY_NAME.to_string(),
                label: "设置".to_string(),
                tooltip: "Open preferences".to_string(),
                kind: PropertyKind::Normal,
            },
        }
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    /// Launch the setup surface if `name` is the setup property.
    /// Returns false for any other name.
    pub fn launch<H: Host + ?Sized>(&self, name: &str, host: &mut H) -> bool {
        if name != self.property.key {
            return false;
        }
        host.launch_setup();
        true
    }
}

impl Default for SetupLauncher {
    fn default() -> Self {
        Self::new()
    }
}
