//! imbridge-core
//!
//! Session bridge between a desktop input framework and a Chinese input
//! engine session: key normalization, toggle state, candidate window,
//! preedit decoration and hotkey configuration.
//!
//! The engine (decoding, candidate generation, history learning) and the
//! host UI are both reached through traits, so either side can be swapped
//! or mocked.
//!
//! Public API:
//! - `SessionBridge` - Owns one engine session and routes host events to it
//! - `translate_key` / `KeyEvent` - Host key to engine key normalization
//! - `ToggleState` - Chinese/English, letter width and punctuation width
//! - `LookupPager` - Visible candidate window with cursor motion
//! - `PreeditText` - Preedit decorated into colored spans
//! - `HotkeyProfileBuilder` - Hotkey profile derived from configuration
//! - `BridgeConfig` - Configuration snapshot (TOML)

pub mod key;
pub use key::{keysym, translate_key, KeyEvent, Modifiers};

pub mod toggle;
pub use toggle::{ToggleGroup, ToggleState};

pub mod candidate;
pub use candidate::{LookupPager, LookupTable};

pub mod composition;
pub use composition::{decorate, CharType, Preedit, PreeditSpan, PreeditText, SpanClass};

pub mod hotkey;
pub use hotkey::{BindingPolicy, HotkeyProfile, HotkeyProfileBuilder, KeyBinding};

pub mod engine;
pub use engine::{
    EngineSession, HistoryContext, RedrawMask, SessionFactory, SessionHandle, StatusFlag,
    WindowHandler,
};

pub mod host;
pub use host::{Host, Property, PropertyKind, SetupLauncher};

pub mod bridge;
pub use bridge::{BridgeState, SessionBridge};

pub mod config;
pub use config::{
    BridgeConfig, KeyboardConfig, PinyinConfig, PinyinScheme, ShuangpinLayout, ViewConfig,
};

pub mod error;
pub use error::BridgeError;
