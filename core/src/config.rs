//! Bridge configuration.
//!
//! The configuration is read-only from the bridge's point of view: the host
//! owns storage and hands a fresh snapshot to the bridge on every change.
//! Every section and key is optional in TOML and falls back to its default.
//!
//! # Example
//!
//! ```rust
//! use imbridge_core::BridgeConfig;
//!
//! let config = BridgeConfig::from_toml_str(
//!     r#"
//!     [view]
//!     candidate_window_size = 7
//!
//!     [keyboard]
//!     page_comma_period = true
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.view.candidate_window_size, 7);
//! assert_eq!(config.pinyin.memory_power, 3);
//! ```

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;
use crate::hotkey::BindingPolicy;

/// Phonetic scheme used by the engine to decode key sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PinyinScheme {
    /// Full pinyin (全拼)
    #[default]
    Quanpin,
    /// Double pinyin (双拼)
    Shuangpin,
}

/// Key layout for double pinyin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShuangpinLayout {
    /// Microsoft Shuangpin (微软双拼)
    #[default]
    Ms2003,
    /// ABC input method layout
    Abc,
    /// ZiRanMa (自然码)
    Ziranma,
    /// PinYin++ (拼音加加)
    #[serde(rename = "pinyin++")]
    PinyinPlusPlus,
    /// ZiGuang (紫光)
    Ziguang,
    /// XiaoHe (小鹤)
    Xiaohe,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PinyinConfig {
    pub scheme: PinyinScheme,
    /// Only consulted when `scheme` is shuangpin
    pub shuangpin_layout: ShuangpinLayout,
    /// How strongly the engine weights the user's input history
    pub memory_power: u32,
}

impl Default for PinyinConfig {
    fn default() -> Self {
        Self {
            scheme: PinyinScheme::Quanpin,
            shuangpin_layout: ShuangpinLayout::Ms2003,
            memory_power: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Candidates shown per lookup window
    pub candidate_window_size: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            candidate_window_size: 10,
        }
    }
}

impl ViewConfig {
    /// Window size with zero clamped to one.
    pub fn window_size(&self) -> usize {
        self.candidate_window_size.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Releasing Shift toggles Chinese/English
    pub mode_switch_shift: bool,
    /// Releasing Control toggles Chinese/English
    pub mode_switch_control: bool,
    /// `-` / `=` page the candidate window
    pub page_minus_equals: bool,
    /// `,` / `.` page the candidate window
    pub page_comma_period: bool,
    /// Drop bindings of disabled flags on rebuild instead of keeping them
    pub retract_disabled_bindings: bool,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            mode_switch_shift: true,
            mode_switch_control: false,
            page_minus_equals: false,
            page_comma_period: false,
            retract_disabled_bindings: false,
        }
    }
}

impl KeyboardConfig {
    pub fn binding_policy(&self) -> BindingPolicy {
        if self.retract_disabled_bindings {
            BindingPolicy::Retract
        } else {
            BindingPolicy::Accumulate
        }
    }
}

/// Configuration consumed by the session bridge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub pinyin: PinyinConfig,
    pub view: ViewConfig,
    pub keyboard: KeyboardConfig,
}

impl BridgeConfig {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, BridgeError> {
        toml::from_str(content).map_err(|e| BridgeError::Config(e.to_string()))
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
