//! Key events as the engine session sees them.
//!
//! The host delivers three integers per key press: a key value (a keysym,
//! which for printable keys is the character itself), a hardware key code
//! and a modifier mask. `translate_key` folds them into a `KeyEvent`.

use std::fmt;

bitflags::bitflags! {
    /// Modifier state attached to a key event.
    ///
    /// Bit positions follow the host's modifier mask so a raw mask can be
    /// carried over unchanged; unknown bits are retained.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
    pub struct Modifiers: u32 {
        const SHIFT   = 1 << 0;
        const LOCK    = 1 << 1;
        const CONTROL = 1 << 2;
        const ALT     = 1 << 3;
        const SUPER   = 1 << 26;
        const RELEASE = 1 << 30;
    }
}

/// Key symbols the bridge refers to by name.
pub mod keysym {
    pub const BACKSPACE: u32 = 0xff08;
    pub const RETURN: u32 = 0xff0d;
    pub const ESCAPE: u32 = 0xff1b;
    pub const UP: u32 = 0xff52;
    pub const DOWN: u32 = 0xff54;
    pub const PAGE_UP: u32 = 0xff55;
    pub const PAGE_DOWN: u32 = 0xff56;
    pub const SHIFT_L: u32 = 0xffe1;
    pub const SHIFT_R: u32 = 0xffe2;
    pub const CONTROL_L: u32 = 0xffe3;
    pub const CONTROL_R: u32 = 0xffe4;
}

/// A key event in the engine's representation.
///
/// Exactly one of `code` and `value` is authoritative: printable keys carry
/// their character in `value`, everything else is identified by `code`
/// with `value == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyEvent {
    pub code: u32,
    pub value: u32,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(code: u32, value: u32, modifiers: Modifiers) -> Self {
        Self {
            code,
            value,
            modifiers,
        }
    }

    /// A value-matched event for a printable character.
    pub const fn from_char(ch: char, modifiers: Modifiers) -> Self {
        Self::new(0, ch as u32, modifiers)
    }

    /// A code-matched event for a non-printable key.
    pub const fn from_code(code: u32, modifiers: Modifiers) -> Self {
        Self::new(code, 0, modifiers)
    }

    /// The printable character carried by this event, if any.
    pub fn char(&self) -> Option<char> {
        if self.value == 0 {
            None
        } else {
            char::from_u32(self.value)
        }
    }

    pub fn is_release(&self) -> bool {
        self.modifiers.contains(Modifiers::RELEASE)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "code={:#x} value={:#x} modifiers={:#x}",
            self.code,
            self.value,
            self.modifiers.bits()
        )
    }
}

/// ASCII whitespace as the C locale defines it (includes vertical tab).
fn is_space(value: u32) -> bool {
    matches!(value, 0x20 | 0x09 | 0x0a | 0x0b | 0x0c | 0x0d)
}

/// Normalize a host key event into the engine's representation.
///
/// Printable, non-whitespace ASCII keys are matched by value and keep the
/// host's key code. For every other key the host does not provide a usable
/// separate code, so its key value is reinterpreted as the code and the
/// value is zeroed.
pub fn translate_key(raw_value: u32, raw_code: u32, modifiers: u32) -> KeyEvent {
    let modifiers = Modifiers::from_bits_retain(modifiers);
    if raw_value < 0x80 && !is_space(raw_value) {
        KeyEvent::new(raw_code, raw_value, modifiers)
    } else {
        KeyEvent::new(raw_value, 0, modifiers)
    }
}
