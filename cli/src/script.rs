// cli/src/script.rs
//
// Line-oriented script format for driving a bridge:
//
//   key a                   printable key
//   key Shift_L shift release
//   key 0xff08              raw key value
//   type nihao              one key press per character
//   focus-in | focus-out | reset | destroy | status
//   prop status             activate a property
//   page-up | page-down | cursor-up | cursor-down
//   click 2                 candidate index within the window
//   reload [path]           re-read configuration
//
// Blank lines and lines starting with `#` are skipped.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use imbridge_core::{keysym, Modifiers};

/// A host key as the framework would deliver it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKey {
    pub value: u32,
    pub code: u32,
    pub modifiers: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Key(RawKey),
    Type(String),
    FocusIn,
    FocusOut,
    Prop(String),
    PageUp,
    PageDown,
    CursorUp,
    CursorDown,
    Click(usize),
    Reset,
    Reload(Option<PathBuf>),
    Destroy,
    Status,
}

const KEY_NAMES: &[(&str, u32)] = &[
    ("space", 0x20),
    ("Tab", 0xff09),
    ("BackSpace", keysym::BACKSPACE),
    ("Return", keysym::RETURN),
    ("Escape", keysym::ESCAPE),
    ("Up", keysym::UP),
    ("Down", keysym::DOWN),
    ("Page_Up", keysym::PAGE_UP),
    ("Page_Down", keysym::PAGE_DOWN),
    ("Shift_L", keysym::SHIFT_L),
    ("Shift_R", keysym::SHIFT_R),
    ("Control_L", keysym::CONTROL_L),
    ("Control_R", keysym::CONTROL_R),
];

fn parse_modifier(name: &str) -> Result<Modifiers> {
    Ok(match name {
        "shift" => Modifiers::SHIFT,
        "lock" => Modifiers::LOCK,
        "control" | "ctrl" => Modifiers::CONTROL,
        "alt" => Modifiers::ALT,
        "super" => Modifiers::SUPER,
        "release" => Modifiers::RELEASE,
        other => bail!("unknown modifier '{other}'"),
    })
}

fn parse_key_value(name: &str) -> Result<u32> {
    if let Some((_, value)) = KEY_NAMES.iter().find(|(n, _)| *n == name) {
        return Ok(*value);
    }
    if let Some(hex) = name.strip_prefix("0x") {
        return u32::from_str_radix(hex, 16).with_context(|| format!("bad key value '{name}'"));
    }
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch as u32),
        _ => Err(anyhow!("unknown key '{name}'")),
    }
}

/// Key presses carry no hardware code; the bridge only needs one for
/// printable keys, where any stable number will do.
pub fn raw_key(value: u32, modifiers: Modifiers) -> RawKey {
    RawKey {
        value,
        code: 0,
        modifiers: modifiers.bits(),
    }
}

/// Parse one script line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word {
        "key" => {
            let mut parts = rest.split_whitespace();
            let name = parts.next().ok_or_else(|| anyhow!("key needs a key name"))?;
            let value = parse_key_value(name)?;
            let modifiers = parts.try_fold(Modifiers::empty(), |acc, m| {
                parse_modifier(m).map(|m| acc | m)
            })?;
            Command::Key(raw_key(value, modifiers))
        }
        "type" => {
            if rest.is_empty() {
                bail!("type needs text");
            }
            Command::Type(rest.to_string())
        }
        "prop" => {
            if rest.is_empty() {
                bail!("prop needs a property name");
            }
            Command::Prop(rest.to_string())
        }
        "click" => Command::Click(
            rest.parse()
                .with_context(|| format!("bad candidate index '{rest}'"))?,
        ),
        "reload" => Command::Reload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "focus-in" => Command::FocusIn,
        "focus-out" => Command::FocusOut,
        "page-up" => Command::PageUp,
        "page-down" => Command::PageDown,
        "cursor-up" => Command::CursorUp,
        "cursor-down" => Command::CursorDown,
        "reset" => Command::Reset,
        "destroy" => Command::Destroy,
        "status" => Command::Status,
        other => bail!("unknown command '{other}'"),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   # note").unwrap(), None);
    }

    #[test]
    fn test_named_key_with_modifiers() {
        let cmd = parse_line("key Shift_L shift release").unwrap().unwrap();
        assert_eq!(
            cmd,
            Command::Key(RawKey {
                value: keysym::SHIFT_L,
                code: 0,
                modifiers: (Modifiers::SHIFT | Modifiers::RELEASE).bits(),
            })
        );
    }

    #[test]
    fn test_printable_and_hex_keys() {
        assert_eq!(
            parse_line("key -").unwrap(),
            Some(Command::Key(raw_key('-' as u32, Modifiers::empty())))
        );
        assert_eq!(
            parse_line("key 0xff08").unwrap(),
            Some(Command::Key(raw_key(keysym::BACKSPACE, Modifiers::empty())))
        );
    }

    #[test]
    fn test_arguments() {
        assert_eq!(parse_line("type nihao").unwrap(), Some(Command::Type("nihao".into())));
        assert_eq!(parse_line("click 3").unwrap(), Some(Command::Click(3)));
        assert_eq!(
            parse_line("prop full_punct").unwrap(),
            Some(Command::Prop("full_punct".into()))
        );
        assert_eq!(parse_line("reload").unwrap(), Some(Command::Reload(None)));
        assert_eq!(
            parse_line("reload alt.toml").unwrap(),
            Some(Command::Reload(Some(PathBuf::from("alt.toml"))))
        );
    }

    #[test]
    fn test_errors() {
        assert!(parse_line("key").is_err());
        assert!(parse_line("key a hyper").is_err());
        assert!(parse_line("key Hyper_L").is_err());
        assert!(parse_line("click two").is_err());
        assert!(parse_line("jump").is_err());
    }
}
