//! Platform-neutral key identifiers
//!
//! rdev reports left and right modifiers as distinct keys, which is what
//! chord matching needs. This module gives them stable names usable in the
//! config file and converts to and from `rdev::Key`.

use crate::error::HotkeyError;
use std::fmt;

/// A physical key as seen by the hotkey matcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    ShiftLeft,
    ShiftRight,
    MetaLeft,
    MetaRight,
    Function,
    CapsLock,
    Escape,
    Space,
    Tab,
    Return,
    Backspace,
    Delete,
    Insert,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    Home,
    End,
    PageUp,
    PageDown,
    PrintScreen,
    ScrollLock,
    Pause,
    NumLock,
    /// F1 to F12
    F(u8),
    /// A to Z, stored upper-case
    Letter(char),
    /// Top-row digits 0 to 9
    Digit(u8),
    /// Punctuation on the main block, stored as its unshifted character
    Symbol(char),
    /// Numeric keypad, stored as the character it produces
    Keypad(char),
    /// Raw platform key code with no named mapping
    Unknown(u32),
}

impl Key {
    /// Raw platform code, only known for unmapped keys
    pub fn raw_code(&self) -> Option<u32> {
        match self {
            Key::Unknown(code) => Some(*code),
            _ => None,
        }
    }

    /// Convert to the rdev key used for synthetic input
    pub fn to_rdev(self) -> Option<rdev::Key> {
        use rdev::Key as R;

        let key = match self {
            Key::ControlLeft => R::ControlLeft,
            Key::ControlRight => R::ControlRight,
            Key::AltLeft => R::Alt,
            Key::AltRight => R::AltGr,
            Key::ShiftLeft => R::ShiftLeft,
            Key::ShiftRight => R::ShiftRight,
            Key::MetaLeft => R::MetaLeft,
            Key::MetaRight => R::MetaRight,
            Key::Function => R::Function,
            Key::CapsLock => R::CapsLock,
            Key::Escape => R::Escape,
            Key::Space => R::Space,
            Key::Tab => R::Tab,
            Key::Return => R::Return,
            Key::Backspace => R::Backspace,
            Key::Delete => R::Delete,
            Key::Insert => R::Insert,
            Key::UpArrow => R::UpArrow,
            Key::DownArrow => R::DownArrow,
            Key::LeftArrow => R::LeftArrow,
            Key::RightArrow => R::RightArrow,
            Key::Home => R::Home,
            Key::End => R::End,
            Key::PageUp => R::PageUp,
            Key::PageDown => R::PageDown,
            Key::PrintScreen => R::PrintScreen,
            Key::ScrollLock => R::ScrollLock,
            Key::Pause => R::Pause,
            Key::NumLock => R::NumLock,
            Key::F(n) => return function_key(n),
            Key::Letter(c) => return letter_key(c),
            Key::Digit(d) => return digit_key(d),
            Key::Symbol(c) => return symbol_key(c),
            Key::Keypad(c) => return keypad_key(c),
            Key::Unknown(code) => R::Unknown(code),
        };
        Some(key)
    }
}

impl From<rdev::Key> for Key {
    #[allow(unreachable_patterns)]
    fn from(key: rdev::Key) -> Self {
        use rdev::Key as R;

        match key {
            R::ControlLeft => Key::ControlLeft,
            R::ControlRight => Key::ControlRight,
            R::Alt => Key::AltLeft,
            R::AltGr => Key::AltRight,
            R::ShiftLeft => Key::ShiftLeft,
            R::ShiftRight => Key::ShiftRight,
            R::MetaLeft => Key::MetaLeft,
            R::MetaRight => Key::MetaRight,
            R::Function => Key::Function,
            R::CapsLock => Key::CapsLock,
            R::Escape => Key::Escape,
            R::Space => Key::Space,
            R::Tab => Key::Tab,
            R::Return => Key::Return,
            R::Backspace => Key::Backspace,
            R::Delete => Key::Delete,
            R::Insert => Key::Insert,
            R::UpArrow => Key::UpArrow,
            R::DownArrow => Key::DownArrow,
            R::LeftArrow => Key::LeftArrow,
            R::RightArrow => Key::RightArrow,
            R::Home => Key::Home,
            R::End => Key::End,
            R::PageUp => Key::PageUp,
            R::PageDown => Key::PageDown,
            R::PrintScreen => Key::PrintScreen,
            R::ScrollLock => Key::ScrollLock,
            R::Pause => Key::Pause,
            R::NumLock => Key::NumLock,

            R::F1 => Key::F(1),
            R::F2 => Key::F(2),
            R::F3 => Key::F(3),
            R::F4 => Key::F(4),
            R::F5 => Key::F(5),
            R::F6 => Key::F(6),
            R::F7 => Key::F(7),
            R::F8 => Key::F(8),
            R::F9 => Key::F(9),
            R::F10 => Key::F(10),
            R::F11 => Key::F(11),
            R::F12 => Key::F(12),

            R::KeyA => Key::Letter('A'),
            R::KeyB => Key::Letter('B'),
            R::KeyC => Key::Letter('C'),
            R::KeyD => Key::Letter('D'),
            R::KeyE => Key::Letter('E'),
            R::KeyF => Key::Letter('F'),
            R::KeyG => Key::Letter('G'),
            R::KeyH => Key::Letter('H'),
            R::KeyI => Key::Letter('I'),
            R::KeyJ => Key::Letter('J'),
            R::KeyK => Key::Letter('K'),
            R::KeyL => Key::Letter('L'),
            R::KeyM => Key::Letter('M'),
            R::KeyN => Key::Letter('N'),
            R::KeyO => Key::Letter('O'),
            R::KeyP => Key::Letter('P'),
            R::KeyQ => Key::Letter('Q'),
            R::KeyR => Key::Letter('R'),
            R::KeyS => Key::Letter('S'),
            R::KeyT => Key::Letter('T'),
            R::KeyU => Key::Letter('U'),
            R::KeyV => Key::Letter('V'),
            R::KeyW => Key::Letter('W'),
            R::KeyX => Key::Letter('X'),
            R::KeyY => Key::Letter('Y'),
            R::KeyZ => Key::Letter('Z'),

            R::Num0 => Key::Digit(0),
            R::Num1 => Key::Digit(1),
            R::Num2 => Key::Digit(2),
            R::Num3 => Key::Digit(3),
            R::Num4 => Key::Digit(4),
            R::Num5 => Key::Digit(5),
            R::Num6 => Key::Digit(6),
            R::Num7 => Key::Digit(7),
            R::Num8 => Key::Digit(8),
            R::Num9 => Key::Digit(9),

            R::BackQuote => Key::Symbol('`'),
            R::Minus => Key::Symbol('-'),
            R::Equal => Key::Symbol('='),
            R::LeftBracket => Key::Symbol('['),
            R::RightBracket => Key::Symbol(']'),
            R::SemiColon => Key::Symbol(';'),
            R::Quote => Key::Symbol('\''),
            R::BackSlash => Key::Symbol('\\'),
            R::IntlBackslash => Key::Symbol('§'),
            R::Comma => Key::Symbol(','),
            R::Dot => Key::Symbol('.'),
            R::Slash => Key::Symbol('/'),

            R::Kp0 => Key::Keypad('0'),
            R::Kp1 => Key::Keypad('1'),
            R::Kp2 => Key::Keypad('2'),
            R::Kp3 => Key::Keypad('3'),
            R::Kp4 => Key::Keypad('4'),
            R::Kp5 => Key::Keypad('5'),
            R::Kp6 => Key::Keypad('6'),
            R::Kp7 => Key::Keypad('7'),
            R::Kp8 => Key::Keypad('8'),
            R::Kp9 => Key::Keypad('9'),
            R::KpReturn => Key::Keypad('\n'),
            R::KpMinus => Key::Keypad('-'),
            R::KpPlus => Key::Keypad('+'),
            R::KpMultiply => Key::Keypad('*'),
            R::KpDivide => Key::Keypad('/'),
            R::KpDelete => Key::Keypad('.'),

            R::Unknown(code) => Key::Unknown(code),
            _ => Key::Unknown(0),
        }
    }
}

fn function_key(n: u8) -> Option<rdev::Key> {
    use rdev::Key as R;
    let key = match n {
        1 => R::F1,
        2 => R::F2,
        3 => R::F3,
        4 => R::F4,
        5 => R::F5,
        6 => R::F6,
        7 => R::F7,
        8 => R::F8,
        9 => R::F9,
        10 => R::F10,
        11 => R::F11,
        12 => R::F12,
        _ => return None,
    };
    Some(key)
}

fn letter_key(c: char) -> Option<rdev::Key> {
    use rdev::Key as R;
    let key = match c.to_ascii_uppercase() {
        'A' => R::KeyA,
        'B' => R::KeyB,
        'C' => R::KeyC,
        'D' => R::KeyD,
        'E' => R::KeyE,
        'F' => R::KeyF,
        'G' => R::KeyG,
        'H' => R::KeyH,
        'I' => R::KeyI,
        'J' => R::KeyJ,
        'K' => R::KeyK,
        'L' => R::KeyL,
        'M' => R::KeyM,
        'N' => R::KeyN,
        'O' => R::KeyO,
        'P' => R::KeyP,
        'Q' => R::KeyQ,
        'R' => R::KeyR,
        'S' => R::KeyS,
        'T' => R::KeyT,
        'U' => R::KeyU,
        'V' => R::KeyV,
        'W' => R::KeyW,
        'X' => R::KeyX,
        'Y' => R::KeyY,
        'Z' => R::KeyZ,
        _ => return None,
    };
    Some(key)
}

fn digit_key(d: u8) -> Option<rdev::Key> {
    use rdev::Key as R;
    let key = match d {
        0 => R::Num0,
        1 => R::Num1,
        2 => R::Num2,
        3 => R::Num3,
        4 => R::Num4,
        5 => R::Num5,
        6 => R::Num6,
        7 => R::Num7,
        8 => R::Num8,
        9 => R::Num9,
        _ => return None,
    };
    Some(key)
}

fn symbol_key(c: char) -> Option<rdev::Key> {
    use rdev::Key as R;
    let key = match c {
        '`' => R::BackQuote,
        '-' => R::Minus,
        '=' => R::Equal,
        '[' => R::LeftBracket,
        ']' => R::RightBracket,
        ';' => R::SemiColon,
        '\'' => R::Quote,
        '\\' => R::BackSlash,
        '§' => R::IntlBackslash,
        ',' => R::Comma,
        '.' => R::Dot,
        '/' => R::Slash,
        _ => return None,
    };
    Some(key)
}

fn keypad_key(c: char) -> Option<rdev::Key> {
    use rdev::Key as R;
    let key = match c {
        '0' => R::Kp0,
        '1' => R::Kp1,
        '2' => R::Kp2,
        '3' => R::Kp3,
        '4' => R::Kp4,
        '5' => R::Kp5,
        '6' => R::Kp6,
        '7' => R::Kp7,
        '8' => R::Kp8,
        '9' => R::Kp9,
        '\n' => R::KpReturn,
        '-' => R::KpMinus,
        '+' => R::KpPlus,
        '*' => R::KpMultiply,
        '/' => R::KpDivide,
        '.' => R::KpDelete,
        _ => return None,
    };
    Some(key)
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::ControlLeft => write!(f, "LEFTCTRL"),
            Key::ControlRight => write!(f, "RIGHTCTRL"),
            Key::AltLeft => write!(f, "LEFTALT"),
            Key::AltRight => write!(f, "RIGHTALT"),
            Key::ShiftLeft => write!(f, "LEFTSHIFT"),
            Key::ShiftRight => write!(f, "RIGHTSHIFT"),
            Key::MetaLeft => write!(f, "LEFTMETA"),
            Key::MetaRight => write!(f, "RIGHTMETA"),
            Key::Function => write!(f, "FN"),
            Key::CapsLock => write!(f, "CAPSLOCK"),
            Key::Escape => write!(f, "ESCAPE"),
            Key::Space => write!(f, "SPACE"),
            Key::Tab => write!(f, "TAB"),
            Key::Return => write!(f, "RETURN"),
            Key::Backspace => write!(f, "BACKSPACE"),
            Key::Delete => write!(f, "DELETE"),
            Key::Insert => write!(f, "INSERT"),
            Key::UpArrow => write!(f, "UP"),
            Key::DownArrow => write!(f, "DOWN"),
            Key::LeftArrow => write!(f, "LEFT"),
            Key::RightArrow => write!(f, "RIGHT"),
            Key::Home => write!(f, "HOME"),
            Key::End => write!(f, "END"),
            Key::PageUp => write!(f, "PAGEUP"),
            Key::PageDown => write!(f, "PAGEDOWN"),
            Key::PrintScreen => write!(f, "PRINTSCREEN"),
            Key::ScrollLock => write!(f, "SCROLLLOCK"),
            Key::Pause => write!(f, "PAUSE"),
            Key::NumLock => write!(f, "NUMLOCK"),
            Key::F(n) => write!(f, "F{}", n),
            Key::Letter(c) => write!(f, "{}", c),
            Key::Digit(d) => write!(f, "{}", d),
            Key::Symbol(c) => write!(f, "SYMBOL({})", c),
            Key::Keypad(c) => write!(f, "KEYPAD({:?})", c),
            Key::Unknown(code) => write!(f, "CODE({:#x})", code),
        }
    }
}

/// Parse a key name from the config file
///
/// Accepts the same spellings as evtest/wev style names, case-insensitive,
/// with an optional `KEY_` prefix. Single letters and digits name themselves.
pub fn parse_key_name(name: &str) -> Result<Key, HotkeyError> {
    // Normalize: uppercase and replace - or space with _
    let normalized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect();

    let key_name = normalized.strip_prefix("KEY_").unwrap_or(&normalized);

    let key = match key_name {
        // Modifier keys
        "LEFTCTRL" | "LCTRL" | "CTRL" | "CONTROL" | "LEFTCONTROL" => Key::ControlLeft,
        "RIGHTCTRL" | "RCTRL" | "RIGHTCONTROL" => Key::ControlRight,
        "LEFTALT" | "LALT" | "ALT" | "OPTION" | "LEFTOPTION" => Key::AltLeft,
        "RIGHTALT" | "RALT" | "RIGHTOPTION" | "ALTGR" => Key::AltRight,
        "LEFTSHIFT" | "LSHIFT" | "SHIFT" => Key::ShiftLeft,
        "RIGHTSHIFT" | "RSHIFT" => Key::ShiftRight,
        "LEFTMETA" | "LMETA" | "META" | "SUPER" | "CMD" | "COMMAND" | "LEFTCMD"
        | "LEFTCOMMAND" => Key::MetaLeft,
        "RIGHTMETA" | "RMETA" | "RIGHTCMD" | "RIGHTCOMMAND" => Key::MetaRight,
        "FN" | "FUNCTION" | "GLOBE" => Key::Function,

        // Special keys
        "CAPSLOCK" => Key::CapsLock,
        "ESC" | "ESCAPE" => Key::Escape,
        "SPACE" => Key::Space,
        "TAB" => Key::Tab,
        "ENTER" | "RETURN" => Key::Return,
        "BACKSPACE" => Key::Backspace,
        "DELETE" => Key::Delete,
        "INSERT" => Key::Insert,
        "PRINTSCREEN" => Key::PrintScreen,
        "SCROLLLOCK" => Key::ScrollLock,
        "PAUSE" => Key::Pause,
        "NUMLOCK" => Key::NumLock,

        // Navigation
        "UP" | "UPARROW" => Key::UpArrow,
        "DOWN" | "DOWNARROW" => Key::DownArrow,
        "LEFT" | "LEFTARROW" => Key::LeftArrow,
        "RIGHT" | "RIGHTARROW" => Key::RightArrow,
        "HOME" => Key::Home,
        "END" => Key::End,
        "PAGEUP" => Key::PageUp,
        "PAGEDOWN" => Key::PageDown,

        // Punctuation
        "GRAVE" | "BACKTICK" => Key::Symbol('`'),
        "MINUS" => Key::Symbol('-'),
        "EQUAL" => Key::Symbol('='),
        "LEFTBRACE" | "LEFTBRACKET" => Key::Symbol('['),
        "RIGHTBRACE" | "RIGHTBRACKET" => Key::Symbol(']'),
        "SEMICOLON" => Key::Symbol(';'),
        "APOSTROPHE" | "QUOTE" => Key::Symbol('\''),
        "BACKSLASH" => Key::Symbol('\\'),
        "COMMA" => Key::Symbol(','),
        "DOT" | "PERIOD" => Key::Symbol('.'),
        "SLASH" => Key::Symbol('/'),

        other => {
            if let Some(n) = other.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(Key::F(n));
                }
            }

            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_uppercase() => Key::Letter(c),
                (Some(c), None) if c.is_ascii_digit() => Key::Digit(c as u8 - b'0'),
                _ => return Err(HotkeyError::UnknownKey(name.to_string())),
            }
        }
    };

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_name() {
        assert_eq!(parse_key_name("LEFTCTRL").unwrap(), Key::ControlLeft);
        assert_eq!(parse_key_name("rightalt").unwrap(), Key::AltRight);
        assert_eq!(parse_key_name("KEY_X").unwrap(), Key::Letter('X'));
        assert_eq!(parse_key_name("x").unwrap(), Key::Letter('X'));
        assert_eq!(parse_key_name("f5").unwrap(), Key::F(5));
        assert_eq!(parse_key_name("7").unwrap(), Key::Digit(7));
        assert_eq!(parse_key_name("Right-Option").unwrap(), Key::AltRight);
        assert_eq!(parse_key_name("CMD").unwrap(), Key::MetaLeft);
    }

    #[test]
    fn test_parse_key_name_unknown() {
        match parse_key_name("HYPERKEY") {
            Err(HotkeyError::UnknownKey(name)) => assert_eq!(name, "HYPERKEY"),
            other => panic!("Expected UnknownKey, got {:?}", other),
        }
        assert!(parse_key_name("F13").is_err());
        assert!(parse_key_name("").is_err());
    }

    #[test]
    fn test_display_round_trips_through_parser() {
        for key in [
            Key::ControlLeft,
            Key::AltRight,
            Key::MetaRight,
            Key::Letter('Q'),
            Key::F(11),
            Key::RightArrow,
        ] {
            assert_eq!(parse_key_name(&key.to_string()).unwrap(), key);
        }
    }

    #[test]
    fn test_from_rdev_keeps_sides_distinct() {
        assert_eq!(Key::from(rdev::Key::Alt), Key::AltLeft);
        assert_eq!(Key::from(rdev::Key::AltGr), Key::AltRight);
        assert_eq!(Key::from(rdev::Key::ControlLeft), Key::ControlLeft);
        assert_eq!(Key::from(rdev::Key::ControlRight), Key::ControlRight);
        assert_eq!(Key::from(rdev::Key::KeyX), Key::Letter('X'));
        assert_eq!(Key::from(rdev::Key::Unknown(0xF704)), Key::Unknown(0xF704));
    }

    #[test]
    fn test_to_rdev() {
        assert_eq!(Key::Letter('v').to_rdev(), Some(rdev::Key::KeyV));
        assert_eq!(Key::MetaLeft.to_rdev(), Some(rdev::Key::MetaLeft));
        assert_eq!(Key::RightArrow.to_rdev(), Some(rdev::Key::RightArrow));
        assert_eq!(Key::F(13).to_rdev(), None);
    }

    #[test]
    fn test_raw_code() {
        assert_eq!(Key::Unknown(42).raw_code(), Some(42));
        assert_eq!(Key::Letter('A').raw_code(), None);
    }
}
