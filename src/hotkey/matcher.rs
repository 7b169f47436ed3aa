//! Chord detection over the set of currently held keys
//!
//! The matcher is a plain set-membership check. Debounce and re-entrancy
//! live in the trigger orchestrator so this stays trivially testable.

use super::keys::{parse_key_name, Key};
use crate::config::HotkeyConfig;
use crate::error::HotkeyError;
use std::collections::HashSet;
use std::ops::RangeInclusive;

/// Tracks pressed keys and reports when any chord variant is held
#[derive(Debug, Clone)]
pub struct HotkeyMatcher {
    /// Keys currently held down
    pressed: HashSet<Key>,
    /// Equivalent chord variants, any one of which fires the trigger
    chords: Vec<HashSet<Key>>,
    /// Keys never recorded as pressed
    ignored: HashSet<Key>,
    /// Raw key codes never recorded as pressed
    ignored_codes: Option<RangeInclusive<u32>>,
}

impl HotkeyMatcher {
    pub fn new(
        chords: Vec<HashSet<Key>>,
        ignored: HashSet<Key>,
        ignored_codes: Option<RangeInclusive<u32>>,
    ) -> Result<Self, HotkeyError> {
        let chords: Vec<HashSet<Key>> = chords.into_iter().filter(|c| !c.is_empty()).collect();
        if chords.is_empty() {
            return Err(HotkeyError::NoChords);
        }

        Ok(Self {
            pressed: HashSet::new(),
            chords,
            ignored,
            ignored_codes,
        })
    }

    /// Build a matcher from the `[hotkey]` config section
    pub fn from_config(config: &HotkeyConfig) -> Result<Self, HotkeyError> {
        let chords = config
            .chords
            .iter()
            .map(|chord| {
                chord
                    .iter()
                    .map(|name| parse_key_name(name))
                    .collect::<Result<HashSet<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let ignored = config
            .ignore
            .iter()
            .map(|name| parse_key_name(name))
            .collect::<Result<HashSet<_>, _>>()?;

        let ignored_codes = config
            .ignore_code_range
            .map(|[start, end]| start.min(end)..=start.max(end));

        Self::new(chords, ignored, ignored_codes)
    }

    /// Whether a key is filtered out before reaching the pressed set
    pub fn is_ignored(&self, key: &Key) -> bool {
        if self.ignored.contains(key) {
            return true;
        }
        match (key.raw_code(), &self.ignored_codes) {
            (Some(code), Some(range)) => range.contains(&code),
            _ => false,
        }
    }

    /// Record a key press. Returns true when a chord is now satisfied.
    pub fn press(&mut self, key: Key) -> bool {
        if self.is_ignored(&key) {
            return false;
        }
        self.pressed.insert(key);
        self.is_satisfied()
    }

    /// Record a key release. Releasing a key that was never recorded is a no-op.
    pub fn release(&mut self, key: Key) {
        self.pressed.remove(&key);
    }

    /// True when the held keys cover at least one chord variant
    pub fn is_satisfied(&self) -> bool {
        self.chords
            .iter()
            .any(|chord| self.pressed.is_superset(chord))
    }

    pub fn pressed(&self) -> &HashSet<Key> {
        &self.pressed
    }

    pub fn chords(&self) -> &[HashSet<Key>] {
        &self.chords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl_alt_x() -> HotkeyMatcher {
        let x = Key::Letter('X');
        let chords = vec![
            HashSet::from([Key::ControlLeft, Key::AltLeft, x]),
            HashSet::from([Key::ControlRight, Key::AltRight, x]),
            HashSet::from([Key::ControlLeft, Key::AltRight, x]),
            HashSet::from([Key::ControlRight, Key::AltLeft, x]),
        ];
        HotkeyMatcher::new(
            chords,
            HashSet::from([Key::MetaLeft, Key::MetaRight]),
            Some(0xF700..=0xF8FF),
        )
        .unwrap()
    }

    #[test]
    fn test_every_variant_fires() {
        let variants = [
            (Key::ControlLeft, Key::AltLeft),
            (Key::ControlRight, Key::AltRight),
            (Key::ControlLeft, Key::AltRight),
            (Key::ControlRight, Key::AltLeft),
        ];
        for (ctrl, alt) in variants {
            let mut m = ctrl_alt_x();
            assert!(!m.press(ctrl));
            assert!(!m.press(alt));
            assert!(m.press(Key::Letter('X')), "{:?}+{:?}+X should fire", ctrl, alt);
        }
    }

    #[test]
    fn test_proper_subset_does_not_fire() {
        let mut m = ctrl_alt_x();
        m.press(Key::ControlLeft);
        assert!(!m.press(Key::Letter('X')));
        assert!(!m.is_satisfied());

        // Both controls but no alt is still a subset of every variant
        assert!(!m.press(Key::ControlRight));
    }

    #[test]
    fn test_extra_keys_still_fire() {
        let mut m = ctrl_alt_x();
        m.press(Key::ShiftLeft);
        m.press(Key::ControlLeft);
        m.press(Key::AltLeft);
        assert!(m.press(Key::Letter('X')));
    }

    #[test]
    fn test_release_breaks_chord() {
        let mut m = ctrl_alt_x();
        m.press(Key::ControlLeft);
        m.press(Key::AltLeft);
        assert!(m.press(Key::Letter('X')));
        m.release(Key::AltLeft);
        assert!(!m.is_satisfied());
        assert!(m.press(Key::AltRight));
    }

    #[test]
    fn test_release_unknown_key_is_noop() {
        let mut m = ctrl_alt_x();
        m.release(Key::Letter('Q'));
        m.release(Key::Letter('Q'));
        assert!(m.pressed().is_empty());
    }

    #[test]
    fn test_ignored_keys_never_recorded() {
        let mut m = ctrl_alt_x();
        m.press(Key::MetaLeft);
        m.press(Key::MetaRight);
        m.press(Key::Unknown(0xF704));
        m.press(Key::Unknown(0xF8FF));
        assert!(m.pressed().is_empty());

        // Codes just outside the range are kept
        m.press(Key::Unknown(0xF6FF));
        assert!(m.pressed().contains(&Key::Unknown(0xF6FF)));
    }

    #[test]
    fn test_pressed_set_is_pressed_minus_released() {
        let mut m = ctrl_alt_x();
        let events: [(bool, Key); 9] = [
            (true, Key::Letter('A')),
            (true, Key::MetaLeft),
            (true, Key::Letter('B')),
            (false, Key::Letter('A')),
            (true, Key::ShiftLeft),
            (false, Key::Letter('Z')),
            (true, Key::Unknown(0xF710)),
            (false, Key::MetaLeft),
            (true, Key::Letter('A')),
        ];
        let mut expected = HashSet::new();
        for (down, key) in events {
            if down {
                m.press(key);
                if !matches!(key, Key::MetaLeft | Key::Unknown(0xF710)) {
                    expected.insert(key);
                }
            } else {
                m.release(key);
                expected.remove(&key);
            }
        }
        assert_eq!(m.pressed(), &expected);
    }

    #[test]
    fn test_no_chords_is_error() {
        let result = HotkeyMatcher::new(vec![HashSet::new()], HashSet::new(), None);
        assert!(matches!(result, Err(HotkeyError::NoChords)));
    }

    #[test]
    fn test_from_config_defaults() {
        let m = HotkeyMatcher::from_config(&HotkeyConfig::default()).unwrap();
        assert_eq!(m.chords().len(), 4);
        assert!(m.is_ignored(&Key::MetaLeft));
        assert!(m.is_ignored(&Key::Unknown(0xF700)));
        assert!(!m.is_ignored(&Key::Letter('X')));
    }

    #[test]
    fn test_from_config_unknown_key() {
        let config = HotkeyConfig {
            chords: vec![vec!["LEFTCTRL".into(), "NOPE".into()]],
            ..HotkeyConfig::default()
        };
        assert!(matches!(
            HotkeyMatcher::from_config(&config),
            Err(HotkeyError::UnknownKey(_))
        ));
    }
}
