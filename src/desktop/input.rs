//! Synthetic key events via rdev
//!
//! macOS drops simulated events that arrive back to back, so every event is
//! followed by a short pause.

use super::InputSynthesizer;
use crate::error::DesktopError;
use crate::hotkey::Key;
use rdev::{simulate, EventType};
use std::time::Duration;

/// rdev-based input synthesizer
pub struct RdevSynthesizer {
    /// Pause after every simulated event
    event_delay: Duration,
}

impl Default for RdevSynthesizer {
    fn default() -> Self {
        Self {
            event_delay: Duration::from_millis(20),
        }
    }
}

impl RdevSynthesizer {
    fn send(&self, event: EventType) -> Result<(), DesktopError> {
        simulate(&event)
            .map_err(|e| DesktopError::Input(format!("could not send {:?}: {:?}", event, e)))?;
        std::thread::sleep(self.event_delay);
        Ok(())
    }
}

fn rdev_key(key: Key) -> Result<rdev::Key, DesktopError> {
    key.to_rdev()
        .ok_or_else(|| DesktopError::Input(format!("{} cannot be simulated", key)))
}

impl InputSynthesizer for RdevSynthesizer {
    fn press_combo(&self, modifier: Key, key: Key) -> Result<(), DesktopError> {
        let modifier = rdev_key(modifier)?;
        let key = rdev_key(key)?;

        self.send(EventType::KeyPress(modifier))?;
        let tapped = self
            .send(EventType::KeyPress(key))
            .and_then(|_| self.send(EventType::KeyRelease(key)));
        // Always let go of the modifier, even if the key itself failed
        self.send(EventType::KeyRelease(modifier))?;
        tapped
    }

    fn tap(&self, key: Key) -> Result<(), DesktopError> {
        let key = rdev_key(key)?;
        self.send(EventType::KeyPress(key))?;
        self.send(EventType::KeyRelease(key))
    }
}
