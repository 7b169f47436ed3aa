//! Hotkey detection module
//!
//! Global key events come from rdev, which works on macOS (Accessibility
//! permission required), X11 and Windows. The listener thread owns the
//! [`HotkeyMatcher`] so key bookkeeping keeps running while a trigger
//! sequence is in flight on the daemon side.

pub mod keys;
pub mod matcher;
pub mod rdev_listener;

pub use keys::{parse_key_name, Key};
pub use matcher::HotkeyMatcher;

use crate::config::HotkeyConfig;
use crate::error::HotkeyError;
use tokio::sync::mpsc;

/// Events emitted by the hotkey listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// A configured chord became fully held
    Triggered,
}

/// Trait for hotkey detection implementations
pub trait HotkeyListener: Send {
    /// Start listening for hotkey events
    /// Returns a channel receiver for events
    fn start(&mut self) -> Result<mpsc::Receiver<HotkeyEvent>, HotkeyError>;

    /// Stop listening and clean up
    fn stop(&mut self) -> Result<(), HotkeyError>;
}

/// Factory function to create the platform hotkey listener
pub fn create_listener(config: &HotkeyConfig) -> Result<Box<dyn HotkeyListener>, HotkeyError> {
    Ok(Box::new(rdev_listener::RdevListener::new(config)?))
}
