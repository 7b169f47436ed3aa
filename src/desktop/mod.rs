//! Desktop bridges
//!
//! The trigger sequence touches three pieces of OS state: the clipboard,
//! the focused application and the keyboard. Each sits behind a small trait
//! so the orchestrator is platform-independent and can be driven by fakes.
//!
//! Implementations report failures as errors; the orchestrator decides what
//! the best-effort fallback is.

pub mod clipboard;
pub mod focus;
pub mod input;

use crate::error::DesktopError;
use crate::hotkey::Key;

/// Read and write the system clipboard as plain text
pub trait ClipboardBridge {
    /// Current clipboard text. Non-text content is an error.
    fn read(&self) -> Result<String, DesktopError>;

    /// Replace the clipboard contents with `text`
    fn write(&self, text: &str) -> Result<(), DesktopError>;
}

/// Reports which application owns keyboard focus right now
pub trait FocusInspector {
    /// Display name of the focused application. Never cached.
    fn active_application_name(&self) -> Result<String, DesktopError>;
}

/// Sends synthetic key events to whatever has focus
pub trait InputSynthesizer {
    /// Hold `modifier`, tap `key`, release `modifier`
    fn press_combo(&self, modifier: Key, key: Key) -> Result<(), DesktopError>;

    /// Press and release a single key
    fn tap(&self, key: Key) -> Result<(), DesktopError>;
}

/// Create the system clipboard bridge
pub fn create_clipboard() -> Result<Box<dyn ClipboardBridge>, DesktopError> {
    Ok(Box::new(clipboard::SystemClipboard::new()?))
}

/// Create the system focus inspector
pub fn create_focus_inspector() -> Box<dyn FocusInspector> {
    Box::new(focus::ActiveWindowInspector)
}

/// Create the system input synthesizer
pub fn create_input_synthesizer() -> Box<dyn InputSynthesizer> {
    Box::new(input::RdevSynthesizer::default())
}
