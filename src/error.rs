//! Error types for quillkey
//!
//! Uses thiserror for ergonomic error definitions with clear messages
//! that guide users toward fixing common issues.
//!
//! Only configuration and startup errors ever reach the user. Everything
//! that happens inside a trigger sequence is best-effort and gets logged
//! instead of propagated.

use thiserror::Error;

/// Top-level error type for the quillkey application
#[derive(Error, Debug)]
pub enum QuillkeyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Hotkey error: {0}")]
    Hotkey(#[from] HotkeyError),

    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),

    #[error("Desktop error: {0}")]
    Desktop(#[from] DesktopError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to hotkey configuration and the global key listener
#[derive(Error, Debug)]
pub enum HotkeyError {
    #[error("Unknown key name: '{0}'. Use names like LEFTCTRL, RIGHTALT, X, F5.")]
    UnknownKey(String),

    #[error("No hotkey chords configured. Add at least one entry to [hotkey] chords.")]
    NoChords,

    #[error("Global key listener failed: {0}\n  On macOS, grant Accessibility access in System Settings > Privacy & Security > Accessibility.")]
    Listen(String),
}

/// Errors related to the rewrite service
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors from the clipboard, focus and synthetic-input bridges
#[derive(Error, Debug)]
pub enum DesktopError {
    #[error("Clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("Cannot determine focused application: {0}")]
    Focus(String),

    #[error("Synthetic input failed: {0}")]
    Input(String),
}

/// Result type alias using QuillkeyError
pub type Result<T> = std::result::Result<T, QuillkeyError>;

impl From<arboard::Error> for DesktopError {
    fn from(e: arboard::Error) -> Self {
        DesktopError::Clipboard(e.to_string())
    }
}
