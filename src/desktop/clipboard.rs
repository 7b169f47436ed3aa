//! System clipboard via arboard
//!
//! One arboard handle is kept for the life of the daemon. On X11 the
//! clipboard contents are served by that handle, so dropping it right after
//! a write would lose the text before the paste lands.

use super::ClipboardBridge;
use crate::error::DesktopError;
use std::cell::RefCell;

/// Clipboard bridge backed by arboard
pub struct SystemClipboard {
    inner: RefCell<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self, DesktopError> {
        let inner = arboard::Clipboard::new()?;
        Ok(Self {
            inner: RefCell::new(inner),
        })
    }
}

impl ClipboardBridge for SystemClipboard {
    fn read(&self) -> Result<String, DesktopError> {
        match self.inner.borrow_mut().get_text() {
            Ok(text) => Ok(text),
            // An empty clipboard is not an error for our purposes
            Err(arboard::Error::ContentNotAvailable) => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, text: &str) -> Result<(), DesktopError> {
        self.inner.borrow_mut().set_text(text.to_string())?;
        tracing::trace!("Clipboard set ({} chars)", text.chars().count());
        Ok(())
    }
}
