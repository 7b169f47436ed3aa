//! Global hotkey support using rdev
//!
//! Provides global keyboard event capture using the rdev crate.
//! On macOS this requires Accessibility permission for the terminal/app.
//! On Linux it needs an X11 session.

use super::{HotkeyEvent, HotkeyListener, HotkeyMatcher, Key};
use crate::config::HotkeyConfig;
use crate::error::HotkeyError;
use rdev::{listen, Event, EventType};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// rdev-based hotkey listener
pub struct RdevListener {
    matcher: Option<HotkeyMatcher>,
    running: Arc<AtomicBool>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl RdevListener {
    /// Create a new rdev listener for the configured chords
    pub fn new(config: &HotkeyConfig) -> Result<Self, HotkeyError> {
        let matcher = HotkeyMatcher::from_config(config)?;

        tracing::debug!(
            "Hotkey chords: {}",
            config
                .chords
                .iter()
                .map(|c| c.join("+"))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            matcher: Some(matcher),
            running: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        })
    }
}

impl HotkeyListener for RdevListener {
    fn start(&mut self) -> Result<mpsc::Receiver<HotkeyEvent>, HotkeyError> {
        let matcher = self
            .matcher
            .take()
            .ok_or_else(|| HotkeyError::Listen("listener already started".to_string()))?;

        let (tx, rx) = mpsc::channel(32);
        let running = self.running.clone();
        running.store(true, Ordering::SeqCst);

        let thread_handle = std::thread::spawn(move || {
            let matcher = Mutex::new(matcher);
            let running_clone = running.clone();

            let callback = move |event: Event| {
                if !running_clone.load(Ordering::SeqCst) {
                    return;
                }

                let mut matcher = matcher.lock().unwrap_or_else(|e| e.into_inner());
                match event.event_type {
                    EventType::KeyPress(key) => {
                        if matcher.press(Key::from(key)) {
                            tracing::debug!("Hotkey chord satisfied");
                            if tx.try_send(HotkeyEvent::Triggered).is_err() {
                                tracing::trace!("Trigger channel full or closed, dropping");
                            }
                        }
                    }
                    EventType::KeyRelease(key) => {
                        matcher.release(Key::from(key));
                    }
                    _ => {}
                }
            };

            // This blocks until an error occurs or the process is terminated
            if let Err(e) = listen(callback) {
                tracing::error!("rdev listen error: {:?}", e);
                tracing::warn!(
                    "Global hotkey capture failed. Grant Accessibility permission in \
                     System Settings > Privacy & Security > Accessibility."
                );
            }
            running.store(false, Ordering::SeqCst);
        });

        self.thread_handle = Some(thread_handle);
        Ok(rx)
    }

    fn stop(&mut self) -> Result<(), HotkeyError> {
        self.running.store(false, Ordering::SeqCst);
        // rdev's listen() has no way to stop from another thread; the thread
        // ends with the process.
        self.thread_handle.take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_chords() {
        let config = HotkeyConfig {
            chords: vec![vec!["LEFTCTRL".into(), "BOGUS".into()]],
            ..HotkeyConfig::default()
        };
        assert!(RdevListener::new(&config).is_err());
        assert!(RdevListener::new(&HotkeyConfig::default()).is_ok());
    }
}
