//! Trigger orchestration
//!
//! One activation runs the whole capture → rewrite → replace sequence:
//!
//! 1. Drop the attempt if a sequence is already running
//! 2. Skip excluded applications and triggers inside the debounce window
//! 3. Let the chord settle, then check focus again
//! 4. Snapshot the clipboard, select-all and copy the selection
//! 5. Rewrite the captured text
//! 6. Paste the rewrite if it differs, then put the clipboard back
//!
//! Every desktop failure is logged and treated as best-effort; nothing in
//! here can end the daemon. All mutable state is single-threaded and lives
//! on the orchestrator, so activations must run on a `LocalSet`.

use crate::config::{Config, TimingConfig};
use crate::desktop::{ClipboardBridge, FocusInspector, InputSynthesizer};
use crate::error::HotkeyError;
use crate::hotkey::{parse_key_name, Key};
use crate::rewrite::Rewriter;
use crate::state::Phase;
use std::cell::Cell;
use std::fmt;
use std::sync::Arc;
use tokio::time::{sleep, Instant};

/// How an activation attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Another sequence was running; nothing happened
    Busy,
    /// The focused application is excluded
    ExcludedApp(String),
    /// Too soon after the previous accepted trigger
    Debounced,
    /// Focus moved to an excluded application while the chord settled
    FocusChanged(String),
    /// The copied selection was empty
    NothingSelected,
    /// The rewrite came back empty or identical, nothing was pasted
    Unchanged,
    /// The selection was replaced with the rewrite
    Replaced,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Busy => write!(f, "busy"),
            Outcome::ExcludedApp(app) => write!(f, "excluded app {:?}", app),
            Outcome::Debounced => write!(f, "debounced"),
            Outcome::FocusChanged(app) => write!(f, "focus moved to {:?}", app),
            Outcome::NothingSelected => write!(f, "nothing selected"),
            Outcome::Unchanged => write!(f, "unchanged"),
            Outcome::Replaced => write!(f, "replaced"),
        }
    }
}

/// Holds the busy flag for the lifetime of one sequence
///
/// Dropping the guard clears the flag and resets the phase, whichever path
/// the sequence leaves by.
struct BusyGuard<'a> {
    busy: &'a Cell<bool>,
    phase: &'a Cell<Phase>,
}

impl<'a> BusyGuard<'a> {
    fn acquire(busy: &'a Cell<bool>, phase: &'a Cell<Phase>) -> Self {
        busy.set(true);
        Self { busy, phase }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
        self.busy.set(false);
    }
}

/// Runs trigger sequences against the desktop
pub struct TriggerOrchestrator {
    clipboard: Box<dyn ClipboardBridge>,
    focus: Box<dyn FocusInspector>,
    input: Box<dyn InputSynthesizer>,
    rewriter: Arc<dyn Rewriter>,
    excluded_apps: Vec<String>,
    timing: TimingConfig,
    shortcut_modifier: Key,
    busy: Cell<bool>,
    last_trigger: Cell<Option<Instant>>,
    phase: Cell<Phase>,
}

impl TriggerOrchestrator {
    /// Create an orchestrator over the given desktop bridges
    pub fn new(
        clipboard: Box<dyn ClipboardBridge>,
        focus: Box<dyn FocusInspector>,
        input: Box<dyn InputSynthesizer>,
        rewriter: Arc<dyn Rewriter>,
        config: &Config,
    ) -> Result<Self, HotkeyError> {
        let shortcut_modifier = parse_key_name(&config.input.shortcut_modifier)?;

        Ok(Self {
            clipboard,
            focus,
            input,
            rewriter,
            excluded_apps: config.excluded_apps.clone(),
            timing: config.timing,
            shortcut_modifier,
            busy: Cell::new(false),
            last_trigger: Cell::new(None),
            phase: Cell::new(Phase::Idle),
        })
    }

    /// Whether a sequence is in flight
    pub fn is_busy(&self) -> bool {
        self.busy.get()
    }

    pub fn phase(&self) -> Phase {
        self.phase.get()
    }

    /// Run one activation attempt
    pub async fn activate(&self) -> Outcome {
        if self.busy.get() {
            tracing::debug!("Trigger ignored, a rewrite is already running");
            return Outcome::Busy;
        }

        let _guard = BusyGuard::acquire(&self.busy, &self.phase);
        let outcome = self.run_sequence().await;

        match outcome {
            Outcome::Replaced => tracing::info!("Selection rewritten"),
            Outcome::ExcludedApp(_) | Outcome::FocusChanged(_) | Outcome::Debounced => {
                tracing::debug!("Trigger skipped: {}", outcome)
            }
            _ => tracing::info!("Trigger finished: {}", outcome),
        }

        outcome
    }

    async fn run_sequence(&self) -> Outcome {
        self.set_phase(Phase::Guarding);

        let app = self.focused_app();
        if self.is_excluded(&app) {
            return Outcome::ExcludedApp(app);
        }

        // A rejected attempt leaves the window where it was
        let now = Instant::now();
        if let Some(last) = self.last_trigger.get() {
            if now.duration_since(last) < self.timing.debounce() {
                return Outcome::Debounced;
            }
        }
        self.last_trigger.set(Some(now));

        tracing::info!("Hotkey triggered in {:?}", app);

        // Give the user time to let go of the chord
        sleep(self.timing.settle()).await;

        let app = self.focused_app();
        if self.is_excluded(&app) {
            return Outcome::FocusChanged(app);
        }

        self.set_phase(Phase::Capturing);
        let snapshot = self.read_clipboard();

        self.combo(Key::Letter('A'));
        sleep(self.timing.select_settle()).await;
        self.combo(Key::Letter('C'));
        sleep(self.timing.copy_settle()).await;

        let captured = self.read_clipboard();
        if captured.trim().is_empty() {
            tracing::debug!("Copied selection is empty");
            self.restore(&snapshot);
            return Outcome::NothingSelected;
        }

        tracing::debug!("Captured {} chars", captured.chars().count());

        self.set_phase(Phase::Rewriting);
        let rewritten = self.rewrite(&captured).await;

        if rewritten.is_empty() || rewritten == captured {
            self.restore(&snapshot);
            return Outcome::Unchanged;
        }

        self.set_phase(Phase::Replacing);
        self.write_clipboard(&rewritten);
        sleep(self.timing.paste_settle()).await;
        self.combo(Key::Letter('V'));
        sleep(self.timing.paste_settle()).await;
        // Collapse the pasted selection so the cursor ends after it
        self.tap(Key::RightArrow);
        sleep(self.timing.paste_settle()).await;

        self.restore(&snapshot);
        Outcome::Replaced
    }

    fn set_phase(&self, phase: Phase) {
        tracing::trace!("Phase: {} -> {}", self.phase.get(), phase);
        self.phase.set(phase);
    }

    fn is_excluded(&self, app: &str) -> bool {
        self.excluded_apps.iter().any(|excluded| excluded == app)
    }

    fn focused_app(&self) -> String {
        self.focus.active_application_name().unwrap_or_else(|e| {
            tracing::debug!("Could not determine focused app: {}", e);
            String::new()
        })
    }

    fn read_clipboard(&self) -> String {
        self.clipboard.read().unwrap_or_else(|e| {
            tracing::debug!("Clipboard read failed: {}", e);
            String::new()
        })
    }

    fn write_clipboard(&self, text: &str) {
        if let Err(e) = self.clipboard.write(text) {
            tracing::warn!("Clipboard write failed: {}", e);
        }
    }

    fn restore(&self, snapshot: &str) {
        self.set_phase(Phase::Restoring);
        self.write_clipboard(snapshot);
    }

    fn combo(&self, key: Key) {
        if let Err(e) = self.input.press_combo(self.shortcut_modifier, key) {
            tracing::warn!("Failed to send {}+{}: {}", self.shortcut_modifier, key, e);
        }
    }

    fn tap(&self, key: Key) {
        if let Err(e) = self.input.tap(key) {
            tracing::warn!("Failed to send {}: {}", key, e);
        }
    }

    async fn rewrite(&self, text: &str) -> String {
        let rewriter = Arc::clone(&self.rewriter);
        let input = text.to_string();

        match tokio::task::spawn_blocking(move || rewriter.rewrite(&input)).await {
            Ok(rewritten) => rewritten,
            Err(e) => {
                tracing::warn!("Rewrite task failed: {}", e);
                text.to_string()
            }
        }
    }
}
