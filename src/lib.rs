//! quillkey: rewrite the focused text field with a local LLM
//!
//! This library provides the core functionality for:
//! - Detecting a global chord (Ctrl+Alt+X by default) via rdev
//! - Capturing the focused field's text with select-all + copy
//! - Rewriting it through a local Ollama generate endpoint
//! - Pasting the rewrite back and restoring the user's clipboard
//!
//! # Architecture
//!
//! ```text
//!          ┌──────────────┐  Triggered   ┌─────────────────────────────┐
//!          │    Hotkey    │ ───────────▶ │           Daemon            │
//!          │   (rdev)     │   (mpsc)     │  (current thread, LocalSet) │
//!          └──────────────┘              └─────────────────────────────┘
//!           listener thread                            │ spawn_local
//!           owns the matcher                           ▼
//!                                        ┌─────────────────────────────┐
//!                                        │     Trigger Orchestrator    │
//!                                        │ busy · exclusion · debounce │
//!                                        └─────────────────────────────┘
//!                       ┌───────────────────┬──────────┴─────────┬───────────────────┐
//!                       ▼                   ▼                    ▼                   ▼
//!              ┌──────────────┐    ┌──────────────┐     ┌──────────────┐    ┌──────────────┐
//!              │  Clipboard   │    │    Focus     │     │    Input     │    │   Rewrite    │
//!              │  (arboard)   │    │ (active-win) │     │ (rdev sim)   │    │ (ureq→Ollama)│
//!              └──────────────┘    └──────────────┘     └──────────────┘    └──────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod daemon;
pub mod desktop;
pub mod error;
pub mod hotkey;
pub mod rewrite;
pub mod state;
pub mod trigger;

pub use cli::{Cli, Commands};
pub use config::Config;
pub use daemon::Daemon;
pub use error::{QuillkeyError, Result};
pub use trigger::{Outcome, TriggerOrchestrator};
